//! Sonance - unified audio source player with an animated EQ curve

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sonance::app::{App, Launch};
use sonance::media::AudioSourceDescriptor;

#[derive(Debug, Parser)]
#[command(name = "sonance", version, about)]
struct Cli {
    /// Local audio file to play through the embedded element
    #[arg(long, conflicts_with = "descriptor")]
    file: Option<PathBuf>,

    /// Source descriptor as JSON, or a path to a JSON file
    #[arg(long)]
    descriptor: Option<String>,
}

impl Cli {
    fn launch(&self) -> anyhow::Result<Launch> {
        if let Some(path) = &self.file {
            return Ok(Launch::Descriptor(AudioSourceDescriptor::local_file(path)));
        }
        let Some(raw) = &self.descriptor else {
            return Ok(Launch::Nothing);
        };

        let json = if raw.trim_start().starts_with('{') {
            raw.clone()
        } else {
            std::fs::read_to_string(raw)
                .with_context(|| format!("failed to read descriptor file {}", raw))?
        };
        let descriptor =
            AudioSourceDescriptor::from_json(&json).context("invalid source descriptor")?;
        Ok(Launch::Descriptor(descriptor))
    }
}

fn main() -> iced::Result {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sonance=info")),
        )
        .init();

    let cli = Cli::parse();
    let launch = cli.launch().unwrap_or_else(|e| {
        tracing::error!("{:#}", e);
        Launch::Invalid(format!("{:#}", e))
    });

    iced::application(move || App::new(launch.clone()), App::update, App::view)
        .title(App::title)
        .subscription(App::subscription)
        .theme(App::theme)
        .window_size((960.0, 640.0))
        .antialiasing(true)
        .run()
}
