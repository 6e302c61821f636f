//! Desktop shell
//!
//! Opens one source, drives it only through `PlaybackAdapter`, and shows the
//! EQ curve. Canvas paints go through the render scheduler, which releases at
//! most one snapshot per window frame.

mod message;
mod state;
mod update;
mod view;

use std::time::Duration;

use iced::{Task, Theme};

use crate::eq::{EqVisualState, PresetLibrary, PresetLookup};
use crate::media::{AudioSourceDescriptor, MediaHost, adapter_event_channel};
use crate::render::{RenderRequest, RenderScheduler};
use crate::settings::Settings;
pub use message::{Channel, Message};
pub use state::{App, PlayerState, SourceStatus};

/// Interval at which adapter events are drained and position is refreshed
const PLAYBACK_TICK: Duration = Duration::from_millis(250);

/// What to open at startup
#[derive(Debug, Clone, Default)]
pub enum Launch {
    #[default]
    Nothing,
    Descriptor(AudioSourceDescriptor),
    /// The command line named a source that could not be read
    Invalid(String),
}

impl App {
    pub fn new(launch: Launch) -> (Self, Task<Message>) {
        let settings = Settings::load();
        let presets = PresetLibrary::new();
        let host = MediaHost::native().with_query_timeout(settings.playback.query_timeout());

        let visualizer = &settings.visualizer;
        let mut eq = EqVisualState::new(
            presets.resolve(&visualizer.preset),
            presets.resolve(&visualizer.left_preset),
            presets.resolve(&visualizer.right_preset),
        )
        .with_easing(visualizer.easing)
        .with_duration(visualizer.transition());
        eq.set_enabled(visualizer.eq_enabled);
        eq.set_split_ear(visualizer.split_ear);

        let painted = eq.snapshot();
        let mut scheduler = RenderScheduler::new(visualizer.frame_interval());
        scheduler.request(RenderRequest {
            snapshot: painted.clone(),
        });

        let mut app = Self {
            settings,
            presets,
            host,
            player: PlayerState::empty(),
            eq,
            scheduler,
            painted,
        };

        let task = match launch {
            Launch::Nothing => Task::none(),
            Launch::Invalid(reason) => {
                app.player = PlayerState::failed(None, reason);
                Task::none()
            }
            Launch::Descriptor(descriptor) => app.open(descriptor),
        };
        (app, task)
    }

    /// Resolve `descriptor` into an adapter and start initializing it
    fn open(&mut self, descriptor: AudioSourceDescriptor) -> Task<Message> {
        if let Some(previous) = self.player.adapter.take() {
            previous.teardown();
        }

        let (tx, rx) = adapter_event_channel();
        let adapter = match self.host.create_adapter(descriptor.clone(), tx) {
            Ok(adapter) => adapter,
            Err(e) => {
                tracing::error!("Cannot open {}: {}", descriptor.name, e);
                self.player = PlayerState::failed(Some(descriptor), e.to_string());
                return Task::none();
            }
        };

        tracing::info!("Opening {} ({})", descriptor.name, descriptor.source_type);
        self.player = PlayerState {
            descriptor: Some(descriptor),
            adapter: Some(adapter.clone()),
            events: Some(rx),
            status: SourceStatus::Loading,
            ..PlayerState::empty()
        };

        Task::perform(
            async move { adapter.initialize().await },
            Message::SourceInitialized,
        )
    }

    pub fn title(&self) -> String {
        match &self.player.descriptor {
            Some(d) => format!("{} - {} | Sonance", d.name, d.author),
            None => "Sonance".to_string(),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Frames while a paint is pending or a transition runs; playback ticks
    /// while a source is open
    pub fn subscription(&self) -> iced::Subscription<Message> {
        let (needs_frames, needs_playback) = subscription_logic::subscription_decisions(
            self.scheduler.has_pending(),
            self.eq.is_animating(),
            self.player.adapter.is_some(),
        );

        let frame_sub = if needs_frames {
            iced::window::frames().map(Message::Frame)
        } else {
            iced::Subscription::none()
        };

        let playback_sub = if needs_playback {
            iced::time::every(PLAYBACK_TICK).map(|_| Message::PlaybackTick)
        } else {
            iced::Subscription::none()
        };

        iced::Subscription::batch([frame_sub, playback_sub])
    }
}

/// Subscription decision logic for testability
pub mod subscription_logic {
    pub fn needs_frame_subscription(paint_pending: bool, animating: bool) -> bool {
        paint_pending || animating
    }

    pub fn needs_playback_subscription(source_open: bool) -> bool {
        source_open
    }

    pub fn subscription_decisions(
        paint_pending: bool,
        animating: bool,
        source_open: bool,
    ) -> (bool, bool) {
        (
            needs_frame_subscription(paint_pending, animating),
            needs_playback_subscription(source_open),
        )
    }
}
