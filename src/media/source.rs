//! Source descriptors handed to the media layer by source resolution

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnsupportedSourceError;

/// Closed set of playback surfaces the media layer can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceType {
    /// Native media element playing a local file
    Embedded,
    /// Third-party video-hosting widget
    VideoWidget,
    /// Third-party audio-hosting widget
    AudioWidget,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Embedded => "embedded",
            SourceType::VideoWidget => "videoWidget",
            SourceType::AudioWidget => "audioWidget",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = UnsupportedSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embedded" => Ok(SourceType::Embedded),
            "videoWidget" => Ok(SourceType::VideoWidget),
            "audioWidget" => Ok(SourceType::AudioWidget),
            other => Err(UnsupportedSourceError(other.to_string())),
        }
    }
}

/// Immutable description of one playable source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSourceDescriptor {
    pub name: String,
    pub author: String,
    pub cover_url: Option<String>,
    /// File path, video id or track url, depending on `source_type`
    pub media_locator: String,
    pub source_type: SourceType,
    pub source_url: Option<String>,
}

impl AudioSourceDescriptor {
    /// Descriptor for a local file played through the embedded element
    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown Title")
            .to_string();
        Self {
            name,
            author: "Unknown Artist".to_string(),
            cover_url: None,
            media_locator: path.to_string_lossy().into_owned(),
            source_type: SourceType::Embedded,
            source_url: None,
        }
    }

    /// Parse a descriptor from JSON, reporting an unknown `sourceType`
    /// as [`UnsupportedSourceError`] rather than a generic parse failure.
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        if let Some(kind) = raw.get("sourceType").and_then(|v| v.as_str()) {
            kind.parse::<SourceType>()?;
        }
        Ok(serde_json::from_value(raw)?)
    }
}

/// Failure to turn untrusted input into a descriptor
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedSourceError),
    #[error("malformed descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
}
