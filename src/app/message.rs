//! Application messages

use iced::time::Instant;

use crate::eq::Easing;
use crate::error::LoadError;

/// EQ channel a preset applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Unified,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub enum Message {
    // Playback
    SourceInitialized(Result<(), LoadError>),
    TogglePlayback,
    SeekPreview(f64),
    SeekRelease,
    /// Slider drag; applied to the adapter but not yet persisted
    VolumeChanged(f32),
    VolumeReleased,
    PlaybackTick,
    PositionUpdated { position: f64, duration: f64 },

    // Equalizer view
    PresetSelected(Channel, String),
    EqEnabledToggled(bool),
    SplitEarToggled(bool),
    EasingSelected(Easing),
    SaveSettings,

    /// Window frame from the host's frame clock
    Frame(Instant),
}

impl Message {
    /// Whether handling this message leaves settings that should be written
    /// to disk. Slider drags only persist once released.
    pub fn persists_settings(&self) -> bool {
        matches!(
            self,
            Message::VolumeReleased
                | Message::PresetSelected(..)
                | Message::EqEnabledToggled(_)
                | Message::SplitEarToggled(_)
                | Message::EasingSelected(_)
        )
    }
}
