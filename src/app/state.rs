//! Application state

use std::sync::Arc;

use crate::eq::{EqSnapshot, EqVisualState, PresetLibrary};
use crate::media::{
    AdapterEvent, AdapterEventReceiver, AudioSourceDescriptor, MediaHost, PlaybackAdapter,
    PlaybackState,
};
use crate::render::RenderScheduler;
use crate::settings::Settings;

/// Where the current source is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    /// Nothing opened
    Empty,
    Loading,
    Ready,
    Failed(String),
}

/// The open source and what it last reported
pub struct PlayerState {
    pub descriptor: Option<AudioSourceDescriptor>,
    pub adapter: Option<Arc<dyn PlaybackAdapter>>,
    pub events: Option<AdapterEventReceiver>,
    pub status: SourceStatus,
    pub playback: Option<PlaybackState>,
    pub position: f64,
    pub duration: f64,
    /// Slider value while the user is dragging
    pub seek_preview: Option<f64>,
}

impl PlayerState {
    pub fn empty() -> Self {
        Self {
            descriptor: None,
            adapter: None,
            events: None,
            status: SourceStatus::Empty,
            playback: None,
            position: 0.0,
            duration: 0.0,
            seek_preview: None,
        }
    }

    pub fn failed(descriptor: Option<AudioSourceDescriptor>, reason: String) -> Self {
        Self {
            descriptor,
            status: SourceStatus::Failed(reason),
            ..Self::empty()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == SourceStatus::Ready
    }

    pub fn is_playing(&self) -> bool {
        self.playback == Some(PlaybackState::Playing)
    }

    /// Apply every adapter event queued since the last call
    pub fn drain_events(&mut self) {
        let Some(events) = self.events.as_mut() else {
            return;
        };
        while let Ok(event) = events.try_recv() {
            match event {
                AdapterEvent::Ready => self.status = SourceStatus::Ready,
                AdapterEvent::Error(e) => {
                    tracing::warn!("Playback error: {}", e);
                    self.status = SourceStatus::Failed(e.to_string());
                }
                AdapterEvent::PlaybackStateChanged(state) => {
                    if state == PlaybackState::Finished {
                        self.position = self.duration;
                    }
                    self.playback = Some(state);
                }
            }
        }
    }
}

pub struct App {
    pub settings: Settings,
    pub presets: PresetLibrary,
    pub host: MediaHost,
    pub player: PlayerState,
    pub eq: EqVisualState,
    pub scheduler: RenderScheduler,
    /// Snapshot the canvas currently shows
    pub painted: EqSnapshot,
}

impl Drop for App {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
        if let Some(adapter) = self.player.adapter.take() {
            adapter.teardown();
        }
    }
}
