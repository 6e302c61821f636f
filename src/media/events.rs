//! Adapter lifecycle events
//!
//! Every adapter reports to its owner over one channel:
//!
//! ```text
//! Widget callbacks --> AdapterCore::dispatch --[AdapterEvent]--> Owner
//! ```
//!
//! Events from a torn-down or replaced binding never reach the channel.

use crate::error::LoadError;

/// Playback state as reported by the wrapped surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Finished,
}

/// Events emitted by an adapter
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterEvent {
    /// The underlying widget or element reported ready
    Ready,
    /// Load or widget failure
    Error(LoadError),
    /// Playing / paused / finished
    PlaybackStateChanged(PlaybackState),
}

/// Sender for adapter events (held by the adapter)
pub type AdapterEventSender = tokio::sync::mpsc::UnboundedSender<AdapterEvent>;

/// Receiver for adapter events (held by the owner)
pub type AdapterEventReceiver = tokio::sync::mpsc::UnboundedReceiver<AdapterEvent>;

/// Create a new adapter event channel
pub fn adapter_event_channel() -> (AdapterEventSender, AdapterEventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
