//! Unified control contract
//!
//! The only interface playback UI depends on. Once a [`super::MediaHost`] has
//! resolved a descriptor into an adapter, nothing downstream looks at the
//! source type again.

use async_trait::async_trait;

use super::source::AudioSourceDescriptor;
use crate::error::LoadError;

/// Control surface shared by every source adapter
///
/// `play`, `pause`, `seek_to` and `set_volume` are fire-and-forget: calls made
/// before the adapter is ready are dropped, and failures surface only as
/// [`super::AdapterEvent::Error`]. Calls issued in sequence reach the wrapped
/// surface in that sequence.
#[async_trait]
pub trait PlaybackAdapter: Send + Sync {
    /// Descriptor this adapter was built from
    fn descriptor(&self) -> &AudioSourceDescriptor;

    /// Bind to the wrapped surface and wait until it reports ready.
    ///
    /// Resolves immediately when already ready. After a failure, calling it
    /// again retries the load.
    async fn initialize(&self) -> Result<(), LoadError>;

    fn play(&self);

    fn pause(&self);

    fn seek_to(&self, seconds: f64);

    /// Volume in `0.0..=1.0`, rescaled to the wrapped surface's unit
    fn set_volume(&self, volume: f32);

    /// Current position in seconds; 0 when unknown, not ready or torn down
    async fn current_position(&self) -> f64;

    /// Duration in seconds; 0 when unknown, not ready or torn down
    async fn duration(&self) -> f64;

    /// Unbind every subscription and release the wrapped surface.
    ///
    /// Idempotent, and safe before `initialize()` has resolved.
    fn teardown(&self);
}

/// Clamp a caller volume into `0.0..=1.0`, mapping NaN to silence
pub(crate) fn unit_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Sanitize a position/duration reading from an external surface
pub(crate) fn seconds_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
