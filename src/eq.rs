//! Frequency-response model
//!
//! - `preset`: named band-gain tables and lookup
//! - `curve`: control points, curve sampling and preset interpolation
//! - `easing`: progress-to-weight curves
//! - `transition`: animated per-channel transitions and the render snapshot

mod curve;
mod easing;
mod preset;
mod transition;

pub use curve::{CurvePoint, compute_curve_points, control_points, gain_at, interpolate};
pub use easing::{Ease, Easing, lerp};
pub use preset::{BAND_COUNT, BandGains, Preset, PresetLibrary, PresetLookup};
pub use transition::{EqSnapshot, EqVisualState, TransitionState};
