//! Sonance - unified playback control over embedded and widget-hosted audio
//! sources, with an animated EQ curve visualizer.
//!
//! - [`media`]: one `PlaybackAdapter` contract over every source type
//! - [`eq`]: presets, curve interpolation and transition state
//! - [`render`]: frame-coalesced painting of EQ snapshots
//! - [`app`]: the iced desktop shell wiring the three together

pub mod app;
pub mod eq;
pub mod error;
pub mod media;
pub mod render;
pub mod settings;
pub mod ui;
