//! Error taxonomy
//!
//! Adapters report failures through their event channel; these types are what
//! travels on it. Rendering has no error type because it never fails.

use thiserror::Error;

/// An external widget, script or media element failed to initialize.
///
/// Recoverable: calling `initialize()` again retries the load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The provider script could not be injected or never signalled readiness
    #[error("failed to load {provider} api: {reason}")]
    Injection {
        provider: &'static str,
        reason: String,
    },

    /// The widget itself reported an error code
    #[error("{provider} widget reported error {code}")]
    Widget { provider: &'static str, code: i32 },

    /// The native media element could not open or decode the media
    #[error("media element failed: {0}")]
    Media(String),

    /// The descriptor's media locator is empty or malformed
    #[error("invalid media locator: {0:?}")]
    InvalidLocator(String),

    /// The adapter was torn down before it became ready
    #[error("adapter torn down before ready")]
    TornDown,
}

/// A descriptor named a source type with no adapter available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported source type: {0}")]
pub struct UnsupportedSourceError(pub String);

/// A widget callback arrived after its binding was torn down or replaced.
///
/// Never surfaced to users; the dispatcher returns it so callers can drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stale callback from binding generation {generation}")]
pub struct StaleCallbackError {
    pub generation: u64,
}

/// Errors that can occur with settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Umbrella error for callers that mix playback and configuration
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    UnsupportedSource(#[from] UnsupportedSourceError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
