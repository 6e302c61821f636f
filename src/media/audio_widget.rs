//! Audio-widget adapter
//!
//! The audio widget speaks milliseconds and a `0..=100` volume, and answers
//! state queries through callbacks. All of that is converted here; callers
//! only ever see seconds and `0.0..=1.0`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::contract::{PlaybackAdapter, seconds_or_zero, unit_volume};
use super::events::{AdapterEventSender, PlaybackState};
use super::lifecycle::{AdapterCore, Binding, Signal};
use super::loader::ApiLoader;
use super::source::AudioSourceDescriptor;
use crate::error::LoadError;

const PROVIDER: &str = "audio-widget";

/// Bound on a position/duration query the widget never answers
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(2000);

/// Event kinds the widget lets callers bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioWidgetEventKind {
    Ready,
    Play,
    Pause,
    Finish,
    Error,
}

impl AudioWidgetEventKind {
    pub const ALL: [Self; 5] = [
        Self::Ready,
        Self::Play,
        Self::Pause,
        Self::Finish,
        Self::Error,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioWidgetEvent {
    Ready,
    Play,
    Pause,
    Finish,
    Error(String),
}

impl AudioWidgetEvent {
    pub fn kind(&self) -> AudioWidgetEventKind {
        match self {
            Self::Ready => AudioWidgetEventKind::Ready,
            Self::Play => AudioWidgetEventKind::Play,
            Self::Pause => AudioWidgetEventKind::Pause,
            Self::Finish => AudioWidgetEventKind::Finish,
            Self::Error(_) => AudioWidgetEventKind::Error,
        }
    }
}

pub type AudioWidgetListener = Arc<dyn Fn(AudioWidgetEvent) + Send + Sync>;

/// One-shot reply to a state query, in milliseconds
pub type QueryReply = Box<dyn FnOnce(f64) + Send>;

/// The loaded widget API
pub trait AudioWidgetApi: Send + Sync {
    /// Attach a widget to the track at `track_url`
    fn create_widget(&self, track_url: &str) -> Result<Box<dyn AudioWidget>, String>;
}

/// One embedded audio widget
pub trait AudioWidget: Send + Sync {
    fn bind(&self, kind: AudioWidgetEventKind, listener: AudioWidgetListener);
    fn unbind(&self, kind: AudioWidgetEventKind);
    fn play(&self);
    fn pause(&self);
    fn seek_to(&self, milliseconds: f64);
    /// Volume in `0..=100`
    fn set_volume(&self, volume: f64);
    fn get_position(&self, reply: QueryReply);
    fn get_duration(&self, reply: QueryReply);
}

pub struct AudioWidgetAdapter {
    core: Arc<AdapterCore>,
    loader: Arc<ApiLoader<dyn AudioWidgetApi>>,
    widget: Mutex<Option<Box<dyn AudioWidget>>>,
    query_timeout: Duration,
}

impl AudioWidgetAdapter {
    pub fn new(
        descriptor: AudioSourceDescriptor,
        loader: Arc<ApiLoader<dyn AudioWidgetApi>>,
        events: AdapterEventSender,
    ) -> Self {
        Self {
            core: Arc::new(AdapterCore::new(PROVIDER, descriptor, events)),
            loader,
            widget: Mutex::new(None),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    fn with_ready_widget(&self, op: &str, f: impl FnOnce(&dyn AudioWidget)) {
        if !self.core.is_ready() {
            tracing::debug!("{}: ignoring {} before ready", PROVIDER, op);
            return;
        }
        if let Some(widget) = self.widget.lock().as_deref() {
            f(widget);
        }
    }

    /// Ask the widget for a millisecond value and convert the reply to seconds
    async fn query(&self, what: &str, ask: impl FnOnce(&dyn AudioWidget, QueryReply)) -> f64 {
        if !self.core.is_ready() {
            return 0.0;
        }
        let (tx, rx) = oneshot::channel();
        {
            let guard = self.widget.lock();
            let Some(widget) = guard.as_deref() else {
                return 0.0;
            };
            ask(
                widget,
                Box::new(move |ms| {
                    let _ = tx.send(ms);
                }),
            );
        }

        match tokio::time::timeout(self.query_timeout, rx).await {
            Ok(Ok(ms)) => seconds_or_zero(ms / 1000.0),
            Ok(Err(_)) => 0.0,
            Err(_) => {
                tracing::debug!(
                    "{}: {} query unanswered after {:?}",
                    PROVIDER,
                    what,
                    self.query_timeout
                );
                0.0
            }
        }
    }

    fn listener(&self, generation: u64) -> AudioWidgetListener {
        let core = self.core.clone();
        Arc::new(move |event: AudioWidgetEvent| {
            let signal = match event {
                AudioWidgetEvent::Ready => Signal::Ready,
                AudioWidgetEvent::Play => Signal::State(PlaybackState::Playing),
                AudioWidgetEvent::Pause => Signal::State(PlaybackState::Paused),
                AudioWidgetEvent::Finish => Signal::State(PlaybackState::Finished),
                AudioWidgetEvent::Error(reason) => Signal::Failed(LoadError::Injection {
                    provider: PROVIDER,
                    reason,
                }),
            };
            let _ = core.dispatch(generation, signal);
        })
    }

    fn release_widget(&self) {
        if let Some(widget) = self.widget.lock().take() {
            for kind in AudioWidgetEventKind::ALL {
                widget.unbind(kind);
            }
        }
    }
}

#[async_trait]
impl PlaybackAdapter for AudioWidgetAdapter {
    fn descriptor(&self) -> &AudioSourceDescriptor {
        self.core.descriptor()
    }

    async fn initialize(&self) -> Result<(), LoadError> {
        let (generation, ready) = match self.core.bind()? {
            Binding::Ready => return Ok(()),
            Binding::Joined { ready } => return self.core.await_ready(ready).await,
            Binding::Opened { generation, ready } => (generation, ready),
        };

        let track_url = self.core.descriptor().media_locator.trim().to_string();
        if track_url.is_empty() {
            let error = LoadError::InvalidLocator(track_url);
            self.core.fail(generation, error.clone());
            return Err(error);
        }

        let api = match self.loader.api().await {
            Ok(api) => api,
            Err(error) => {
                self.core.fail(generation, error.clone());
                return Err(error);
            }
        };
        if !self.core.is_current(generation) {
            return Err(LoadError::TornDown);
        }

        tracing::info!("{}: attaching widget for {}", PROVIDER, track_url);
        let widget = match api.create_widget(&track_url) {
            Ok(widget) => widget,
            Err(reason) => {
                let error = LoadError::Injection {
                    provider: PROVIDER,
                    reason,
                };
                self.core.fail(generation, error.clone());
                return Err(error);
            }
        };

        // A previous failed attempt may have left a widget behind
        self.release_widget();
        let listener = self.listener(generation);
        for kind in AudioWidgetEventKind::ALL {
            widget.bind(kind, listener.clone());
        }
        *self.widget.lock() = Some(widget);

        if self.core.is_torn_down() {
            self.release_widget();
            return Err(LoadError::TornDown);
        }

        self.core.await_ready(ready).await
    }

    fn play(&self) {
        self.with_ready_widget("play", |w| w.play());
    }

    fn pause(&self) {
        self.with_ready_widget("pause", |w| w.pause());
    }

    fn seek_to(&self, seconds: f64) {
        let ms = (seconds.max(0.0) * 1000.0).round();
        self.with_ready_widget("seek", |w| w.seek_to(ms));
    }

    fn set_volume(&self, volume: f32) {
        let scaled = (f64::from(unit_volume(volume)) * 100.0).round();
        self.with_ready_widget("set_volume", |w| w.set_volume(scaled));
    }

    async fn current_position(&self) -> f64 {
        self.query("position", |w, reply| w.get_position(reply))
            .await
    }

    async fn duration(&self) -> f64 {
        self.query("duration", |w, reply| w.get_duration(reply))
            .await
    }

    fn teardown(&self) {
        if self.core.teardown() {
            tracing::debug!("{}: torn down", PROVIDER);
        }
        self.release_widget();
    }
}

impl Drop for AudioWidgetAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}
