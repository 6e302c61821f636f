//! Embedded-element adapter
//!
//! Wraps one [`MediaElement`]. State reads are synchronous on the element and
//! are only wrapped in futures to satisfy the shared contract.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::contract::{PlaybackAdapter, seconds_or_zero, unit_volume};
use super::element::{ElementEvent, ElementListener, MediaElement};
use super::events::{AdapterEventSender, PlaybackState};
use super::lifecycle::{AdapterCore, Binding, Signal};
use super::source::AudioSourceDescriptor;
use crate::error::LoadError;

const PROVIDER: &str = "embedded";

pub struct EmbeddedAdapter {
    core: Arc<AdapterCore>,
    element: Mutex<Option<Box<dyn MediaElement>>>,
}

impl EmbeddedAdapter {
    pub fn new(
        descriptor: AudioSourceDescriptor,
        element: Box<dyn MediaElement>,
        events: AdapterEventSender,
    ) -> Self {
        Self {
            core: Arc::new(AdapterCore::new(PROVIDER, descriptor, events)),
            element: Mutex::new(Some(element)),
        }
    }

    /// Run `f` against the element if the adapter is ready
    fn with_ready_element(&self, op: &str, f: impl FnOnce(&dyn MediaElement)) {
        if !self.core.is_ready() {
            tracing::debug!("{}: ignoring {} before ready", PROVIDER, op);
            return;
        }
        if let Some(element) = self.element.lock().as_deref() {
            f(element);
        }
    }

    fn read(&self, f: impl FnOnce(&dyn MediaElement) -> f64) -> f64 {
        if !self.core.is_ready() {
            return 0.0;
        }
        self.element
            .lock()
            .as_deref()
            .map(|element| seconds_or_zero(f(element)))
            .unwrap_or(0.0)
    }
}

#[async_trait]
impl PlaybackAdapter for EmbeddedAdapter {
    fn descriptor(&self) -> &AudioSourceDescriptor {
        self.core.descriptor()
    }

    async fn initialize(&self) -> Result<(), LoadError> {
        let (generation, ready) = match self.core.bind()? {
            Binding::Ready => return Ok(()),
            Binding::Joined { ready } => return self.core.await_ready(ready).await,
            Binding::Opened { generation, ready } => (generation, ready),
        };

        let locator = self.core.descriptor().media_locator.trim().to_string();
        if locator.is_empty() {
            let error = LoadError::InvalidLocator(locator);
            self.core.fail(generation, error.clone());
            return Err(error);
        }

        tracing::info!("{}: loading {}", PROVIDER, locator);
        let core = self.core.clone();
        let listener: ElementListener = Arc::new(move |event: ElementEvent| {
            let signal = match event {
                ElementEvent::CanPlay => Signal::Ready,
                ElementEvent::Playing => Signal::State(PlaybackState::Playing),
                ElementEvent::Paused => Signal::State(PlaybackState::Paused),
                ElementEvent::Ended => Signal::State(PlaybackState::Finished),
                ElementEvent::Error(message) => Signal::Failed(LoadError::Media(message)),
            };
            let _ = core.dispatch(generation, signal);
        });

        {
            let guard = self.element.lock();
            let Some(element) = guard.as_deref() else {
                return Err(LoadError::TornDown);
            };
            element.set_listener(Some(listener));
            element.load(&locator);
        }

        self.core.await_ready(ready).await
    }

    fn play(&self) {
        self.with_ready_element("play", |e| e.play());
    }

    fn pause(&self) {
        self.with_ready_element("pause", |e| e.pause());
    }

    fn seek_to(&self, seconds: f64) {
        self.with_ready_element("seek", |e| e.set_current_time(seconds.max(0.0)));
    }

    fn set_volume(&self, volume: f32) {
        let volume = unit_volume(volume);
        self.with_ready_element("set_volume", |e| e.set_volume(volume));
    }

    async fn current_position(&self) -> f64 {
        self.read(|e| e.current_time())
    }

    async fn duration(&self) -> f64 {
        self.read(|e| e.duration())
    }

    fn teardown(&self) {
        self.core.teardown();
        if let Some(element) = self.element.lock().take() {
            element.set_listener(None);
            element.release();
            tracing::debug!("{}: torn down", PROVIDER);
        }
    }
}

impl Drop for EmbeddedAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}
