//! In-process stand-ins for the external playback surfaces
//!
//! Every fake records the calls an adapter makes and lets a test fire the
//! surface's events by hand. `fire` style helpers deliver through the last
//! listener ever registered, even after it was unbound, so tests can play the
//! part of a widget that calls back late.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::audio_widget::{
    AudioWidget, AudioWidgetApi, AudioWidgetEvent, AudioWidgetEventKind, AudioWidgetListener,
    QueryReply,
};
use super::element::{ElementEvent, ElementListener, MediaElement};
use super::loader::{ApiInjector, ApiLoader};
use super::video_widget::{VideoPlayer, VideoPlayerEvent, VideoPlayerListener, VideoWidgetApi};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Embedded element
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ElementCall {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
}

#[derive(Default)]
struct ElementInner {
    calls: Mutex<Vec<ElementCall>>,
    listener: Mutex<Option<ElementListener>>,
    last_listener: Mutex<Option<ElementListener>>,
    auto_ready: AtomicBool,
    load_failure: Mutex<Option<String>>,
    released: AtomicBool,
    duration: f64,
    time: Mutex<f64>,
}

#[derive(Clone)]
pub struct FakeElement {
    inner: Arc<ElementInner>,
}

impl FakeElement {
    pub fn new(duration: f64) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                duration,
                ..Default::default()
            }),
        }
    }

    /// Report `CanPlay` as soon as a source is loaded
    pub fn auto_ready(&self) {
        self.inner.auto_ready.store(true, Ordering::SeqCst);
    }

    /// Report an error instead of `CanPlay` on the next load
    pub fn fail_load(&self, message: &str) {
        *self.inner.load_failure.lock() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<ElementCall> {
        self.inner.calls.lock().clone()
    }

    pub fn released(&self) -> bool {
        self.inner.released.load(Ordering::SeqCst)
    }

    /// Deliver through the currently bound listener
    pub fn fire(&self, event: ElementEvent) {
        let listener = self.inner.listener.lock().clone();
        if let Some(listener) = listener {
            listener(event);
        }
    }

    /// Deliver through the last listener ever bound
    pub fn fire_detached(&self, event: ElementEvent) {
        let listener = self.inner.last_listener.lock().clone();
        if let Some(listener) = listener {
            listener(event);
        }
    }

    fn record(&self, call: ElementCall) {
        self.inner.calls.lock().push(call);
    }
}

impl MediaElement for FakeElement {
    fn set_listener(&self, listener: Option<ElementListener>) {
        if let Some(listener) = &listener {
            *self.inner.last_listener.lock() = Some(listener.clone());
        }
        *self.inner.listener.lock() = listener;
    }

    fn load(&self, locator: &str) {
        self.record(ElementCall::Load(locator.to_string()));
        let failure = self.inner.load_failure.lock().take();
        if let Some(message) = failure {
            self.fire(ElementEvent::Error(message));
        } else if self.inner.auto_ready.load(Ordering::SeqCst) {
            self.fire(ElementEvent::CanPlay);
        }
    }

    fn play(&self) {
        self.record(ElementCall::Play);
    }

    fn pause(&self) {
        self.record(ElementCall::Pause);
    }

    fn set_current_time(&self, seconds: f64) {
        self.record(ElementCall::Seek(seconds));
        *self.inner.time.lock() = seconds;
    }

    fn set_volume(&self, volume: f32) {
        self.record(ElementCall::SetVolume(volume));
    }

    fn current_time(&self) -> f64 {
        *self.inner.time.lock()
    }

    fn duration(&self) -> f64 {
        self.inner.duration
    }

    fn release(&self) {
        self.inner.released.store(true, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Video widget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum VideoCall {
    Play,
    Pause,
    Seek(f64),
    SetVolume(u8),
    Destroy,
}

#[derive(Default)]
struct VideoInner {
    ready_immediately: bool,
    calls: Mutex<Vec<VideoCall>>,
    listener: Mutex<Option<VideoPlayerListener>>,
    times: Mutex<(f64, f64)>,
    injections: AtomicUsize,
    players: AtomicUsize,
}

/// Fake video API; every player it creates shares its call log
#[derive(Clone)]
pub struct FakeVideoApi {
    inner: Arc<VideoInner>,
}

impl FakeVideoApi {
    /// Players report ready while being constructed
    pub fn ready_immediately() -> Self {
        Self::with_mode(true)
    }

    /// Players report nothing until the test fires events
    pub fn manual() -> Self {
        Self::with_mode(false)
    }

    fn with_mode(ready_immediately: bool) -> Self {
        Self {
            inner: Arc::new(VideoInner {
                ready_immediately,
                ..Default::default()
            }),
        }
    }

    pub fn set_times(&self, current: f64, duration: f64) {
        *self.inner.times.lock() = (current, duration);
    }

    pub fn calls(&self) -> Vec<VideoCall> {
        self.inner.calls.lock().clone()
    }

    pub fn injections(&self) -> usize {
        self.inner.injections.load(Ordering::SeqCst)
    }

    pub fn players_created(&self) -> usize {
        self.inner.players.load(Ordering::SeqCst)
    }

    /// Deliver through the listener of the most recent player
    pub fn fire(&self, event: VideoPlayerEvent) {
        let listener = self.inner.listener.lock().clone();
        if let Some(listener) = listener {
            listener(event);
        }
    }
}

impl VideoWidgetApi for FakeVideoApi {
    fn create_player(
        &self,
        _video_id: &str,
        listener: VideoPlayerListener,
    ) -> Result<Box<dyn VideoPlayer>, String> {
        self.inner.players.fetch_add(1, Ordering::SeqCst);
        *self.inner.listener.lock() = Some(listener.clone());
        if self.inner.ready_immediately {
            listener(VideoPlayerEvent::Ready);
        }
        Ok(Box::new(FakeVideoPlayer {
            inner: self.inner.clone(),
        }))
    }
}

struct FakeVideoPlayer {
    inner: Arc<VideoInner>,
}

impl FakeVideoPlayer {
    fn record(&self, call: VideoCall) {
        self.inner.calls.lock().push(call);
    }
}

impl VideoPlayer for FakeVideoPlayer {
    fn play_video(&self) {
        self.record(VideoCall::Play);
    }

    fn pause_video(&self) {
        self.record(VideoCall::Pause);
    }

    fn seek_to(&self, seconds: f64, _allow_seek_ahead: bool) {
        self.record(VideoCall::Seek(seconds));
    }

    fn set_volume(&self, volume: u8) {
        self.record(VideoCall::SetVolume(volume));
    }

    fn current_time(&self) -> f64 {
        self.inner.times.lock().0
    }

    fn duration(&self) -> f64 {
        self.inner.times.lock().1
    }

    fn destroy(&self) {
        self.record(VideoCall::Destroy);
    }
}

struct FakeVideoInjector(FakeVideoApi);

#[async_trait]
impl ApiInjector<dyn VideoWidgetApi> for FakeVideoInjector {
    async fn inject(&self) -> Result<Arc<dyn VideoWidgetApi>, LoadError> {
        self.0.inner.injections.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(self.0.clone()))
    }
}

pub fn video_loader(api: &FakeVideoApi) -> Arc<ApiLoader<dyn VideoWidgetApi>> {
    Arc::new(ApiLoader::new(
        "video-widget",
        Arc::new(FakeVideoInjector(api.clone())),
    ))
}

// ---------------------------------------------------------------------------
// Audio widget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Bind(AudioWidgetEventKind),
    Unbind(AudioWidgetEventKind),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
}

#[derive(Default)]
struct AudioInner {
    ready_immediately: bool,
    calls: Mutex<Vec<AudioCall>>,
    listeners: Mutex<HashMap<AudioWidgetEventKind, AudioWidgetListener>>,
    answers: Mutex<Option<(f64, f64)>>,
    /// Replies to queries that were never answered, kept alive on purpose
    unanswered: Mutex<Vec<QueryReply>>,
    injection_failure: Mutex<Option<String>>,
    injections: AtomicUsize,
}

#[derive(Clone)]
pub struct FakeAudioApi {
    inner: Arc<AudioInner>,
}

impl FakeAudioApi {
    /// Widgets report ready as soon as the ready event is bound
    pub fn ready_immediately() -> Self {
        Self::with_mode(true)
    }

    pub fn manual() -> Self {
        Self::with_mode(false)
    }

    fn with_mode(ready_immediately: bool) -> Self {
        Self {
            inner: Arc::new(AudioInner {
                ready_immediately,
                ..Default::default()
            }),
        }
    }

    /// Answer position/duration queries with these millisecond values.
    /// Without this, queries are never answered.
    pub fn answer_queries(&self, position_ms: f64, duration_ms: f64) {
        *self.inner.answers.lock() = Some((position_ms, duration_ms));
    }

    pub fn fail_next_injection(&self, reason: &str) {
        *self.inner.injection_failure.lock() = Some(reason.to_string());
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.inner.calls.lock().clone()
    }

    pub fn injections(&self) -> usize {
        self.inner.injections.load(Ordering::SeqCst)
    }

    /// Deliver through the last listener bound for the event's kind
    pub fn fire(&self, event: AudioWidgetEvent) {
        let listener = self.inner.listeners.lock().get(&event.kind()).cloned();
        if let Some(listener) = listener {
            listener(event);
        }
    }
}

impl AudioWidgetApi for FakeAudioApi {
    fn create_widget(&self, _track_url: &str) -> Result<Box<dyn AudioWidget>, String> {
        Ok(Box::new(FakeAudioWidget {
            inner: self.inner.clone(),
        }))
    }
}

struct FakeAudioWidget {
    inner: Arc<AudioInner>,
}

impl FakeAudioWidget {
    fn record(&self, call: AudioCall) {
        self.inner.calls.lock().push(call);
    }

    fn answer(&self, reply: QueryReply, pick: impl FnOnce((f64, f64)) -> f64) {
        let answers = *self.inner.answers.lock();
        match answers {
            Some(values) => reply(pick(values)),
            None => self.inner.unanswered.lock().push(reply),
        }
    }
}

impl AudioWidget for FakeAudioWidget {
    fn bind(&self, kind: AudioWidgetEventKind, listener: AudioWidgetListener) {
        self.record(AudioCall::Bind(kind));
        self.inner.listeners.lock().insert(kind, listener.clone());
        if kind == AudioWidgetEventKind::Ready && self.inner.ready_immediately {
            listener(AudioWidgetEvent::Ready);
        }
    }

    // Listeners stay in the map so `fire` can simulate a late callback
    fn unbind(&self, kind: AudioWidgetEventKind) {
        self.record(AudioCall::Unbind(kind));
    }

    fn play(&self) {
        self.record(AudioCall::Play);
    }

    fn pause(&self) {
        self.record(AudioCall::Pause);
    }

    fn seek_to(&self, milliseconds: f64) {
        self.record(AudioCall::Seek(milliseconds));
    }

    fn set_volume(&self, volume: f64) {
        self.record(AudioCall::SetVolume(volume));
    }

    fn get_position(&self, reply: QueryReply) {
        self.answer(reply, |(position, _)| position);
    }

    fn get_duration(&self, reply: QueryReply) {
        self.answer(reply, |(_, duration)| duration);
    }
}

struct FakeAudioInjector(FakeAudioApi);

#[async_trait]
impl ApiInjector<dyn AudioWidgetApi> for FakeAudioInjector {
    async fn inject(&self) -> Result<Arc<dyn AudioWidgetApi>, LoadError> {
        let inner = &self.0.inner;
        inner.injections.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = inner.injection_failure.lock().take() {
            return Err(LoadError::Injection {
                provider: "audio-widget",
                reason,
            });
        }
        Ok(Arc::new(self.0.clone()))
    }
}

pub fn audio_loader(api: &FakeAudioApi) -> Arc<ApiLoader<dyn AudioWidgetApi>> {
    Arc::new(ApiLoader::new(
        "audio-widget",
        Arc::new(FakeAudioInjector(api.clone())),
    ))
}
