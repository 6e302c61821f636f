//! Video-widget adapter
//!
//! The provider's API is injected lazily through a shared [`ApiLoader`]; the
//! player is only constructed once the API has signalled global readiness.
//! Position and duration are synchronous getters on the player.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::contract::{PlaybackAdapter, seconds_or_zero, unit_volume};
use super::events::{AdapterEventSender, PlaybackState};
use super::lifecycle::{AdapterCore, Binding, Signal};
use super::loader::ApiLoader;
use super::source::AudioSourceDescriptor;
use crate::error::LoadError;

const PROVIDER: &str = "video-widget";

/// Player states as numbered by the widget API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl VideoPlayerState {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }

    fn playback_state(self) -> Option<PlaybackState> {
        match self {
            Self::Playing => Some(PlaybackState::Playing),
            Self::Paused => Some(PlaybackState::Paused),
            Self::Ended => Some(PlaybackState::Finished),
            Self::Unstarted | Self::Buffering | Self::Cued => None,
        }
    }
}

/// Events a video player raises
#[derive(Debug, Clone, PartialEq)]
pub enum VideoPlayerEvent {
    Ready,
    StateChange(VideoPlayerState),
    Error(i32),
}

pub type VideoPlayerListener = Arc<dyn Fn(VideoPlayerEvent) + Send + Sync>;

/// The loaded widget API
pub trait VideoWidgetApi: Send + Sync {
    /// Construct a player for `video_id`, delivering its events to `listener`
    fn create_player(
        &self,
        video_id: &str,
        listener: VideoPlayerListener,
    ) -> Result<Box<dyn VideoPlayer>, String>;
}

/// One embedded video player
pub trait VideoPlayer: Send + Sync {
    fn play_video(&self);
    fn pause_video(&self);
    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool);
    /// Volume in `0..=100`
    fn set_volume(&self, volume: u8);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    /// Remove the player and every listener it holds
    fn destroy(&self);
}

pub struct VideoWidgetAdapter {
    core: Arc<AdapterCore>,
    loader: Arc<ApiLoader<dyn VideoWidgetApi>>,
    player: Mutex<Option<Box<dyn VideoPlayer>>>,
}

impl VideoWidgetAdapter {
    pub fn new(
        descriptor: AudioSourceDescriptor,
        loader: Arc<ApiLoader<dyn VideoWidgetApi>>,
        events: AdapterEventSender,
    ) -> Self {
        Self {
            core: Arc::new(AdapterCore::new(PROVIDER, descriptor, events)),
            loader,
            player: Mutex::new(None),
        }
    }

    fn with_ready_player(&self, op: &str, f: impl FnOnce(&dyn VideoPlayer)) {
        if !self.core.is_ready() {
            tracing::debug!("{}: ignoring {} before ready", PROVIDER, op);
            return;
        }
        if let Some(player) = self.player.lock().as_deref() {
            f(player);
        }
    }

    fn read(&self, f: impl FnOnce(&dyn VideoPlayer) -> f64) -> f64 {
        if !self.core.is_ready() {
            return 0.0;
        }
        self.player
            .lock()
            .as_deref()
            .map(|player| seconds_or_zero(f(player)))
            .unwrap_or(0.0)
    }

    fn listener(&self, generation: u64) -> VideoPlayerListener {
        let core = self.core.clone();
        Arc::new(move |event: VideoPlayerEvent| {
            let signal = match event {
                VideoPlayerEvent::Ready => Signal::Ready,
                VideoPlayerEvent::StateChange(state) => match state.playback_state() {
                    Some(playback) => Signal::State(playback),
                    None => return,
                },
                VideoPlayerEvent::Error(code) => Signal::Failed(LoadError::Widget {
                    provider: PROVIDER,
                    code,
                }),
            };
            let _ = core.dispatch(generation, signal);
        })
    }

    fn release_player(&self) {
        if let Some(player) = self.player.lock().take() {
            player.destroy();
        }
    }
}

#[async_trait]
impl PlaybackAdapter for VideoWidgetAdapter {
    fn descriptor(&self) -> &AudioSourceDescriptor {
        self.core.descriptor()
    }

    async fn initialize(&self) -> Result<(), LoadError> {
        let (generation, ready) = match self.core.bind()? {
            Binding::Ready => return Ok(()),
            Binding::Joined { ready } => return self.core.await_ready(ready).await,
            Binding::Opened { generation, ready } => (generation, ready),
        };

        let video_id = self.core.descriptor().media_locator.trim().to_string();
        if video_id.is_empty() {
            let error = LoadError::InvalidLocator(video_id);
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

        // Torn down (or re-initialized) while the api was loading
        if !self.core.is_current(generation) {
            return Err(LoadError::TornDown);
        }

        tracing::info!("{}: creating player for {}", PROVIDER, video_id);
        let player = match api.create_player(&video_id, self.listener(generation)) {
            Ok(player) => player,
            Err(reason) => {
                let error = LoadError::Injection {
                    provider: PROVIDER,
                    reason,
                };
                self.core.fail(generation, error.clone());
                return Err(error);
            }
        };

        // Replace any player left over from a failed attempt
        if let Some(old) = self.player.lock().replace(player) {
            old.destroy();
        }
        if self.core.is_torn_down() {
            self.release_player();
            return Err(LoadError::TornDown);
        }

        self.core.await_ready(ready).await
    }

    fn play(&self) {
        self.with_ready_player("play", |p| p.play_video());
    }

    fn pause(&self) {
        self.with_ready_player("pause", |p| p.pause_video());
    }

    fn seek_to(&self, seconds: f64) {
        self.with_ready_player("seek", |p| p.seek_to(seconds.max(0.0), true));
    }

    fn set_volume(&self, volume: f32) {
        let scaled = (unit_volume(volume) * 100.0).round() as u8;
        self.with_ready_player("set_volume", |p| p.set_volume(scaled));
    }

    async fn current_position(&self) -> f64 {
        self.read(|p| p.current_time())
    }

    async fn duration(&self) -> f64 {
        self.read(|p| p.duration())
    }

    fn teardown(&self) {
        if self.core.teardown() {
            tracing::debug!("{}: torn down", PROVIDER);
        }
        self.release_player();
    }
}

impl Drop for VideoWidgetAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}
