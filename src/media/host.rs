//! Resolution of source descriptors into adapters
//!
//! This is the only place that branches on [`SourceType`]. Everything after
//! `create_adapter` talks to the returned [`PlaybackAdapter`].

use std::sync::Arc;
use std::time::Duration;

use super::audio_widget::{AudioWidgetAdapter, AudioWidgetApi, DEFAULT_QUERY_TIMEOUT};
use super::contract::PlaybackAdapter;
use super::element::{MediaElement, NativeElement};
use super::embedded::EmbeddedAdapter;
use super::events::AdapterEventSender;
use super::loader::ApiLoader;
use super::source::{AudioSourceDescriptor, SourceType};
use super::video_widget::{VideoWidgetAdapter, VideoWidgetApi};
use crate::error::UnsupportedSourceError;

/// Builds a fresh media element for each embedded adapter
pub type ElementFactory = Arc<dyn Fn() -> Box<dyn MediaElement> + Send + Sync>;

/// Playback surfaces available to this process
pub struct MediaHost {
    element_factory: ElementFactory,
    video: Option<Arc<ApiLoader<dyn VideoWidgetApi>>>,
    audio: Option<Arc<ApiLoader<dyn AudioWidgetApi>>>,
    query_timeout: Duration,
}

impl Default for MediaHost {
    fn default() -> Self {
        Self::native()
    }
}

impl MediaHost {
    pub fn new(element_factory: ElementFactory) -> Self {
        Self {
            element_factory,
            video: None,
            audio: None,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Host whose embedded sources play through the local output device
    pub fn native() -> Self {
        Self::new(Arc::new(|| -> Box<dyn MediaElement> {
            Box::new(NativeElement::new())
        }))
    }

    /// Register the shared loader for the video widget provider
    pub fn with_video_widget(mut self, loader: Arc<ApiLoader<dyn VideoWidgetApi>>) -> Self {
        self.video = Some(loader);
        self
    }

    /// Register the shared loader for the audio widget provider
    pub fn with_audio_widget(mut self, loader: Arc<ApiLoader<dyn AudioWidgetApi>>) -> Self {
        self.audio = Some(loader);
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn supports(&self, source_type: SourceType) -> bool {
        match source_type {
            SourceType::Embedded => true,
            SourceType::VideoWidget => self.video.is_some(),
            SourceType::AudioWidget => self.audio.is_some(),
        }
    }

    /// Build the adapter for `descriptor`. The adapter is not initialized.
    pub fn create_adapter(
        &self,
        descriptor: AudioSourceDescriptor,
        events: AdapterEventSender,
    ) -> Result<Arc<dyn PlaybackAdapter>, UnsupportedSourceError> {
        let source_type = descriptor.source_type;
        tracing::debug!("Creating {} adapter for {}", source_type, descriptor.name);

        match source_type {
            SourceType::Embedded => Ok(Arc::new(EmbeddedAdapter::new(
                descriptor,
                (self.element_factory)(),
                events,
            ))),
            SourceType::VideoWidget => match &self.video {
                Some(loader) => Ok(Arc::new(VideoWidgetAdapter::new(
                    descriptor,
                    loader.clone(),
                    events,
                ))),
                None => Err(UnsupportedSourceError(source_type.to_string())),
            },
            SourceType::AudioWidget => match &self.audio {
                Some(loader) => Ok(Arc::new(
                    AudioWidgetAdapter::new(descriptor, loader.clone(), events)
                        .with_query_timeout(self.query_timeout),
                )),
                None => Err(UnsupportedSourceError(source_type.to_string())),
            },
        }
    }
}
