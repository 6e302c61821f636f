//! Source adapters behind one control contract
//!
//! - `source`: descriptors produced by source resolution
//! - `contract`: the `PlaybackAdapter` trait every adapter implements
//! - `events`: lifecycle events reported to the adapter's owner
//! - `embedded` / `video_widget` / `audio_widget`: the three adapters
//! - `loader`: lazy, process-wide loading of widget APIs
//! - `host`: turns a descriptor into the right adapter

mod audio_widget;
mod contract;
pub mod element;
mod embedded;
pub mod events;
mod host;
mod lifecycle;
mod loader;
mod source;
mod video_widget;

#[cfg(test)]
pub(crate) mod testing;

pub use audio_widget::{
    AudioWidget, AudioWidgetAdapter, AudioWidgetApi, AudioWidgetEvent, AudioWidgetEventKind,
    AudioWidgetListener, DEFAULT_QUERY_TIMEOUT, QueryReply,
};
pub use contract::PlaybackAdapter;
pub use element::{ElementEvent, ElementListener, MediaElement, NativeElement};
pub use embedded::EmbeddedAdapter;
pub use events::{
    AdapterEvent, AdapterEventReceiver, AdapterEventSender, PlaybackState, adapter_event_channel,
};
pub use host::{ElementFactory, MediaHost};
pub use loader::{ApiInjector, ApiLoader};
pub use source::{AudioSourceDescriptor, DescriptorError, SourceType};
pub use video_widget::{
    VideoPlayer, VideoPlayerEvent, VideoPlayerListener, VideoPlayerState, VideoWidgetAdapter,
    VideoWidgetApi,
};
