//! Playback control message handlers

use iced::Task;

use crate::app::message::Message;
use crate::app::state::{App, SourceStatus};

impl App {
    /// Handle playback-related messages
    pub fn handle_playback(&mut self, message: &Message) -> Option<Task<Message>> {
        match message {
            Message::SourceInitialized(result) => {
                match result {
                    Ok(()) => {
                        tracing::info!("Source ready");
                        self.player.status = SourceStatus::Ready;
                        if let Some(adapter) = &self.player.adapter {
                            adapter.set_volume(self.settings.playback.volume);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to initialize source: {}", e);
                        self.player.status = SourceStatus::Failed(e.to_string());
                    }
                }
                Some(Task::none())
            }

            Message::TogglePlayback => {
                if !self.player.is_ready() {
                    return Some(Task::none());
                }
                if let Some(adapter) = &self.player.adapter {
                    if self.player.is_playing() {
                        adapter.pause();
                    } else {
                        adapter.play();
                    }
                }
                Some(Task::none())
            }

            Message::SeekPreview(position) => {
                self.player.seek_preview = Some(*position);
                Some(Task::none())
            }

            Message::SeekRelease => {
                let Some(position) = self.player.seek_preview.take() else {
                    return Some(Task::none());
                };
                if let Some(adapter) = &self.player.adapter {
                    tracing::debug!("Seeking to {:.1}s", position);
                    adapter.seek_to(position);
                    self.player.position = position;
                }
                Some(Task::none())
            }

            Message::VolumeChanged(volume) => {
                self.settings.playback.volume = volume.clamp(0.0, 1.0);
                if let Some(adapter) = &self.player.adapter {
                    adapter.set_volume(self.settings.playback.volume);
                }
                Some(Task::none())
            }

            Message::VolumeReleased => {
                tracing::debug!("Volume set to {:.2}", self.settings.playback.volume);
                Some(Task::none())
            }

            Message::PlaybackTick => {
                self.player.drain_events();
                let Some(adapter) = self.player.adapter.clone() else {
                    return Some(Task::none());
                };
                if !self.player.is_ready() {
                    return Some(Task::none());
                }
                Some(Task::perform(
                    async move {
                        futures_util::future::join(adapter.current_position(), adapter.duration())
                            .await
                    },
                    |(position, duration)| Message::PositionUpdated { position, duration },
                ))
            }

            Message::PositionUpdated { position, duration } => {
                self.player.duration = *duration;
                // Keep the end position once finished; widgets may report 0 after ending
                if !matches!(
                    self.player.playback,
                    Some(crate::media::PlaybackState::Finished)
                ) {
                    self.player.position = *position;
                }
                Some(Task::none())
            }

            _ => None,
        }
    }
}
