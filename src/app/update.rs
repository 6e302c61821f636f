//! Message update handlers - thin dispatcher delegating to submodules

mod equalizer;
mod playback;

use iced::Task;

use super::{App, Message};
use crate::render::RenderRequest;

impl App {
    /// Handle a message, then persist settings if it changed any
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let persist = message.persists_settings();
        let task = self.dispatch(message);
        if persist {
            task.chain(Task::done(Message::SaveSettings))
        } else {
            task
        }
    }

    /// Delegate to the submodule handlers
    fn dispatch(&mut self, message: Message) -> Task<Message> {
        if let Some(task) = self.handle_playback(&message) {
            return task;
        }
        if let Some(task) = self.handle_equalizer(&message) {
            return task;
        }

        match message {
            Message::Frame(now) => {
                self.on_frame(now);
                Task::none()
            }
            Message::SaveSettings => {
                if let Err(e) = self.settings.save() {
                    tracing::error!("Failed to save settings: {}", e);
                } else {
                    tracing::debug!("Settings saved");
                }
                Task::none()
            }
            _ => Task::none(),
        }
    }

    /// Queue a paint of the current EQ state for the next frame
    pub(super) fn request_paint(&mut self) {
        self.scheduler.request(RenderRequest {
            snapshot: self.eq.snapshot(),
        });
    }

    /// Advance any running transition, then release at most one paint
    fn on_frame(&mut self, now: iced::time::Instant) {
        if self.eq.is_animating() {
            self.eq.tick(now);
            self.request_paint();
        }
        if let Some(request) = self.scheduler.on_frame(now) {
            self.painted = request.snapshot;
        }
    }
}
