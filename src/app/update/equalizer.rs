//! Equalizer view message handlers

use iced::Task;

use crate::app::message::{Channel, Message};
use crate::app::state::App;
use crate::eq::PresetLookup;

impl App {
    /// Handle EQ preset and display messages
    pub fn handle_equalizer(&mut self, message: &Message) -> Option<Task<Message>> {
        match message {
            Message::PresetSelected(channel, id) => {
                let gains = self.presets.resolve(id);
                let visualizer = &mut self.settings.visualizer;
                match channel {
                    Channel::Unified => {
                        visualizer.preset = id.clone();
                        self.eq.set_unified(gains);
                    }
                    Channel::Left => {
                        visualizer.left_preset = id.clone();
                        self.eq.set_left(gains);
                    }
                    Channel::Right => {
                        visualizer.right_preset = id.clone();
                        self.eq.set_right(gains);
                    }
                }
                tracing::info!("EQ preset {:?} -> {}", channel, id);
                self.request_paint();
                Some(Task::none())
            }

            Message::EqEnabledToggled(enabled) => {
                self.settings.visualizer.eq_enabled = *enabled;
                self.eq.set_enabled(*enabled);
                self.request_paint();
                Some(Task::none())
            }

            Message::SplitEarToggled(split) => {
                self.settings.visualizer.split_ear = *split;
                self.eq.set_split_ear(*split);
                self.request_paint();
                Some(Task::none())
            }

            Message::EasingSelected(easing) => {
                self.settings.visualizer.easing = *easing;
                self.eq.set_easing(*easing);
                self.request_paint();
                Some(Task::none())
            }

            _ => None,
        }
    }
}
