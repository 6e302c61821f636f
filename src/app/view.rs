//! Application view rendering

use std::fmt;

use iced::widget::{Space, button, column, container, pick_list, row, slider, text, toggler};
use iced::{Alignment, Element, Fill};

use super::message::{Channel, Message};
use super::state::{App, SourceStatus};
use crate::eq::Easing;
use crate::render;
use crate::ui::theme;

/// Height of the EQ curve canvas
const EQ_CANVAS_HEIGHT: f32 = 220.0;

/// Preset id paired with its label for pick lists
#[derive(Debug, Clone, PartialEq)]
struct PresetChoice {
    id: String,
    label: String,
}

impl fmt::Display for PresetChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let content = column![
            self.header(),
            self.transport_panel(),
            self.equalizer_panel(),
        ]
        .spacing(16)
        .padding(24)
        .width(Fill);

        container(content)
            .width(Fill)
            .height(Fill)
            .style(theme::main_content)
            .into()
    }

    fn header(&self) -> Element<'_, Message> {
        let (title, author) = match &self.player.descriptor {
            Some(d) => (d.name.as_str(), d.author.as_str()),
            None => ("No source", ""),
        };

        let status = match &self.player.status {
            SourceStatus::Empty => "Pass --file or --descriptor to open a source".to_string(),
            SourceStatus::Loading => "Loading...".to_string(),
            SourceStatus::Ready => String::new(),
            SourceStatus::Failed(reason) => reason.clone(),
        };
        let status_color = match self.player.status {
            SourceStatus::Failed(_) => theme::ACCENT_PINK,
            _ => theme::TEXT_MUTED,
        };

        column![
            text(title).size(24).color(theme::TEXT_PRIMARY),
            text(author).size(14).color(theme::TEXT_SECONDARY),
            text(status).size(12).color(status_color),
        ]
        .spacing(4)
        .into()
    }

    fn transport_panel(&self) -> Element<'_, Message> {
        let ready = self.player.is_ready();
        let play_label = if self.player.is_playing() {
            "Pause"
        } else {
            "Play"
        };
        let play_button = button(text(play_label).size(14))
            .padding([8, 24])
            .style(theme::primary_button)
            .on_press_maybe(ready.then_some(Message::TogglePlayback));

        let duration = self.player.duration;
        let position = self.player.seek_preview.unwrap_or(self.player.position);
        let position_slider = slider(
            0.0..=duration.max(1.0),
            position.min(duration.max(1.0)),
            Message::SeekPreview,
        )
        .on_release(Message::SeekRelease)
        .step(0.1)
        .width(Fill);

        let time = text(format!(
            "{} / {}",
            format_time(position),
            format_time(duration)
        ))
        .size(12)
        .color(theme::TEXT_SECONDARY);

        let volume = slider(
            0.0..=1.0,
            self.settings.playback.volume,
            Message::VolumeChanged,
        )
        .on_release(Message::VolumeReleased)
        .step(0.01)
        .width(120);

        let controls = row![
            play_button,
            Space::new().width(16),
            position_slider,
            Space::new().width(12),
            time,
            Space::new().width(24),
            text("Vol").size(12).color(theme::TEXT_MUTED),
            Space::new().width(8),
            volume,
        ]
        .align_y(Alignment::Center);

        container(controls)
            .padding(16)
            .width(Fill)
            .style(theme::panel)
            .into()
    }

    fn equalizer_panel(&self) -> Element<'_, Message> {
        let visualizer = &self.settings.visualizer;
        let choices = self.preset_choices();

        let mut toolbar = row![
            text("Equalizer").size(18).color(theme::TEXT_PRIMARY),
            Space::new().width(24),
            toggler(visualizer.eq_enabled)
                .label("On")
                .on_toggle(Message::EqEnabledToggled)
                .size(18),
            Space::new().width(16),
            toggler(visualizer.split_ear)
                .label("Split ear")
                .on_toggle(Message::SplitEarToggled)
                .size(18),
            Space::new().width(Fill),
        ]
        .align_y(Alignment::Center)
        .width(Fill);

        if visualizer.split_ear {
            toolbar = toolbar
                .push(preset_picker(
                    &choices,
                    &visualizer.left_preset,
                    Channel::Left,
                ))
                .push(Space::new().width(8))
                .push(preset_picker(
                    &choices,
                    &visualizer.right_preset,
                    Channel::Right,
                ));
        } else {
            toolbar = toolbar.push(preset_picker(&choices, &visualizer.preset, Channel::Unified));
        }

        let easing = pick_list(Easing::all(), Some(visualizer.easing), Message::EasingSelected)
            .text_size(13)
            .padding([6, 12])
            .style(theme::pick_list_style)
            .menu_style(theme::pick_list_menu);

        let footer = row![
            text("Transition").size(12).color(theme::TEXT_MUTED),
            Space::new().width(8),
            easing,
        ]
        .align_y(Alignment::Center);

        let content = column![
            toolbar,
            render::eq_canvas(self.painted.clone(), EQ_CANVAS_HEIGHT),
            footer,
        ]
        .spacing(16);

        container(content)
            .padding(16)
            .width(Fill)
            .style(theme::panel)
            .into()
    }

    fn preset_choices(&self) -> Vec<PresetChoice> {
        self.presets
            .ids()
            .into_iter()
            .map(|id| PresetChoice {
                label: self.presets.display_name(&id).to_string(),
                id,
            })
            .collect()
    }
}

fn preset_picker<'a>(
    choices: &[PresetChoice],
    current: &str,
    channel: Channel,
) -> Element<'a, Message> {
    let selected = choices.iter().find(|c| c.id == current).cloned();

    pick_list(choices.to_vec(), selected, move |choice: PresetChoice| {
        Message::PresetSelected(channel, choice.id)
    })
    .text_size(14)
    .padding([8, 16])
    .style(theme::pick_list_style)
    .menu_style(theme::pick_list_menu)
    .into()
}

/// Format seconds as `m:ss`
fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
