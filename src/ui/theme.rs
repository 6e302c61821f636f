//! Palette and widget styles
//!
//! The shell always runs the dark theme; the EQ canvas uses its own fixed
//! colors so a painted curve looks the same on any host surface.

use iced::color;
use iced::widget::{button, container, pick_list};
use iced::{Background, Border, Color, Shadow, Theme};

// ============================================================================
// Color Palette
// ============================================================================

pub const BACKGROUND: Color = color!(0x000000);
pub const SURFACE: Color = color!(0x1a1a1a);
pub const SURFACE_HOVER: Color = color!(0x2a2a2a);
pub const BORDER_GRAY: Color = color!(0x282828);
pub const TEXT_MUTED: Color = color!(0x888888);
pub const TEXT_SECONDARY: Color = color!(0xb3b3b3);
pub const TEXT_PRIMARY: Color = color!(0xffffff);

/// Primary accent (pink) - unified EQ curve, active controls
pub const ACCENT_PINK: Color = color!(0xff1493);
pub const ACCENT_PINK_HOVER: Color = color!(0xff69b4);

/// Left channel curve in split-ear mode
pub const CHANNEL_LEFT: Color = color!(0x1e90ff);

/// Right channel curve in split-ear mode
pub const CHANNEL_RIGHT: Color = color!(0xff8c00);

// ============================================================================
// EQ Canvas
// ============================================================================

pub const EQ_BACKGROUND: Color = color!(0x121212);
pub const EQ_GRID: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.08);
pub const EQ_ZERO_LINE: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.25);
pub const EQ_LABEL: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.5);

/// Same color at `alpha` times its opacity
pub fn faded(color: Color, alpha: f32) -> Color {
    Color {
        a: color.a * alpha,
        ..color
    }
}

// ============================================================================
// Container Styles
// ============================================================================

pub fn main_content(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(BACKGROUND)),
        text_color: Some(TEXT_PRIMARY),
        ..Default::default()
    }
}

/// Rounded panel holding the transport or the EQ view
pub fn panel(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(SURFACE)),
        border: Border {
            radius: 12.0.into(),
            width: 1.0,
            color: BORDER_GRAY,
        },
        ..Default::default()
    }
}

// ============================================================================
// Button Styles
// ============================================================================

pub fn primary_button(_theme: &Theme, status: button::Status) -> button::Style {
    let base = button::Style {
        background: Some(Background::Color(ACCENT_PINK)),
        text_color: Color::WHITE,
        border: Border {
            radius: 24.0.into(),
            ..Default::default()
        },
        ..Default::default()
    };

    match status {
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(ACCENT_PINK_HOVER)),
            ..base
        },
        button::Status::Disabled => button::Style {
            background: Some(Background::Color(SURFACE_HOVER)),
            text_color: TEXT_MUTED,
            ..base
        },
        _ => base,
    }
}

/// Transparent with border
pub fn secondary_button(_theme: &Theme, status: button::Status) -> button::Style {
    let base = button::Style {
        background: Some(Background::Color(Color::TRANSPARENT)),
        text_color: TEXT_PRIMARY,
        border: Border {
            radius: 24.0.into(),
            width: 1.0,
            color: BORDER_GRAY,
        },
        ..Default::default()
    };

    match status {
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(SURFACE_HOVER)),
            ..base
        },
        _ => base,
    }
}

// ============================================================================
// Pick List Styles
// ============================================================================

pub fn pick_list_style(_theme: &Theme, status: pick_list::Status) -> pick_list::Style {
    let bg = match status {
        pick_list::Status::Active => Color::from_rgba(1.0, 1.0, 1.0, 0.08),
        pick_list::Status::Hovered => Color::from_rgba(1.0, 1.0, 1.0, 0.12),
        pick_list::Status::Opened { .. } => Color::from_rgba(1.0, 1.0, 1.0, 0.15),
    };

    pick_list::Style {
        text_color: TEXT_PRIMARY,
        placeholder_color: TEXT_MUTED,
        handle_color: TEXT_SECONDARY,
        background: Background::Color(bg),
        border: Border {
            radius: 8.0.into(),
            width: 1.0,
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.1),
        },
    }
}

pub fn pick_list_menu(_theme: &Theme) -> iced::overlay::menu::Style {
    iced::overlay::menu::Style {
        text_color: TEXT_PRIMARY,
        background: Background::Color(Color::from_rgb(0.15, 0.15, 0.15)),
        border: Border {
            radius: 8.0.into(),
            width: 1.0,
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.1),
        },
        selected_text_color: TEXT_PRIMARY,
        selected_background: Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1)),
        shadow: Shadow::default(),
    }
}
