//! Raster drawing surface
//!
//! The curve painter draws through this trait so it can target an iced canvas
//! frame in the shell and a recording surface in tests.

use iced::widget::canvas::{Frame, Path, Stroke, Text};
use iced::{Color, Point, Size};

/// One segment of a stroked path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic curve through `control` ending at `to`
    QuadTo { control: Point, to: Point },
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

pub trait Surface {
    /// Pixel dimensions of the drawable area
    fn size(&self) -> Size;

    fn clear(&mut self);

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color);

    fn stroke_path(&mut self, path: &[PathCommand], color: Color, width: f32);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn fill_text(&mut self, content: &str, position: Point, size: f32, color: Color, anchor: TextAnchor);
}

impl Surface for Frame {
    fn size(&self) -> Size {
        Frame::size(self)
    }

    // Canvas frames start out empty every draw
    fn clear(&mut self) {}

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Color) {
        self.fill_rectangle(top_left, size, color);
    }

    fn stroke_path(&mut self, path: &[PathCommand], color: Color, width: f32) {
        let path = Path::new(|builder| {
            for command in path {
                match *command {
                    PathCommand::MoveTo(point) => builder.move_to(point),
                    PathCommand::LineTo(point) => builder.line_to(point),
                    PathCommand::QuadTo { control, to } => builder.quadratic_curve_to(control, to),
                }
            }
        });
        self.stroke(
            &path,
            Stroke::default().with_color(color).with_width(width),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.fill(&Path::circle(center, radius), color);
    }

    fn fill_text(&mut self, content: &str, position: Point, size: f32, color: Color, anchor: TextAnchor) {
        let align_x = match anchor {
            TextAnchor::Start => iced::alignment::Horizontal::Left,
            TextAnchor::Middle => iced::alignment::Horizontal::Center,
            TextAnchor::End => iced::alignment::Horizontal::Right,
        };
        Frame::fill_text(
            self,
            Text {
                content: content.to_string(),
                position,
                color,
                size: iced::Pixels(size),
                align_x: align_x.into(),
                align_y: iced::alignment::Vertical::Center,
                ..Text::default()
            },
        );
    }
}
