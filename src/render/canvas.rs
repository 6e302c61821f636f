//! iced canvas program for the EQ view

use iced::widget::canvas::{self, Canvas, Frame, Geometry};
use iced::{Element, Fill, Length, Rectangle, Theme, mouse};

use super::curve::paint;
use crate::eq::EqSnapshot;

/// Paints the last snapshot the scheduler released
pub struct EqCanvas {
    snapshot: EqSnapshot,
}

impl EqCanvas {
    pub fn new(snapshot: EqSnapshot) -> Self {
        Self { snapshot }
    }
}

impl<Message> canvas::Program<Message> for EqCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        paint(&mut frame, &self.snapshot);
        vec![frame.into_geometry()]
    }
}

pub fn eq_canvas<'a, Message: 'a>(snapshot: EqSnapshot, height: f32) -> Element<'a, Message> {
    Canvas::new(EqCanvas::new(snapshot))
        .width(Fill)
        .height(Length::Fixed(height))
        .into()
}
