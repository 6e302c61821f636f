//! Curve renderer
//!
//! - `surface`: drawing primitives the painter needs
//! - `curve`: the painter itself
//! - `scheduler`: frame-gated, coalescing paint scheduling
//! - `canvas`: iced canvas glue

mod canvas;
mod curve;
mod scheduler;
mod surface;

pub use canvas::{EqCanvas, eq_canvas};
pub use curve::{
    CURVE_WIDTH, DISABLED_ALPHA, FREQUENCY_LABELS, GAIN_RANGE_DB, GRID_DIVISIONS, POINT_RADIUS,
    gain_to_y, paint,
};
pub use scheduler::{DEFAULT_FRAME_INTERVAL, FrameLoop, FrameTicket, RenderRequest, RenderScheduler};
pub use surface::{PathCommand, Surface, TextAnchor};
