//! EQ curve painter
//!
//! Painting is a pure function of the snapshot and the surface size. Nothing
//! is cached between calls, so a resized surface simply paints at its new
//! size.

use iced::{Color, Point, Size};

use super::surface::{PathCommand, Surface, TextAnchor};
use crate::eq::{BAND_COUNT, BandGains, EqSnapshot, control_points};
use crate::ui::theme;

/// Grid cells along each axis
pub const GRID_DIVISIONS: usize = 12;

/// Gain shown at the top and bottom of the drawable band
pub const GAIN_RANGE_DB: f32 = 12.0;

/// Frequency labels and their position as a fraction of the width
pub const FREQUENCY_LABELS: [(&str, f32); 5] = [
    ("20Hz", 0.05),
    ("100Hz", 0.25),
    ("1kHz", 0.5),
    ("5kHz", 0.75),
    ("20kHz", 0.95),
];

/// Opacity of the curves while the EQ is switched off
pub const DISABLED_ALPHA: f32 = 0.4;

pub const CURVE_WIDTH: f32 = 2.5;
pub const POINT_RADIUS: f32 = 4.0;
const GRID_WIDTH: f32 = 1.0;
const ZERO_LINE_WIDTH: f32 = 1.5;
const LABEL_SIZE: f32 = 10.0;

/// Vertical pixel position for `gain` on a surface `height` pixels tall.
///
/// Full range leaves a 10% margin at the top and bottom; gains past the range
/// are clamped, non-finite gains draw at zero.
pub fn gain_to_y(gain: f32, height: f32) -> f32 {
    let gain = if gain.is_finite() { gain } else { 0.0 };
    let gain = gain.clamp(-GAIN_RANGE_DB, GAIN_RANGE_DB);
    let center = height / 2.0;
    center - gain / GAIN_RANGE_DB * (center - height * 0.1)
}

/// Paint one frame of the EQ view
pub fn paint<S: Surface + ?Sized>(surface: &mut S, snapshot: &EqSnapshot) {
    let size = surface.size();
    if !(size.width > 0.0 && size.height > 0.0) {
        return;
    }

    surface.clear();
    surface.fill_rect(Point::ORIGIN, size, theme::EQ_BACKGROUND);
    paint_grid(surface, size);
    paint_labels(surface, size);

    let alpha = if snapshot.eq_enabled {
        1.0
    } else {
        DISABLED_ALPHA
    };

    if snapshot.split_ear {
        paint_curve(surface, size, &snapshot.left, theme::faded(theme::CHANNEL_LEFT, alpha));
        paint_curve(surface, size, &snapshot.right, theme::faded(theme::CHANNEL_RIGHT, alpha));
        paint_legend(surface);
    } else {
        paint_curve(surface, size, &snapshot.unified, theme::faded(theme::ACCENT_PINK, alpha));
    }
}

fn line(from: Point, to: Point) -> [PathCommand; 2] {
    [PathCommand::MoveTo(from), PathCommand::LineTo(to)]
}

fn paint_grid<S: Surface + ?Sized>(surface: &mut S, size: Size) {
    let Size { width, height } = size;

    for i in 0..=GRID_DIVISIONS {
        let x = width * i as f32 / GRID_DIVISIONS as f32;
        surface.stroke_path(
            &line(Point::new(x, 0.0), Point::new(x, height)),
            theme::EQ_GRID,
            GRID_WIDTH,
        );
    }
    for i in 0..=GRID_DIVISIONS {
        let y = height * i as f32 / GRID_DIVISIONS as f32;
        surface.stroke_path(
            &line(Point::new(0.0, y), Point::new(width, y)),
            theme::EQ_GRID,
            GRID_WIDTH,
        );
    }

    // 0 dB reference
    let center = height / 2.0;
    surface.stroke_path(
        &line(Point::new(0.0, center), Point::new(width, center)),
        theme::EQ_ZERO_LINE,
        ZERO_LINE_WIDTH,
    );
}

fn paint_labels<S: Surface + ?Sized>(surface: &mut S, size: Size) {
    let y = size.height - LABEL_SIZE;
    for (label, fraction) in FREQUENCY_LABELS {
        surface.fill_text(
            label,
            Point::new(size.width * fraction, y),
            LABEL_SIZE,
            theme::EQ_LABEL,
            TextAnchor::Middle,
        );
    }
}

fn paint_curve<S: Surface + ?Sized>(surface: &mut S, size: Size, gains: &BandGains, color: Color) {
    let flat;
    let gains = if gains.is_empty() {
        flat = BandGains::flat(BAND_COUNT);
        &flat
    } else {
        gains
    };

    let points: Vec<Point> = control_points(gains)
        .into_iter()
        .map(|p| Point::new(p.x * size.width, gain_to_y(p.gain, size.height)))
        .collect();
    let [first, .., last_control, last] = points.as_slice() else {
        return;
    };

    // Quadratic joins through the midpoints keep the curve smooth at each band
    let mut path = vec![PathCommand::MoveTo(*first)];
    for pair in points[1..points.len() - 1].windows(2) {
        let (control, next) = (pair[0], pair[1]);
        let mid = Point::new((control.x + next.x) / 2.0, (control.y + next.y) / 2.0);
        path.push(PathCommand::QuadTo { control, to: mid });
    }
    path.push(PathCommand::QuadTo {
        control: *last_control,
        to: *last,
    });
    surface.stroke_path(&path, color, CURVE_WIDTH);

    // Band points only; the edge points are implicit
    for point in &points[1..points.len() - 1] {
        surface.fill_circle(*point, POINT_RADIUS, color);
    }
}

fn paint_legend<S: Surface + ?Sized>(surface: &mut S) {
    let entries = [("Left", theme::CHANNEL_LEFT), ("Right", theme::CHANNEL_RIGHT)];
    for (row, (label, color)) in entries.into_iter().enumerate() {
        let y = 14.0 + row as f32 * 16.0;
        surface.fill_circle(Point::new(14.0, y), POINT_RADIUS, color);
        surface.fill_text(label, Point::new(24.0, y), 12.0, color, TextAnchor::Start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::recording::{DrawOp, RecordingSurface};

    fn snapshot(enabled: bool, split: bool) -> EqSnapshot {
        EqSnapshot {
            eq_enabled: enabled,
            split_ear: split,
            unified: BandGains::from([6.0, -3.0, 2.0]),
            left: BandGains::from([12.0, 0.0, 0.0]),
            right: BandGains::from([0.0, 0.0, -12.0]),
        }
    }

    fn curves(surface: &RecordingSurface) -> Vec<(Vec<PathCommand>, Color)> {
        surface
            .paths()
            .into_iter()
            .filter(|(_, _, width)| *width == CURVE_WIDTH)
            .map(|(commands, color, _)| (commands.to_vec(), color))
            .collect()
    }

    #[test]
    fn test_gain_mapping() {
        assert_eq!(gain_to_y(0.0, 200.0), 100.0);
        assert_eq!(gain_to_y(12.0, 200.0), 20.0);
        assert_eq!(gain_to_y(-12.0, 200.0), 180.0);
        assert_eq!(gain_to_y(40.0, 200.0), 20.0);
        assert_eq!(gain_to_y(f32::NAN, 200.0), 100.0);
    }

    #[test]
    fn test_zero_sized_surface_paints_nothing() {
        let mut surface = RecordingSurface::new(0.0, 120.0);
        paint(&mut surface, &snapshot(true, false));
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_unified_frame_layout() {
        let mut surface = RecordingSurface::new(480.0, 240.0);
        paint(&mut surface, &snapshot(true, false));

        assert_eq!(surface.ops[0], DrawOp::Clear);
        // 13 vertical + 13 horizontal grid lines, the zero line, one curve
        assert_eq!(surface.paths().len(), 2 * (GRID_DIVISIONS + 1) + 1 + 1);

        let labels = surface.texts();
        assert_eq!(labels.len(), FREQUENCY_LABELS.len());
        assert_eq!(labels[0].0, "20Hz");
        assert_eq!(labels[0].1.x, 24.0);
        assert_eq!(labels[2].1.x, 240.0);

        let curves = curves(&surface);
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].1, theme::ACCENT_PINK);
        assert_eq!(surface.circles().len(), BAND_COUNT);
    }

    #[test]
    fn test_curve_passes_through_band_points() {
        let mut surface = RecordingSurface::new(400.0, 200.0);
        paint(&mut surface, &snapshot(true, false));

        let centers: Vec<Point> = surface.circles().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            centers,
            vec![
                Point::new(100.0, gain_to_y(6.0, 200.0)),
                Point::new(200.0, gain_to_y(-3.0, 200.0)),
                Point::new(300.0, gain_to_y(2.0, 200.0)),
            ]
        );

        let (path, _) = &curves(&surface)[0];
        assert_eq!(path[0], PathCommand::MoveTo(Point::new(0.0, gain_to_y(6.0, 200.0))));
        assert_eq!(
            path.last(),
            Some(&PathCommand::QuadTo {
                control: Point::new(300.0, gain_to_y(2.0, 200.0)),
                to: Point::new(400.0, gain_to_y(2.0, 200.0)),
            })
        );
    }

    #[test]
    fn test_disabled_eq_fades_curve() {
        let mut surface = RecordingSurface::new(300.0, 150.0);
        paint(&mut surface, &snapshot(false, false));

        let curves = curves(&surface);
        assert_eq!(curves.len(), 1);
        assert!((curves[0].1.a - DISABLED_ALPHA).abs() < 1e-6);
    }

    #[test]
    fn test_split_mode_paints_two_curves_and_legend() {
        let mut surface = RecordingSurface::new(300.0, 150.0);
        paint(&mut surface, &snapshot(true, true));

        let colors: Vec<Color> = curves(&surface).into_iter().map(|(_, c)| c).collect();
        assert_eq!(colors, vec![theme::CHANNEL_LEFT, theme::CHANNEL_RIGHT]);

        let texts: Vec<&str> = surface.texts().into_iter().map(|(t, _)| t).collect();
        assert!(texts.contains(&"Left"));
        assert!(texts.contains(&"Right"));
    }

    #[test]
    fn test_empty_gains_draw_flat_reference() {
        let mut surface = RecordingSurface::new(300.0, 150.0);
        let mut snap = snapshot(true, false);
        snap.unified = BandGains::default();

        paint(&mut surface, &snap);

        let centers: Vec<f32> = surface.circles().into_iter().map(|(p, _)| p.y).collect();
        assert_eq!(centers, vec![75.0; BAND_COUNT]);
    }

    #[test]
    fn test_painting_is_repeatable() {
        let mut a = RecordingSurface::new(320.0, 160.0);
        let mut b = RecordingSurface::new(320.0, 160.0);
        paint(&mut a, &snapshot(false, true));
        paint(&mut b, &snapshot(false, true));
        assert_eq!(a.ops, b.ops);
    }
}
