//! Frequency-response curve model
//!
//! Band `i` of `N` sits at `x = (i + 1) / (N + 1)` on a normalized frequency
//! axis. Two implicit edge points at `x = 0` and `x = 1` repeat the first and
//! last band, so curves never extrapolate past the outermost bands.

use super::easing::{Ease, lerp};
use super::preset::BandGains;

/// One point on the normalized frequency axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Frequency position in `0.0..=1.0`
    pub x: f32,
    /// Gain in dB
    pub gain: f32,
}

impl CurvePoint {
    pub fn new(x: f32, gain: f32) -> Self {
        Self { x, gain }
    }
}

/// Band points plus the two clamped edge points, ordered by `x`
pub fn control_points(gains: &BandGains) -> Vec<CurvePoint> {
    let bands = gains.as_slice();
    let (Some(&first), Some(&last)) = (bands.first(), bands.last()) else {
        return Vec::new();
    };

    let spacing = 1.0 / (bands.len() + 1) as f32;
    let mut points = Vec::with_capacity(bands.len() + 2);
    points.push(CurvePoint::new(0.0, first));
    points.extend(
        bands
            .iter()
            .enumerate()
            .map(|(i, &gain)| CurvePoint::new((i + 1) as f32 * spacing, gain)),
    );
    points.push(CurvePoint::new(1.0, last));
    points
}

/// Gain at `x`, linear between control points. Flat when there are no bands.
pub fn gain_at(gains: &BandGains, x: f32) -> f32 {
    let points = control_points(gains);
    sample(&points, x)
}

fn sample(points: &[CurvePoint], x: f32) -> f32 {
    let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
    let Some(last) = points.last() else {
        return 0.0;
    };

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if x <= b.x {
            let span = b.x - a.x;
            if span <= f32::EPSILON {
                return b.gain;
            }
            return lerp(a.gain, b.gain, (x - a.x) / span);
        }
    }
    last.gain
}

/// Evaluate the curve at `sample_count` evenly spaced positions over `[0, 1]`.
///
/// Zero samples give an empty curve; a single sample is taken at `x = 0`.
pub fn compute_curve_points(gains: &BandGains, sample_count: usize) -> Vec<CurvePoint> {
    let points = control_points(gains);
    match sample_count {
        0 => Vec::new(),
        1 => vec![CurvePoint::new(0.0, sample(&points, 0.0))],
        n => {
            let step = 1.0 / (n - 1) as f32;
            (0..n)
                .map(|k| {
                    let x = if k == n - 1 { 1.0 } else { k as f32 * step };
                    CurvePoint::new(x, sample(&points, x))
                })
                .collect()
        }
    }
}

/// Blend `from` toward `to` in gain space.
///
/// `progress` is clamped to `[0, 1]` before easing. Without `from`, or for
/// bands `from` lacks, the band stays at `to`. The result always has `to`'s
/// length.
pub fn interpolate(
    from: Option<&BandGains>,
    to: &BandGains,
    progress: f32,
    easing: &impl Ease,
) -> BandGains {
    let t = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let weight = easing.ease(t);

    to.as_slice()
        .iter()
        .enumerate()
        .map(|(i, &target)| {
            let start = from.and_then(|f| f.get(i)).unwrap_or(target);
            lerp(start, target, weight)
        })
        .collect::<Vec<_>>()
        .into()
}
