//! Easing curves for preset transitions

use serde::{Deserialize, Serialize};

/// Maps transition progress to blend weight
pub trait Ease {
    fn ease(&self, t: f32) -> f32;
}

impl<F: Fn(f32) -> f32> Ease for F {
    fn ease(&self, t: f32) -> f32 {
        self(t)
    }
}

/// Built-in easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseInQuad,
    #[default]
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    pub fn all() -> &'static [Easing] {
        &[
            Easing::Linear,
            Easing::EaseInQuad,
            Easing::EaseOutQuad,
            Easing::EaseInOutQuad,
            Easing::EaseInCubic,
            Easing::EaseOutCubic,
            Easing::EaseInOutCubic,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Easing::Linear => "Linear",
            Easing::EaseInQuad => "Ease in (quad)",
            Easing::EaseOutQuad => "Ease out (quad)",
            Easing::EaseInOutQuad => "Ease in-out (quad)",
            Easing::EaseInCubic => "Ease in (cubic)",
            Easing::EaseOutCubic => "Ease out (cubic)",
            Easing::EaseInOutCubic => "Ease in-out (cubic)",
        }
    }

    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
        }
    }
}

impl Ease for Easing {
    fn ease(&self, t: f32) -> f32 {
        self.apply(t)
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Blend `a` toward `b` by weight `w`. Exact at both ends.
pub fn lerp(a: f32, b: f32, w: f32) -> f32 {
    a * (1.0 - w) + b * w
}
