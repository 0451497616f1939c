//! Easing functions
//!
//! Maps linear phase progress onto the non-linear curve the visualizer draws.

use serde::{Deserialize, Serialize};

/// Easing functions for breath amplitude
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing (constant speed)
    Linear,

    /// Hermite smoothstep, zero velocity at both ends
    #[default]
    SmoothStep,

    /// Ken Perlin's smootherstep, zero velocity and acceleration at both ends
    SmootherStep,

    /// Half a cosine wave
    Sine,

    /// Cubic ease in and out
    EaseInOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::SmootherStep => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
            Self::Sine => (1.0 - (t * std::f64::consts::PI).cos()) / 2.0,
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
