//! Easing curves and time-based tweens.
//!
//! Tweens are driven by absolute clock readings rather than frame deltas, so
//! a host that ticks irregularly (timeouts, animation frames, tests) sees the
//! same curve.

use serde::{Deserialize, Serialize};

// =============================================================================
// Easing Functions - TESTS FIRST
// =============================================================================

/// Easing curves used by widget animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Quadratic ease out
    EaseOut,
    /// Cubic ease out, `1 - (1 - t)^3`
    CubicOut,
    /// Cubic ease in and out
    CubicInOut,
}

impl Easing {
    /// Apply the curve to normalized time, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

// =============================================================================
// Tween - value animated between two points in time
// =============================================================================

/// A value moving from `from` to `to` over `duration_ms`, started at
/// `started_at_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    /// Start value
    pub from: f64,
    /// End value
    pub to: f64,
    /// Clock reading when the tween started
    pub started_at_ms: f64,
    /// Total duration
    pub duration_ms: f64,
    /// Curve
    pub easing: Easing,
}

impl Tween {
    /// Start a tween now.
    #[must_use]
    pub const fn new(from: f64, to: f64, started_at_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            started_at_ms,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    /// Set the curve.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized progress at `now_ms`.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms > 0.0 {
            ((now_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Value at `now_ms`.
    #[must_use]
    pub fn value_at(&self, now_ms: f64) -> f64 {
        let eased = self.easing.apply(self.progress(now_ms));
        (self.to - self.from).mul_add(eased, self.from)
    }

    /// Whether the tween reached its end value.
    #[must_use]
    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
