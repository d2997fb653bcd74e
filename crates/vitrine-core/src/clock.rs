//! Time sources.
//!
//! Widgets never sleep or schedule: they record deadlines against a
//! [`Clock`] and compare on the next `tick()`. The host decides when to tick
//! (browser timeouts, tests advancing a [`ManualClock`]).

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> f64;
}

/// Wall clock for the current platform.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl SystemClock {
    /// Create a clock starting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Hand-driven clock for tests and replay.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared clock at time zero.
    #[must_use]
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Move time forward.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms.max(0.0));
    }

    /// Jump to an absolute time.
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// A point in time after which something should happen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    at_ms: f64,
}

impl Deadline {
    /// Deadline `delay_ms` after `now_ms`.
    #[must_use]
    pub fn after(now_ms: f64, delay_ms: f64) -> Self {
        Self {
            at_ms: now_ms + delay_ms.max(0.0),
        }
    }

    /// Absolute due time.
    #[must_use]
    pub const fn at_ms(&self) -> f64 {
        self.at_ms
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms >= self.at_ms
    }

    /// Time left until due, zero when past.
    #[must_use]
    pub fn remaining(&self, now_ms: f64) -> f64 {
        (self.at_ms - now_ms).max(0.0)
    }
}
