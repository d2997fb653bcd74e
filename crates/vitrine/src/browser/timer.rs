//! Drives widget `tick()` from browser timeouts.

use gloo_timers::callback::Timeout;
use vitrine_core::Deadline;

/// One pending timeout, re-armed at the widget's next deadline after every
/// state change.
#[derive(Debug, Default)]
pub struct Scheduler {
    timeout: Option<Timeout>,
    armed_at: Option<f64>,
}

impl Scheduler {
    /// No timeout pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timeout for `deadline`, replacing any pending one. `None`
    /// cancels. A deadline already armed is left running.
    pub fn schedule<F>(&mut self, deadline: Option<Deadline>, now_ms: f64, on_due: F)
    where
        F: FnOnce() + 'static,
    {
        let Some(deadline) = deadline else {
            self.cancel();
            return;
        };
        if self.timeout.is_some() && self.armed_at == Some(deadline.at_ms()) {
            return;
        }
        let delay = (deadline.at_ms() - now_ms).max(0.0).ceil() as u32;
        self.timeout = Some(Timeout::new(delay, on_due));
        self.armed_at = Some(deadline.at_ms());
    }

    /// Cancel the pending timeout. Dropping a `Timeout` clears it.
    pub fn cancel(&mut self) {
        self.timeout = None;
        self.armed_at = None;
    }

    /// Whether a timeout is pending.
    pub const fn is_pending(&self) -> bool {
        self.timeout.is_some()
    }
}
