//! Cross-instance open cooldown.
//!
//! On touch screens the pointer-up that picks an option in one dropdown can
//! land on another select's toggle once the first dropdown collapses. Every
//! select on a page shares one [`OpenCooldown`]: a committed pick arms it,
//! and `open()` is refused while it is armed.

use crate::clock::{Clock, Deadline, SystemClock};
use std::cell::Cell;
use std::rc::Rc;

/// Default window after a pick during which no select may open.
pub const DEFAULT_OPEN_COOLDOWN_MS: f64 = 100.0;

/// Shared "recently picked" window.
pub struct OpenCooldown {
    clock: Rc<dyn Clock>,
    blocked_until: Cell<Option<Deadline>>,
}

impl std::fmt::Debug for OpenCooldown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenCooldown")
            .field("blocked_until", &self.blocked_until.get())
            .finish_non_exhaustive()
    }
}

thread_local! {
    static SHARED: Rc<OpenCooldown> = Rc::new(OpenCooldown::new(Rc::new(SystemClock::new())));
}

impl OpenCooldown {
    /// Create a cooldown reading time from `clock`.
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            blocked_until: Cell::new(None),
        }
    }

    /// The page-wide instance for the current thread (the UI thread).
    #[must_use]
    pub fn shared() -> Rc<Self> {
        SHARED.with(Rc::clone)
    }

    /// Arm the cooldown for `duration_ms`.
    ///
    /// Returns `false` and leaves the current window untouched when already
    /// blocked.
    pub fn try_acquire(&self, duration_ms: f64) -> bool {
        if self.is_blocked() {
            return false;
        }
        let now = self.clock.now_ms();
        self.blocked_until.set(Some(Deadline::after(now, duration_ms)));
        tracing::trace!(duration_ms, "open cooldown armed");
        true
    }

    /// Whether opening is currently refused.
    pub fn is_blocked(&self) -> bool {
        match self.blocked_until.get() {
            Some(deadline) if !deadline.is_due(self.clock.now_ms()) => true,
            Some(_) => {
                self.blocked_until.set(None);
                false
            }
            None => false,
        }
    }

    /// Clear the window early.
    pub fn release(&self) {
        self.blocked_until.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn cooldown() -> (Rc<ManualClock>, OpenCooldown) {
        let clock = ManualClock::shared();
        let cd = OpenCooldown::new(clock.clone());
        (clock, cd)
    }

    #[test]
    fn test_initially_free() {
        let (_, cd) = cooldown();
        assert!(!cd.is_blocked());
    }

    #[test]
    fn test_acquire_blocks_for_duration() {
        let (clock, cd) = cooldown();
        assert!(cd.try_acquire(100.0));
        assert!(cd.is_blocked());
        clock.advance(99.0);
        assert!(cd.is_blocked());
        clock.advance(1.0);
        assert!(!cd.is_blocked());
    }

    #[test]
    fn test_acquire_while_blocked_does_not_extend() {
        let (clock, cd) = cooldown();
        assert!(cd.try_acquire(100.0));
        clock.advance(60.0);
        assert!(!cd.try_acquire(100.0));
        clock.advance(40.0);
        assert!(!cd.is_blocked());
    }

    #[test]
    fn test_release() {
        let (_, cd) = cooldown();
        cd.try_acquire(100.0);
        cd.release();
        assert!(!cd.is_blocked());
    }

    #[test]
    fn test_shared_is_same_instance() {
        assert!(Rc::ptr_eq(&OpenCooldown::shared(), &OpenCooldown::shared()));
    }
}
