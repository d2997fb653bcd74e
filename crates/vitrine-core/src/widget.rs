//! Widget trait and related types.
//!
//! A widget is a headless state machine bound to one block of markup:
//!
//! 1. **Construct**: read anchors and `data-*` configuration once
//! 2. **Event**: react to resolved input [`Event`]s
//! 3. **Tick**: fire any [`Deadline`] that has come due
//! 4. **View**: expose a snapshot for the host to apply to the page
//! 5. **Messages**: hand outbound notifications to the host
//!
//! # Examples
//!
//! ```
//! use vitrine_core::{Outbox, Silent};
//!
//! let mut outbox = Outbox::new();
//! outbox.push("select:open");
//! outbox.push_unless(Silent::YES, "select:change");
//! assert_eq!(outbox.drain(), vec!["select:open"]);
//! assert!(outbox.is_empty());
//! ```

use crate::clock::Deadline;
use crate::event::{Event, Handled};
use serde::{Deserialize, Serialize};

/// Interactive widget driven by the host.
pub trait Widget {
    /// Snapshot type the host renders from.
    type View;
    /// Outbound notification type.
    type Message;

    /// Short widget kind, used in logs.
    fn kind(&self) -> &'static str;

    /// Whether the widget's markup was complete. Inactive widgets ignore
    /// every event and operation.
    fn is_active(&self) -> bool;

    /// Handle an input event.
    fn event(&mut self, event: &Event) -> Handled;

    /// Fire due deadlines.
    fn tick(&mut self) {}

    /// Earliest pending deadline, so the host knows when to tick next.
    fn next_deadline(&self) -> Option<Deadline> {
        None
    }

    /// Current render snapshot.
    fn view(&self) -> Self::View;

    /// Drain queued messages.
    fn take_messages(&mut self) -> Vec<Self::Message>;
}

/// Whether a state change should be announced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Silent(pub bool);

impl Silent {
    /// Announce the change.
    pub const NO: Self = Self(false);
    /// Apply quietly.
    pub const YES: Self = Self(true);

    /// Whether announcements are suppressed.
    #[must_use]
    pub const fn is_silent(self) -> bool {
        self.0
    }
}

impl From<bool> for Silent {
    fn from(silent: bool) -> Self {
        Self(silent)
    }
}

/// FIFO queue of outbound widget messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbox<M> {
    queue: Vec<M>,
}

impl<M> Default for Outbox<M> {
    fn default() -> Self {
        Self { queue: Vec::new() }
    }
}

impl<M> Outbox<M> {
    /// Empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message.
    pub fn push(&mut self, message: M) {
        self.queue.push(message);
    }

    /// Queue a message unless silenced.
    pub fn push_unless(&mut self, silent: Silent, message: M) {
        if !silent.is_silent() {
            self.queue.push(message);
        }
    }

    /// Queued messages, oldest first.
    #[must_use]
    pub fn pending(&self) -> &[M] {
        &self.queue
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued message.
    pub fn drain(&mut self) -> Vec<M> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_default_announces() {
        assert!(!Silent::default().is_silent());
        assert!(Silent::YES.is_silent());
        assert_eq!(Silent::from(true), Silent::YES);
    }

    #[test]
    fn test_outbox_fifo() {
        let mut outbox = Outbox::new();
        outbox.push(1);
        outbox.push(2);
        assert_eq!(outbox.pending(), &[1, 2]);
        assert_eq!(outbox.drain(), vec![1, 2]);
        assert!(outbox.drain().is_empty());
    }

    #[test]
    fn test_outbox_silenced() {
        let mut outbox = Outbox::new();
        outbox.push_unless(Silent::YES, "quiet");
        outbox.push_unless(Silent::NO, "loud");
        assert_eq!(outbox.drain(), vec!["loud"]);
    }
}
