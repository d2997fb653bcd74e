//! Browser runtime for Vitrine widgets.
//!
//! This module is the bridge between the headless widgets and the live DOM:
//! it converts web events into [`vitrine_core::Event`]s, applies `view()`
//! snapshots back onto elements and dispatches widget messages as bubbling
//! `CustomEvent`s.

mod accordion;
mod app;
mod contact_field;
mod counter;
mod dom;
mod events;
mod listener;
mod modal;
mod phone_mask;
mod quiz;
mod select;
mod tabs;
mod timer;

pub use accordion::{mount_accordions, AccordionBinding};
pub use app::{init, log};
pub use contact_field::{mount_contact_fields, ContactFieldBinding};
pub use counter::{mount_counters, CounterBinding};
pub use dom::DomElement;
pub use events::{key_down, modifiers, pointer_position, transition_end, wheel, DeltaMode};
pub use listener::{ListenOptions, Listener};
pub use modal::ModalBinding;
pub use phone_mask::{mount_phone_masks, PhoneMaskBinding};
pub use quiz::{mount_quiz, QuizBinding};
pub use select::{mount_selects, SelectBinding};
pub use tabs::{mount_tabs, TabsBinding};
pub use timer::Scheduler;
