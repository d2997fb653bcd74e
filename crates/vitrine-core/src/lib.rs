//! Core types and traits for Vitrine widgets.
//!
//! This crate provides foundational types shared by every widget:
//! - Geometry: [`Point`]
//! - Input: [`Event`], [`EventTarget`], [`Key`], [`Modifiers`], [`Handled`]
//! - Markup access: [`Markup`], [`Query`] and the in-memory [`Element`] tree
//! - Configuration: typed `data-*` readers in [`attrs`]
//! - Time: [`Clock`], [`Deadline`], [`Tween`] and the page-wide [`OpenCooldown`]
//! - The [`Widget`] trait with its [`Outbox`] helper

pub mod animation;
pub mod attrs;
pub mod clock;
mod cooldown;
mod error;
mod event;
mod geometry;
pub mod markup;
pub mod widget;

pub use animation::{Easing, Tween};
pub use clock::{Clock, Deadline, ManualClock, SystemClock};
pub use cooldown::{OpenCooldown, DEFAULT_OPEN_COOLDOWN_MS};
pub use error::MarkupError;
pub use event::{Event, EventTarget, Handled, Key, Modifiers};
pub use geometry::Point;
pub use markup::{Element, Markup, Query};
pub use widget::{Outbox, Silent, Widget};
