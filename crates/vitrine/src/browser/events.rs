//! Browser event conversion: web events to Vitrine [`Event`]s.
//!
//! Hit-testing (which part of a widget the event landed on) is done by the
//! bindings; these helpers only read positions, keys and payloads.

use vitrine_core::{Event, EventTarget, Key, Modifiers, Point};
use web_sys::{KeyboardEvent, MouseEvent, TransitionEvent, WheelEvent};

/// Client position of a mouse or pointer event.
pub fn pointer_position(event: &MouseEvent) -> Point {
    Point::new(event.client_x() as f32, event.client_y() as f32)
}

/// Modifier state of a key event.
pub fn modifiers(event: &KeyboardEvent) -> Modifiers {
    Modifiers {
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
    }
}

/// `keydown` on `target`.
pub fn key_down(event: &KeyboardEvent, target: EventTarget) -> Event {
    Event::KeyDown {
        key: Key::from_dom(&event.key()),
        modifiers: modifiers(event),
        target,
    }
}

/// `transitionend` for the transitioned property.
pub fn transition_end(event: &TransitionEvent) -> Event {
    Event::TransitionEnd {
        property: event.property_name(),
    }
}

// =============================================================================
// Wheel Events
// =============================================================================

/// Scroll delta mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaMode {
    /// Pixels.
    Pixel,
    /// Lines.
    Line,
    /// Pages.
    Page,
}

impl From<u32> for DeltaMode {
    fn from(mode: u32) -> Self {
        match mode {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

impl DeltaMode {
    /// Pixels per delta unit.
    pub const fn pixels(self) -> f32 {
        match self {
            Self::Pixel => 1.0,
            Self::Line => 20.0,
            Self::Page => 400.0,
        }
    }
}

/// `wheel` with the vertical delta normalized to pixels.
pub fn wheel(event: &WheelEvent) -> Event {
    Event::Wheel {
        delta_y: event.delta_y() as f32 * DeltaMode::from(event.delta_mode()).pixels(),
    }
}
