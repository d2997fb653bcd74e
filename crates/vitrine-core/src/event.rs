//! Input events for widgets.
//!
//! The host (browser binding or a test) performs hit-testing and hands
//! widgets fully resolved events: every pointer, click and key event says
//! which part of the widget it landed on through [`EventTarget`].

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Pointer pressed (mouse button, touch contact or pen)
    PointerDown {
        /// Client position
        position: Point,
        /// Part of the widget under the pointer
        target: EventTarget,
    },
    /// Pointer moved
    PointerMove {
        /// Client position
        position: Point,
    },
    /// Pointer released
    PointerUp {
        /// Client position
        position: Point,
        /// Part of the widget under the pointer
        target: EventTarget,
    },
    /// Pointer gesture cancelled by the platform (e.g. page scroll took over)
    PointerCancel,
    /// Click (synthesized after pointer up, or keyboard activation)
    Click {
        /// Part of the widget that was clicked
        target: EventTarget,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
        /// Modifier state
        modifiers: Modifiers,
        /// Element that had focus
        target: EventTarget,
    },
    /// A scroll container inside the widget changed its offset
    Scrolled {
        /// New vertical scroll offset
        offset: f32,
    },
    /// Mouse wheel over the widget
    Wheel {
        /// Vertical delta (negative is up)
        delta_y: f32,
    },
    /// A CSS transition finished on the widget's animated element
    TransitionEnd {
        /// Transitioned CSS property name
        property: String,
    },
    /// Text field content changed
    TextInput {
        /// Full field value after the edit
        value: String,
        /// Caret position after the edit (in chars)
        caret: usize,
    },
    /// Clipboard paste into a text field
    Paste {
        /// Pasted plain text
        text: String,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
}

/// Part of a widget an event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTarget {
    /// Outside the widget's root element
    Outside,
    /// Inside the root, on no specific part
    Root,
    /// The control that opens/closes the widget
    Toggle,
    /// An indexed item (option, tab button, step option)
    Item(usize),
    /// The "+" or forward control
    Increment,
    /// The "-" or back control
    Decrement,
    /// The widget's text input
    Input,
}

impl EventTarget {
    /// Whether the target lies within the widget's root element.
    #[must_use]
    pub const fn is_inside(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Keyboard key, parsed from DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Enter / Return
    Enter,
    /// Space bar
    Space,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// Printable character
    Char(char),
    /// Anything else (function keys, modifiers alone, ...)
    Other,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            "Home" => Self::Home,
            "End" => Self::End,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Backspace" => Self::Backspace,
            "Delete" | "Del" => Self::Delete,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }

    /// Whether this is an ASCII digit key.
    #[must_use]
    pub const fn is_digit(self) -> bool {
        matches!(self, Self::Char(c) if c.is_ascii_digit())
    }

    /// Enter or Space, the two activation keys.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Modifier key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// Control held
    pub ctrl: bool,
    /// Meta / Command held
    pub meta: bool,
    /// Alt / Option held
    pub alt: bool,
    /// Shift held
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    /// Control or Command, the clipboard shortcut modifier.
    #[must_use]
    pub const fn shortcut(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Whether a widget consumed an event.
///
/// The browser binding calls `preventDefault()` + `stopPropagation()` for
/// [`Handled::Yes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handled {
    /// Event consumed
    Yes,
    /// Event ignored, default behavior should proceed
    #[default]
    No,
}

impl Handled {
    /// Check if the event was consumed.
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }
}
