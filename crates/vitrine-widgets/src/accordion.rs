//! Accordion: a trigger toggling the `open` class on its root.
//!
//! Current markup is `[data-accordion]` with `[data-accordion-trigger]`;
//! the older `.ad_accordion` / `.ad_accordion_toggle` pair is accepted too.

use vitrine_core::{Event, EventTarget, Handled, Markup, MarkupError, Query, Widget};

/// Accordion root markers, current then legacy.
pub const ROOTS: [Query<'static>; 2] = [Query::Attr("data-accordion"), Query::Class("ad_accordion")];

/// Trigger markers, current then legacy.
pub const TRIGGERS: [Query<'static>; 2] = [
    Query::Attr("data-accordion-trigger"),
    Query::Class("ad_accordion_toggle"),
];

/// Whether `el` is an accordion root.
pub fn is_accordion_root<M: Markup>(el: &M) -> bool {
    ROOTS.iter().any(|q| q.matches(el))
}

/// Single expandable section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    inactive: Option<MarkupError>,
    open: bool,
}

impl Accordion {
    /// Accordion with a known starting state.
    #[must_use]
    pub const fn new(open: bool) -> Self {
        Self {
            inactive: None,
            open,
        }
    }

    /// Build from a root; starts open when the root carries `open`.
    pub fn from_markup<M: Markup>(root: &M) -> Self {
        let has_trigger = TRIGGERS.iter().any(|q| root.find(q).is_some());
        let mut accordion = Self::new(root.has_class("open"));
        if !has_trigger {
            let err = MarkupError::MissingAnchor {
                widget: "accordion",
                anchor: "data-accordion-trigger",
            };
            tracing::debug!(%err, "accordion inactive");
            accordion.inactive = Some(err);
        }
        accordion
    }

    /// Whether the section is expanded.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the section.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }
}

impl Widget for Accordion {
    type View = bool;
    type Message = std::convert::Infallible;

    fn kind(&self) -> &'static str {
        "accordion"
    }

    fn is_active(&self) -> bool {
        self.inactive.is_none()
    }

    fn event(&mut self, event: &Event) -> Handled {
        if self.inactive.is_some() {
            return Handled::No;
        }
        if let Event::Click {
            target: EventTarget::Toggle,
        } = event
        {
            self.toggle();
        }
        Handled::No
    }

    fn view(&self) -> bool {
        self.open
    }

    fn take_messages(&mut self) -> Vec<Self::Message> {
        Vec::new()
    }
}
