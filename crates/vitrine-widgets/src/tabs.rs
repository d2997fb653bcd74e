//! Tabs: `[data-tab-button]` buttons switching `[data-tab-content]` panels.
//!
//! The active button wears the `secondary` variant; every other button
//! falls back to its `data-tab-inactive-variant` (default `primary`).

use serde::{Deserialize, Serialize};
use vitrine_core::attrs::parse_leading_int;
use vitrine_core::{Event, EventTarget, Handled, Markup, MarkupError, Outbox, Query, Widget};

/// Variant worn by the active button.
pub const ACTIVE_VARIANT: &str = "secondary";

/// Inactive variant when the button does not name one.
pub const DEFAULT_INACTIVE_VARIANT: &str = "primary";

/// Button variant classes cleared before a variant is applied.
pub const VARIANT_CLASSES: [&str; 3] = ["button--primary", "button--secondary", "button--third"];

/// One tab button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabButton {
    /// Parsed `data-tab-index`, `None` when not a number
    pub index: Option<i64>,
    /// Variant worn while inactive
    pub inactive_variant: String,
}

impl TabButton {
    /// Button pointing at panel `index`.
    #[must_use]
    pub fn new(index: i64) -> Self {
        Self {
            index: Some(index),
            inactive_variant: DEFAULT_INACTIVE_VARIANT.to_string(),
        }
    }

    /// Set the inactive variant.
    #[must_use]
    pub fn inactive_variant(mut self, variant: impl Into<String>) -> Self {
        self.inactive_variant = variant.into();
        self
    }

    fn from_markup<M: Markup>(el: &M) -> Self {
        Self {
            index: el.attr("data-tab-index").as_deref().and_then(parse_leading_int),
            inactive_variant: el
                .attr("data-tab-inactive-variant")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_INACTIVE_VARIANT.to_string()),
        }
    }
}

/// Message emitted when a button is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabChanged {
    /// Position of the clicked button
    pub button: usize,
    /// Panel shown, `None` when the index points past the panels
    pub panel: Option<usize>,
}

/// Render snapshot for one button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabButtonView {
    /// `data-tab-active="true"`
    pub active: bool,
    /// Variant: `button--{variant}` class and `data-tab-variant`
    pub variant: String,
}

/// Render snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabsView {
    /// Buttons in document order
    pub buttons: Vec<TabButtonView>,
    /// `tabs_item--active` per panel
    pub panels: Vec<bool>,
}

/// Tab group.
#[derive(Debug, Clone)]
pub struct Tabs {
    inactive: Option<MarkupError>,
    buttons: Vec<TabButton>,
    panel_count: usize,
    active_button: Option<usize>,
    active_panel: Option<usize>,
    /// Variant per button; `None` until first activation leaves markup alone
    variants: Vec<Option<String>>,
    outbox: Outbox<TabChanged>,
}

impl Tabs {
    /// Tabs over `buttons` and `panel_count` panels, nothing active.
    #[must_use]
    pub fn new(buttons: Vec<TabButton>, panel_count: usize) -> Self {
        let inactive = if buttons.is_empty() || panel_count == 0 {
            let err = MarkupError::MissingAnchor {
                widget: "tabs",
                anchor: if buttons.is_empty() {
                    "data-tab-button"
                } else {
                    "data-tab-content"
                },
            };
            tracing::warn!(%err, "tabs inactive");
            Some(err)
        } else {
            None
        };
        let variants = vec![None; buttons.len()];
        Self {
            inactive,
            buttons,
            panel_count,
            active_button: None,
            active_panel: None,
            variants,
            outbox: Outbox::new(),
        }
    }

    /// Build from a `[data-component="tabs"]` root. Initial state comes from
    /// `data-tab-active` on buttons and panels.
    pub fn from_markup<M: Markup>(root: &M) -> Self {
        let button_els = root.find_all(&Query::Attr("data-tab-button"));
        let panel_els = root.find_all(&Query::Attr("data-tab-content"));
        let mut tabs = Self::new(
            button_els.iter().map(TabButton::from_markup).collect(),
            panel_els.len(),
        );
        let is_active = |el: &M| el.attr("data-tab-active").as_deref() == Some("true");
        tabs.active_button = button_els.iter().position(is_active);
        tabs.active_panel = panel_els.iter().position(is_active);
        tabs
    }

    /// Index of the active button.
    #[must_use]
    pub const fn active_button(&self) -> Option<usize> {
        self.active_button
    }

    /// Index of the visible panel.
    #[must_use]
    pub const fn active_panel(&self) -> Option<usize> {
        self.active_panel
    }

    /// Activate the button at `position`. Buttons without a numeric index
    /// are ignored.
    pub fn activate(&mut self, position: usize) -> bool {
        if self.inactive.is_some() {
            return false;
        }
        let Some(index) = self.buttons.get(position).and_then(|b| b.index) else {
            tracing::warn!(position, "tabs: invalid tab index");
            return false;
        };
        for (variant, button) in self.variants.iter_mut().zip(&self.buttons) {
            *variant = Some(button.inactive_variant.clone());
        }
        self.variants[position] = Some(ACTIVE_VARIANT.to_string());
        self.active_button = Some(position);
        self.active_panel = usize::try_from(index)
            .ok()
            .filter(|&i| i < self.panel_count);
        self.outbox.push(TabChanged {
            button: position,
            panel: self.active_panel,
        });
        true
    }
}

impl Widget for Tabs {
    type View = TabsView;
    type Message = TabChanged;

    fn kind(&self) -> &'static str {
        "tabs"
    }

    fn is_active(&self) -> bool {
        self.inactive.is_none()
    }

    fn event(&mut self, event: &Event) -> Handled {
        match event {
            Event::Click {
                target: EventTarget::Item(position),
            } => {
                self.activate(*position);
                Handled::No
            }
            _ => Handled::No,
        }
    }

    fn view(&self) -> TabsView {
        TabsView {
            buttons: self
                .variants
                .iter()
                .enumerate()
                .map(|(i, variant)| TabButtonView {
                    active: self.active_button == Some(i),
                    variant: variant.clone().unwrap_or_default(),
                })
                .collect(),
            panels: (0..self.panel_count)
                .map(|i| self.active_panel == Some(i))
                .collect(),
        }
    }

    fn take_messages(&mut self) -> Vec<TabChanged> {
        self.outbox.drain()
    }
}
