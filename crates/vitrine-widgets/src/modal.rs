//! Page-wide modal registry.
//!
//! Modals are registered by element id. Triggers (`[data-modal]` with an
//! optional `data-modal-action`), `[data-close]` buttons, backdrop clicks,
//! Escape and `[data-modal-on-focus]` fields all resolve to registry calls.
//! Body scroll is locked while any modal is open.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use vitrine_core::{Clock, Deadline, Event, Handled, Key, Markup, Outbox, Widget};

/// Per-modal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// Click on the modal element itself (the backdrop) closes it
    pub close_on_backdrop: bool,
    /// Escape closes it
    pub close_on_escape: bool,
    /// Opening closes every other open modal
    pub exclusive: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            close_on_backdrop: true,
            close_on_escape: true,
            exclusive: false,
        }
    }
}

/// Registry timings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalTimings {
    /// Delay between close and `display: none`, matching the CSS transition
    pub hide_after_ms: f64,
}

impl Default for ModalTimings {
    fn default() -> Self {
        Self {
            hide_after_ms: 300.0,
        }
    }
}

/// Action carried by a `[data-modal]` trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerAction {
    /// Open when closed, close when open
    #[default]
    Toggle,
    /// Open
    Open,
    /// Close
    Close,
}

impl TriggerAction {
    /// Parse `data-modal-action`; absent means toggle, unknown is `None`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            None | Some("toggle") => Some(Self::Toggle),
            Some("open") => Some(Self::Open),
            Some("close") => Some(Self::Close),
            Some(_) => None,
        }
    }
}

/// A resolved `[data-modal]` trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalTrigger {
    /// Target modal id
    pub modal: String,
    /// What to do
    pub action: TriggerAction,
}

impl ModalTrigger {
    /// Read a trigger element.
    pub fn from_markup<M: Markup>(el: &M) -> Option<Self> {
        let modal = el.attr("data-modal")?;
        let action = TriggerAction::parse(el.attr("data-modal-action").as_deref())?;
        Some(Self { modal, action })
    }
}

/// Reason a modal was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    /// Escape key
    Escape,
    /// Click on the backdrop
    Backdrop,
    /// A `[data-close]` button
    CloseButton,
    /// A trigger, another exclusive modal, or an API call
    Programmatic,
}

/// Registry messages, the counterpart of open/close callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalMessage {
    /// Modal became open
    Opened {
        /// Modal id
        id: String,
    },
    /// Modal was closed
    Closed {
        /// Modal id
        id: String,
        /// What closed it
        reason: CloseReason,
    },
}

/// Render snapshot for one modal element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalView {
    /// Element id
    pub id: String,
    /// `open` class
    pub open: bool,
    /// `display: block` (false means `display: none`)
    pub displayed: bool,
    /// `aria-hidden` value
    pub aria_hidden: bool,
}

/// Render snapshot for the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryView {
    /// Every registered modal, in registration order
    pub modals: Vec<ModalView>,
    /// `overflow: hidden` on `<body>`
    pub body_scroll_locked: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    id: String,
    config: ModalConfig,
    open: bool,
    displayed: bool,
    hide_at: Option<Deadline>,
}

/// Registry of every modal on the page.
pub struct ModalRegistry {
    clock: Rc<dyn Clock>,
    timings: ModalTimings,
    entries: Vec<Entry>,
    outbox: Outbox<ModalMessage>,
}

impl std::fmt::Debug for ModalRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalRegistry")
            .field("timings", &self.timings)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl ModalRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            timings: ModalTimings::default(),
            entries: Vec::new(),
            outbox: Outbox::new(),
        }
    }

    /// Override timings.
    #[must_use]
    pub const fn with_timings(mut self, timings: ModalTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Register a modal, closed. Registering an id again replaces its config
    /// and resets it to closed.
    pub fn register(&mut self, id: impl Into<String>, config: ModalConfig) {
        let id = id.into();
        let entry = Entry {
            id: id.clone(),
            config,
            open: false,
            displayed: false,
            hide_at: None,
        };
        match self.position(&id) {
            Some(i) => self.entries[i] = entry,
            None => self.entries.push(entry),
        }
        tracing::debug!(%id, "modal registered");
    }

    /// Register the modal element by its `id` attribute. Elements without an
    /// id are skipped.
    pub fn register_markup<M: Markup>(&mut self, el: &M, config: ModalConfig) -> bool {
        match el.attr("id").filter(|id| !id.is_empty()) {
            Some(id) => {
                self.register(id, config);
                true
            }
            None => {
                tracing::debug!("modal element without id skipped");
                false
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Whether `id` is open. Unknown ids are closed.
    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.position(id).is_some_and(|i| self.entries[i].open)
    }

    /// Ids of open modals in registration order.
    #[must_use]
    pub fn open_modals(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.open)
            .map(|e| e.id.as_str())
            .collect()
    }

    /// Whether body scrolling is locked.
    #[must_use]
    pub fn body_scroll_locked(&self) -> bool {
        self.entries.iter().any(|e| e.open)
    }

    /// Open `id`. No-op when unknown or already open.
    pub fn open(&mut self, id: &str) {
        let Some(i) = self.position(id) else {
            return;
        };
        if self.entries[i].open {
            return;
        }
        if self.entries[i].config.exclusive {
            self.close_all(Some(id));
        }
        let entry = &mut self.entries[i];
        entry.open = true;
        entry.displayed = true;
        entry.hide_at = None;
        tracing::debug!(%id, "modal opened");
        self.outbox.push(ModalMessage::Opened { id: id.to_string() });
    }

    /// Close `id`. No-op when unknown or already closed.
    pub fn close(&mut self, id: &str) {
        self.close_with(id, CloseReason::Programmatic);
    }

    fn close_with(&mut self, id: &str, reason: CloseReason) {
        let Some(i) = self.position(id) else {
            return;
        };
        if !self.entries[i].open {
            return;
        }
        let now = self.clock.now_ms();
        let entry = &mut self.entries[i];
        entry.open = false;
        entry.hide_at = Some(Deadline::after(now, self.timings.hide_after_ms));
        tracing::debug!(%id, ?reason, "modal closed");
        self.outbox.push(ModalMessage::Closed {
            id: id.to_string(),
            reason,
        });
    }

    /// Open when closed, close when open.
    pub fn toggle(&mut self, id: &str) {
        if self.is_open(id) {
            self.close(id);
        } else {
            self.open(id);
        }
    }

    /// Close every open modal except `except`.
    pub fn close_all(&mut self, except: Option<&str>) {
        let ids: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.open && Some(e.id.as_str()) != except)
            .map(|e| e.id.clone())
            .collect();
        for id in ids {
            self.close(&id);
        }
    }

    /// Run a `[data-modal]` trigger.
    pub fn trigger(&mut self, trigger: &ModalTrigger) {
        match trigger.action {
            TriggerAction::Toggle => self.toggle(&trigger.modal),
            TriggerAction::Open => self.open(&trigger.modal),
            TriggerAction::Close => self.close(&trigger.modal),
        }
    }

    /// Focus entered a `[data-modal-on-focus]` field.
    pub fn focus_trigger(&mut self, id: &str) {
        self.open(id);
    }

    /// Click landed directly on the modal element.
    pub fn backdrop_click(&mut self, id: &str) {
        let allowed = self
            .position(id)
            .is_some_and(|i| self.entries[i].config.close_on_backdrop);
        if allowed {
            self.close_with(id, CloseReason::Backdrop);
        }
    }

    /// A `[data-close]` button inside `id` was clicked. A non-empty
    /// `data-close` value names the modal to close instead.
    pub fn close_button(&mut self, id: &str, data_close: Option<&str>) {
        let target = data_close.filter(|t| !t.is_empty()).unwrap_or(id);
        self.close_with(target, CloseReason::CloseButton);
    }

    /// Escape: close every open modal that allows it.
    pub fn escape(&mut self) -> Handled {
        let ids: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.open && e.config.close_on_escape)
            .map(|e| e.id.clone())
            .collect();
        for id in &ids {
            self.close_with(id, CloseReason::Escape);
        }
        Handled::from(!ids.is_empty())
    }

    /// Render snapshot for one modal.
    #[must_use]
    pub fn modal_view(&self, id: &str) -> Option<ModalView> {
        self.position(id).map(|i| Self::entry_view(&self.entries[i]))
    }

    fn entry_view(entry: &Entry) -> ModalView {
        ModalView {
            id: entry.id.clone(),
            open: entry.open,
            displayed: entry.displayed,
            aria_hidden: !entry.displayed,
        }
    }
}

impl Widget for ModalRegistry {
    type View = RegistryView;
    type Message = ModalMessage;

    fn kind(&self) -> &'static str {
        "modal-registry"
    }

    fn is_active(&self) -> bool {
        true
    }

    fn event(&mut self, event: &Event) -> Handled {
        match event {
            Event::KeyDown {
                key: Key::Escape, ..
            } => self.escape(),
            _ => Handled::No,
        }
    }

    fn tick(&mut self) {
        let now = self.clock.now_ms();
        for entry in &mut self.entries {
            if !entry.open && entry.hide_at.is_some_and(|d| d.is_due(now)) {
                entry.displayed = false;
                entry.hide_at = None;
            }
        }
    }

    fn next_deadline(&self) -> Option<Deadline> {
        self.entries
            .iter()
            .filter_map(|e| e.hide_at)
            .min_by(|a, b| a.at_ms().total_cmp(&b.at_ms()))
    }

    fn view(&self) -> RegistryView {
        RegistryView {
            modals: self.entries.iter().map(Self::entry_view).collect(),
            body_scroll_locked: self.body_scroll_locked(),
        }
    }

    fn take_messages(&mut self) -> Vec<ModalMessage> {
        self.outbox.drain()
    }
}
