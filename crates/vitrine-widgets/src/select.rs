//! Custom select widget with single and multiple modes.
//!
//! In single mode picking an option closes the dropdown. In multiple mode
//! the dropdown stays open and is closed by an outside pointer-down, the
//! toggle or Escape.
//!
//! Options are picked on pointer-up rather than click so that a flick used
//! to scroll the option list never selects the option under the finger.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use vitrine_core::attrs::{read_flag, read_string};
use vitrine_core::{
    Clock, Deadline, Event, EventTarget, Handled, Key, Markup, MarkupError, OpenCooldown, Outbox,
    Point, Query, Silent, SystemClock, Widget, DEFAULT_OPEN_COOLDOWN_MS,
};

/// Default placeholder shown when nothing is selected.
pub const DEFAULT_PLACEHOLDER: &str = "Выберите…";

/// Class carried by option elements inside the list anchor.
pub const OPTION_CLASS: &str = "c-select__option";

// =============================================================================
// Configuration
// =============================================================================

/// Empirically tuned timings for touch disambiguation and close animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectTimings {
    /// Per-axis pointer travel beyond which a gesture counts as a scroll
    pub move_threshold_px: f32,
    /// Window after a pointer pick during which no select sharing the
    /// cooldown may open
    pub open_cooldown_ms: f64,
    /// Hide the dropdown this long after close if transitions never end
    pub close_hide_fallback_ms: f64,
}

impl Default for SelectTimings {
    fn default() -> Self {
        Self {
            move_threshold_px: 5.0,
            open_cooldown_ms: DEFAULT_OPEN_COOLDOWN_MS,
            close_hide_fallback_ms: 350.0,
        }
    }
}

/// Resources a select shares with its siblings on the page.
#[derive(Clone)]
pub struct SelectContext {
    clock: Rc<dyn Clock>,
    cooldown: Rc<OpenCooldown>,
    timings: SelectTimings,
}

impl std::fmt::Debug for SelectContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectContext")
            .field("cooldown", &self.cooldown)
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

impl Default for SelectContext {
    fn default() -> Self {
        Self::system()
    }
}

impl SelectContext {
    /// Context over an explicit clock and cooldown.
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>, cooldown: Rc<OpenCooldown>) -> Self {
        Self {
            clock,
            cooldown,
            timings: SelectTimings::default(),
        }
    }

    /// Wall clock and the page-wide cooldown.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Rc::new(SystemClock::new()), OpenCooldown::shared())
    }

    /// Fresh cooldown driven by `clock`. Clones of the returned context
    /// share that cooldown.
    #[must_use]
    pub fn isolated(clock: Rc<dyn Clock>) -> Self {
        let cooldown = Rc::new(OpenCooldown::new(Rc::clone(&clock)));
        Self::new(clock, cooldown)
    }

    /// Override timings.
    #[must_use]
    pub const fn with_timings(mut self, timings: SelectTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Timings in effect.
    #[must_use]
    pub const fn timings(&self) -> &SelectTimings {
        &self.timings
    }

    /// Clock deadlines are measured against.
    #[must_use]
    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    /// Shared cooldown.
    #[must_use]
    pub fn cooldown(&self) -> &Rc<OpenCooldown> {
        &self.cooldown
    }
}

/// Resolved select configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Multiple selection mode
    pub multiple: bool,
    /// Label shown when nothing is selected
    pub placeholder: String,
    /// Hidden input name (`data-name`)
    pub name: String,
    /// Joins multiple values in the single hidden input
    pub delimiter: String,
    /// Start disabled
    pub disabled: bool,
    /// One hidden input per selected value instead of a joined string
    pub multi_input: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            multiple: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            name: String::new(),
            delimiter: ",".to_string(),
            disabled: false,
            multi_input: false,
        }
    }
}

/// Programmatic configuration, applied on top of markup attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOverrides {
    /// Beats `data-multiple`
    pub multiple: Option<bool>,
    /// Used when `data-placeholder` is absent or empty
    pub placeholder: Option<String>,
    /// Used when `data-name` is absent or empty
    pub name: Option<String>,
    /// Multiple-value delimiter
    pub delimiter: Option<String>,
    /// Start disabled
    pub disabled: Option<bool>,
    /// Beats `data-multi-input`
    pub multi_input: Option<bool>,
}

impl SelectConfig {
    /// Resolve configuration from root attributes and overrides.
    ///
    /// Mode flags prefer the override; text attributes prefer the markup.
    pub fn from_markup<M: Markup>(root: Option<&M>, overrides: &SelectOverrides) -> Self {
        let defaults = Self::default();
        Self {
            multiple: overrides
                .multiple
                .unwrap_or_else(|| read_flag(root, "data-multiple", false)),
            placeholder: read_string(root, "data-placeholder")
                .or_else(|| overrides.placeholder.clone().filter(|p| !p.is_empty()))
                .unwrap_or(defaults.placeholder),
            name: read_string(root, "data-name")
                .or_else(|| overrides.name.clone())
                .unwrap_or_default(),
            delimiter: overrides
                .delimiter
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or(defaults.delimiter),
            disabled: overrides.disabled.unwrap_or(false),
            multi_input: overrides
                .multi_input
                .unwrap_or_else(|| read_flag(root, "data-multi-input", false)),
        }
    }
}

// =============================================================================
// Data model
// =============================================================================

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value submitted with the form
    pub value: String,
    /// Display text
    pub label: String,
    /// Current selection state
    pub selected: bool,
}

impl SelectOption {
    /// Create an unselected option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected: false,
        }
    }

    /// Set the initial selection state.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn from_markup<M: Markup>(el: &M) -> Self {
        let selected =
            el.has_class("is-selected") || el.attr("aria-selected").as_deref() == Some("true");
        Self {
            value: el.attr("data-value").unwrap_or_default(),
            label: el.text().trim().to_string(),
            selected,
        }
    }
}

/// Current selection, shaped by mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectValue {
    /// Single mode: the selected value, if any
    Single(Option<String>),
    /// Multiple mode: selected values in option-list order
    Multiple(Vec<String>),
}

impl SelectValue {
    /// First selected value.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => value.as_deref(),
            Self::Multiple(values) => values.first().map(String::as_str),
        }
    }

    /// All selected values.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::Single(value) => value.iter().cloned().collect(),
            Self::Multiple(values) => values.clone(),
        }
    }
}

/// External value handed to [`Select::set_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectInput {
    /// No value
    None,
    /// A single value; split on the delimiter in multiple mode
    One(String),
    /// An explicit list
    Many(Vec<String>),
}

impl From<&str> for SelectInput {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for SelectInput {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Option<String>> for SelectInput {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::None, Self::One)
    }
}

impl From<Vec<String>> for SelectInput {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<&[&str]> for SelectInput {
    fn from(values: &[&str]) -> Self {
        Self::Many(values.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SelectInput {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(ToString::to_string).collect())
    }
}

/// Payload of `select:change`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDetail {
    /// First selected value
    pub value: Option<String>,
    /// All selected values in option-list order
    pub values: Vec<String>,
    /// Labels of the selected options
    pub labels: Vec<String>,
}

/// Custom events a select dispatches (bubbling) on its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectEvent {
    /// Dropdown opened
    Open,
    /// Dropdown closed
    Close,
    /// Selection changed
    Change(ChangeDetail),
}

impl SelectEvent {
    /// DOM event type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Open => "select:open",
            Self::Close => "select:close",
            Self::Change(_) => "select:change",
        }
    }

    /// Change payload, `None` for open/close.
    #[must_use]
    pub const fn detail(&self) -> Option<&ChangeDetail> {
        match self {
            Self::Change(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Outbound messages for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectMessage {
    /// Dispatch a custom event on the root
    Emit(SelectEvent),
    /// Move focus to the toggle control
    FocusToggle,
    /// Focus and scroll into view the option at this index
    FocusOption(usize),
}

/// Hidden form value to write back into the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormValue {
    /// No hidden input anchor
    None,
    /// Value of `[data-ref="input"]`
    Joined(String),
    /// Hidden inputs rendered into `[data-ref="inputs"]`, one per value.
    /// Empty when the select has no name.
    PerValue {
        /// Input name
        name: String,
        /// One input per value
        values: Vec<String>,
    },
}

/// Render state of one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    /// Option value
    pub value: String,
    /// `is-selected` / `aria-selected`
    pub selected: bool,
    /// `is-focused`
    pub focused: bool,
}

/// Render snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectView {
    /// `is-open` on the root, `aria-expanded`
    pub open: bool,
    /// `is-disabled` on the root, `disabled` on the toggle
    pub disabled: bool,
    /// `hidden` + `display: none` on the dropdown
    pub dropdown_hidden: bool,
    /// Text of `[data-ref="value"]`
    pub label: String,
    /// `has-value` on `[data-ref="value"]`
    pub has_value: bool,
    /// Per-option state
    pub options: Vec<OptionView>,
    /// Hidden form value
    pub form: FormValue,
}

// =============================================================================
// Select
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lifecycle {
    Active,
    Inactive(MarkupError),
    Destroyed,
}

/// Pointer gesture started on an option.
#[derive(Debug, Clone, Copy)]
struct Gesture {
    start: Point,
    start_scroll: f32,
    moved: bool,
}

/// Close-animation bookkeeping.
#[derive(Debug, Clone, Copy)]
struct PendingHide {
    fallback: Deadline,
    opacity_done: bool,
    transform_done: bool,
}

/// Custom select widget.
#[derive(Debug)]
pub struct Select {
    config: SelectConfig,
    ctx: SelectContext,
    lifecycle: Lifecycle,
    options: Vec<SelectOption>,
    open: bool,
    disabled: bool,
    focused: Option<usize>,
    dropdown_hidden: bool,
    has_input: bool,
    has_inputs: bool,
    list_scroll: f32,
    gesture: Option<Gesture>,
    pending_hide: Option<PendingHide>,
    block_next_click: bool,
    outbox: Outbox<SelectMessage>,
}

impl Select {
    /// Build a select from explicit options.
    #[must_use]
    pub fn new(options: Vec<SelectOption>, config: SelectConfig, ctx: SelectContext) -> Self {
        let has_inputs = config.multi_input;
        Self::build(options, config, ctx, Lifecycle::Active, true, has_inputs)
    }

    /// Build a select from its root element.
    ///
    /// Never fails: missing anchors produce an inactive instance whose
    /// operations are all no-ops.
    pub fn from_markup<M: Markup>(
        root: Option<&M>,
        overrides: &SelectOverrides,
        ctx: SelectContext,
    ) -> Self {
        let config = SelectConfig::from_markup(root, overrides);
        let Some(root) = root else {
            let err = MarkupError::MissingRoot { widget: "select" };
            tracing::debug!(%err, "select inactive");
            return Self::build(Vec::new(), config, ctx, Lifecycle::Inactive(err), false, false);
        };

        let list = root.find_ref("list");
        let options: Vec<SelectOption> = list
            .as_ref()
            .map(|list| {
                list.find_all(&Query::Class(OPTION_CLASS))
                    .iter()
                    .map(SelectOption::from_markup)
                    .collect()
            })
            .unwrap_or_default();

        let missing = if list.is_none() {
            Some("list")
        } else {
            ["toggle", "dropdown", "value"]
                .into_iter()
                .find(|anchor| root.find_ref(anchor).is_none())
        };
        let lifecycle = match missing {
            Some(anchor) => {
                let err = MarkupError::MissingAnchor {
                    widget: "select",
                    anchor,
                };
                tracing::debug!(%err, "select inactive");
                Lifecycle::Inactive(err)
            }
            None => Lifecycle::Active,
        };

        let has_input = root.find_ref("input").is_some();
        let has_inputs = root.find_ref("inputs").is_some();
        Self::build(options, config, ctx, lifecycle, has_input, has_inputs)
    }

    fn build(
        mut options: Vec<SelectOption>,
        config: SelectConfig,
        ctx: SelectContext,
        lifecycle: Lifecycle,
        has_input: bool,
        has_inputs: bool,
    ) -> Self {
        if !config.multiple {
            let mut seen = false;
            for opt in options.iter_mut().filter(|o| o.selected) {
                opt.selected = !seen;
                seen = true;
            }
        }
        let start_disabled = config.disabled;
        let mut select = Self {
            config,
            ctx,
            lifecycle,
            options,
            open: false,
            disabled: false,
            focused: None,
            dropdown_hidden: true,
            has_input,
            has_inputs,
            list_scroll: 0.0,
            gesture: None,
            pending_hide: None,
            block_next_click: false,
            outbox: Outbox::new(),
        };
        if start_disabled {
            select.disable();
        }
        select
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Whether the dropdown is expanded.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Keyboard-focused option.
    #[must_use]
    pub const fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    /// Why the instance went inactive at construction.
    #[must_use]
    pub const fn inactive_reason(&self) -> Option<&MarkupError> {
        match &self.lifecycle {
            Lifecycle::Inactive(err) => Some(err),
            _ => None,
        }
    }

    const fn active(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Active)
    }

    /// Whether opening is refused. Always true for inactive instances.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        !self.active() || self.disabled
    }

    /// Current selection.
    #[must_use]
    pub fn value(&self) -> SelectValue {
        let selected = self.selected_values();
        if self.config.multiple {
            SelectValue::Multiple(selected)
        } else {
            SelectValue::Single(selected.into_iter().next())
        }
    }

    /// Labels of selected options in option-list order.
    #[must_use]
    pub fn selected_labels(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.label.clone())
            .collect()
    }

    fn selected_values(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.clone())
            .collect()
    }

    fn index_of(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    // -------------------------------------------------------------------------
    // Open / close
    // -------------------------------------------------------------------------

    /// Expand the dropdown.
    ///
    /// No-op when already open, disabled, or while the shared cooldown from a
    /// recent pick is armed.
    pub fn open(&mut self) {
        if !self.active() || self.open || self.is_disabled() {
            return;
        }
        if self.ctx.cooldown.is_blocked() {
            tracing::trace!("select open refused during cooldown");
            return;
        }
        self.open = true;
        self.dropdown_hidden = false;
        self.pending_hide = None;
        tracing::debug!(name = %self.config.name, "select opened");
        self.outbox.push(SelectMessage::Emit(SelectEvent::Open));
        let first = self.options.iter().position(|o| o.selected).unwrap_or(0);
        self.focus_option(first as isize);
    }

    /// Collapse the dropdown. Idempotent.
    pub fn close(&mut self) {
        if !self.active() || !self.open {
            return;
        }
        self.open = false;
        self.focused = None;
        let now = self.ctx.clock.now_ms();
        self.pending_hide = Some(PendingHide {
            fallback: Deadline::after(now, self.ctx.timings.close_hide_fallback_ms),
            opacity_done: false,
            transform_done: false,
        });
        tracing::debug!(name = %self.config.name, "select closed");
        self.outbox.push(SelectMessage::Emit(SelectEvent::Close));
    }

    /// Open when closed, close when open.
    pub fn toggle(&mut self) {
        if !self.active() {
            return;
        }
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    fn finish_hide(&mut self) {
        self.pending_hide = None;
        if !self.open {
            self.dropdown_hidden = true;
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Replace the whole selection. Unknown values are dropped.
    ///
    /// In single mode an open dropdown closes and focus returns to the toggle.
    pub fn set_value(&mut self, input: impl Into<SelectInput>, silent: Silent) {
        if !self.active() {
            return;
        }
        let wanted: Vec<String> = match (input.into(), self.config.multiple) {
            (SelectInput::None, _) => Vec::new(),
            (SelectInput::One(raw), true) => raw
                .split(self.config.delimiter.as_str())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
            (SelectInput::One(value), false) => vec![value],
            (SelectInput::Many(values), true) => values,
            (SelectInput::Many(values), false) => values.into_iter().take(1).collect(),
        };
        for opt in &mut self.options {
            opt.selected = wanted.contains(&opt.value);
        }
        self.after_change(silent);
        if !self.config.multiple {
            self.close_to_toggle();
        }
    }

    /// Select one option.
    ///
    /// Multiple mode toggles membership; single mode replaces the selection
    /// and closes. Unknown values are ignored.
    pub fn select(&mut self, value: &str, silent: Silent) {
        if !self.active() {
            return;
        }
        let Some(index) = self.index_of(value) else {
            return;
        };
        if self.config.multiple {
            let on = !self.options[index].selected;
            for opt in self.options.iter_mut().filter(|o| o.value == value) {
                opt.selected = on;
            }
        } else {
            for opt in &mut self.options {
                opt.selected = opt.value == value;
            }
        }
        self.after_change(silent);
        if !self.config.multiple {
            self.close_to_toggle();
        }
    }

    /// Remove one value from a multiple selection. No-op in single mode.
    pub fn deselect(&mut self, value: &str, silent: Silent) {
        if !self.active() || !self.config.multiple || self.index_of(value).is_none() {
            return;
        }
        for opt in self.options.iter_mut().filter(|o| o.value == value) {
            opt.selected = false;
        }
        self.after_change(silent);
    }

    /// Empty the selection.
    pub fn clear(&mut self, silent: Silent) {
        if !self.active() {
            return;
        }
        for opt in &mut self.options {
            opt.selected = false;
        }
        self.after_change(silent);
    }

    fn after_change(&mut self, silent: Silent) {
        let detail = self.change_detail();
        tracing::debug!(name = %self.config.name, values = ?detail.values, "select changed");
        self.outbox
            .push_unless(silent, SelectMessage::Emit(SelectEvent::Change(detail)));
    }

    /// Payload a `select:change` would carry right now.
    #[must_use]
    pub fn change_detail(&self) -> ChangeDetail {
        let values = self.selected_values();
        ChangeDetail {
            value: values.first().cloned(),
            values,
            labels: self.selected_labels(),
        }
    }

    fn close_to_toggle(&mut self) {
        if self.open {
            self.close();
            self.outbox.push(SelectMessage::FocusToggle);
        }
    }

    /// Pick the option at `index` the way a user does.
    fn pick(&mut self, index: usize) {
        let Some(value) = self.options.get(index).map(|o| o.value.clone()) else {
            return;
        };
        if self.config.multiple {
            self.select(&value, Silent::NO);
            self.block_next_click = true;
        } else {
            let was_open = self.open;
            self.select(&value, Silent::NO);
            if !was_open {
                self.outbox.push(SelectMessage::FocusToggle);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Enable / disable / teardown
    // -------------------------------------------------------------------------

    /// Allow opening again.
    pub fn enable(&mut self) {
        if self.active() {
            self.disabled = false;
        }
    }

    /// Refuse opening and close if open.
    pub fn disable(&mut self) {
        if !self.active() {
            return;
        }
        self.disabled = true;
        self.close();
    }

    /// Close, hide the dropdown at once and turn every later call into a
    /// no-op. No deadline is left pending.
    pub fn destroy(&mut self) {
        if !self.active() {
            return;
        }
        self.close();
        self.finish_hide();
        self.gesture = None;
        self.block_next_click = false;
        self.lifecycle = Lifecycle::Destroyed;
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    fn focus_option(&mut self, index: isize) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        let index = index.clamp(0, len as isize - 1) as usize;
        self.focused = Some(index);
        self.outbox.push(SelectMessage::FocusOption(index));
    }

    fn on_key(&mut self, key: Key, target: EventTarget) -> Handled {
        if target == EventTarget::Toggle {
            match key {
                Key::Down | Key::Up => {
                    self.open();
                    return Handled::Yes;
                }
                Key::Enter | Key::Space => {
                    self.toggle();
                    return Handled::Yes;
                }
                Key::Escape => {
                    self.close();
                    return Handled::No;
                }
                _ => {}
            }
        }

        if !self.open {
            return Handled::No;
        }
        let current = self.focused.map_or(-1, |i| i as isize);
        match key {
            Key::Down => self.focus_option(current + 1),
            Key::Up => self.focus_option(current - 1),
            Key::Home => self.focus_option(0),
            Key::End => self.focus_option(self.options.len() as isize - 1),
            Key::Enter | Key::Space => {
                if let Some(index) = self.focused {
                    self.pick(index);
                }
            }
            Key::Escape => {
                self.close();
                self.outbox.push(SelectMessage::FocusToggle);
            }
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn on_pointer_down(&mut self, position: Point, target: EventTarget) -> Handled {
        match target {
            EventTarget::Outside => {
                self.close();
                Handled::No
            }
            EventTarget::Item(index) if index < self.options.len() => {
                self.gesture = Some(Gesture {
                    start: position,
                    start_scroll: self.list_scroll,
                    moved: false,
                });
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn track_movement(&mut self, position: Option<Point>) {
        let threshold = self.ctx.timings.move_threshold_px;
        let scroll = self.list_scroll;
        if let Some(gesture) = self.gesture.as_mut() {
            if gesture.moved {
                return;
            }
            let travelled = position.is_some_and(|p| gesture.start.axis_delta_exceeds(&p, threshold));
            let scrolled = scroll != gesture.start_scroll;
            if travelled || scrolled {
                gesture.moved = true;
                tracing::trace!(travelled, scrolled, "select gesture is a scroll");
            }
        }
    }

    fn on_pointer_up(&mut self, target: EventTarget) -> Handled {
        let Some(gesture) = self.gesture.take() else {
            return Handled::No;
        };
        if gesture.moved {
            return Handled::No;
        }
        let EventTarget::Item(index) = target else {
            return Handled::No;
        };
        if index >= self.options.len() {
            return Handled::No;
        }
        self.pick(index);
        if !self
            .ctx
            .cooldown
            .try_acquire(self.ctx.timings.open_cooldown_ms)
        {
            tracing::trace!("select cooldown already armed");
        }
        Handled::Yes
    }

    fn on_click(&mut self, target: EventTarget) -> Handled {
        if std::mem::take(&mut self.block_next_click) {
            return Handled::from(target.is_inside());
        }
        if target == EventTarget::Toggle {
            self.toggle();
        }
        Handled::No
    }

    fn on_transition_end(&mut self, property: &str) {
        let Some(pending) = self.pending_hide.as_mut() else {
            return;
        };
        if self.open {
            return;
        }
        match property {
            "opacity" => pending.opacity_done = true,
            "transform" => pending.transform_done = true,
            _ => return,
        }
        if pending.opacity_done && pending.transform_done {
            self.finish_hide();
        }
    }

    fn form_value(&self) -> FormValue {
        if self.config.multiple && self.config.multi_input && self.has_inputs {
            let values = if self.config.name.is_empty() {
                Vec::new()
            } else {
                self.selected_values()
            };
            return FormValue::PerValue {
                name: self.config.name.clone(),
                values,
            };
        }
        if !self.has_input {
            return FormValue::None;
        }
        let values = self.selected_values();
        if self.config.multiple {
            FormValue::Joined(values.join(&self.config.delimiter))
        } else {
            FormValue::Joined(values.into_iter().next().unwrap_or_default())
        }
    }
}

impl Widget for Select {
    type View = SelectView;
    type Message = SelectMessage;

    fn kind(&self) -> &'static str {
        "select"
    }

    fn is_active(&self) -> bool {
        self.active()
    }

    /// [`Handled::Yes`] asks the host to prevent the default action and stop
    /// propagation.
    fn event(&mut self, event: &Event) -> Handled {
        if !self.active() {
            return Handled::No;
        }
        match event {
            Event::PointerDown { position, target } => self.on_pointer_down(*position, *target),
            Event::PointerMove { position } => {
                self.track_movement(Some(*position));
                Handled::No
            }
            Event::Scrolled { offset } => {
                self.list_scroll = *offset;
                self.track_movement(None);
                Handled::No
            }
            Event::PointerUp { target, .. } => self.on_pointer_up(*target),
            Event::PointerCancel => {
                self.gesture = None;
                Handled::No
            }
            Event::Click { target } => self.on_click(*target),
            Event::KeyDown { key, target, .. } => self.on_key(*key, *target),
            Event::TransitionEnd { property } => {
                self.on_transition_end(property);
                Handled::No
            }
            _ => Handled::No,
        }
    }

    fn tick(&mut self) {
        let now = self.ctx.clock.now_ms();
        if self
            .pending_hide
            .is_some_and(|pending| pending.fallback.is_due(now))
        {
            self.finish_hide();
        }
    }

    fn next_deadline(&self) -> Option<Deadline> {
        self.pending_hide.map(|pending| pending.fallback)
    }

    fn view(&self) -> SelectView {
        let labels = self.selected_labels();
        let has_value = !labels.is_empty();
        SelectView {
            open: self.open,
            disabled: self.disabled,
            dropdown_hidden: self.dropdown_hidden,
            label: if has_value {
                labels.join(", ")
            } else {
                self.config.placeholder.clone()
            },
            has_value,
            options: self
                .options
                .iter()
                .enumerate()
                .map(|(i, o)| OptionView {
                    value: o.value.clone(),
                    selected: o.selected,
                    focused: self.focused == Some(i),
                })
                .collect(),
            form: self.form_value(),
        }
    }

    fn take_messages(&mut self) -> Vec<SelectMessage> {
        self.outbox.drain()
    }
}

/// Build one select per root.
pub fn init_selects<M: Markup>(
    roots: impl IntoIterator<Item = M>,
    overrides: &SelectOverrides,
    ctx: &SelectContext,
) -> Vec<Select> {
    roots
        .into_iter()
        .map(|root| Select::from_markup(Some(&root), overrides, ctx.clone()))
        .collect()
}
