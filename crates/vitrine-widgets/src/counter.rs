//! Numeric stepper with press-and-hold repeat.
//!
//! Markup: a root carrying `data-min`, `data-max`, `data-step` and
//! `data-name`, with `.counter__btn--minus`, `.counter__btn--plus` and a
//! value display (`[data-ref="value"]` span and/or `[data-ref="value-input"]`
//! field). An optional `[data-ref="hidden"]` input mirrors the value.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use vitrine_core::attrs::{parse_number, read_number, read_string};
use vitrine_core::{
    Clock, Deadline, Event, EventTarget, Handled, Key, Markup, MarkupError, Outbox, Query, Silent,
    SystemClock, Widget,
};

/// Counter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Hidden input name
    pub name: String,
    /// Lower bound, also the origin of the step grid
    pub min: f64,
    /// Upper bound
    pub max: f64,
    /// Step size
    pub step: f64,
    /// Press duration before auto-repeat starts
    pub hold_delay_ms: f64,
    /// Auto-repeat period
    pub hold_interval_ms: f64,
    /// Accept typed values in the value input
    pub allow_manual: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            min: 0.0,
            max: f64::INFINITY,
            step: 1.0,
            hold_delay_ms: 350.0,
            hold_interval_ms: 75.0,
            allow_manual: true,
        }
    }
}

impl CounterConfig {
    /// Read `data-*` attributes over `base`.
    pub fn from_markup<M: Markup>(root: Option<&M>, base: Self) -> Self {
        Self {
            name: read_string(root, "data-name").unwrap_or(base.name),
            min: read_number(root, "data-min").unwrap_or(base.min),
            max: read_number(root, "data-max").unwrap_or(base.max),
            step: read_number(root, "data-step").unwrap_or(base.step),
            ..base
        }
    }

    /// Snap to the step grid anchored at `min`.
    ///
    /// Halves round up, and the result is trimmed to ten decimals so that
    /// steps like `0.1` do not accumulate float noise.
    #[must_use]
    pub fn round_to_step(&self, n: f64) -> f64 {
        let base = if self.min.is_finite() { self.min } else { 0.0 };
        let step = if self.step == 0.0 || !self.step.is_finite() {
            1.0
        } else {
            self.step
        };
        let k = ((n - base) / step + 0.5).floor();
        let snapped = k.mul_add(step, base);
        format!("{snapped:.10}").parse().unwrap_or(snapped)
    }

    /// Clamp to `min..=max`.
    #[must_use]
    pub fn clamp(&self, n: f64) -> f64 {
        let min = if self.min.is_finite() {
            self.min
        } else {
            f64::NEG_INFINITY
        };
        let max = if self.max.is_finite() {
            self.max
        } else {
            f64::INFINITY
        };
        n.max(min).min(max)
    }

    /// Round, then clamp.
    #[must_use]
    pub fn normalize(&self, n: f64) -> f64 {
        self.clamp(self.round_to_step(n))
    }
}

/// Format a value the way it is shown: no trailing `.0`.
#[must_use]
pub fn format_count(value: f64) -> String {
    format!("{value}")
}

/// Outbound messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CounterMessage {
    /// `counter:change` with `detail: { value }`
    Change {
        /// New value
        value: f64,
    },
}

impl CounterMessage {
    /// DOM event type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        "counter:change"
    }
}

/// Render snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterView {
    /// Text for the span, the hidden input and the value input
    pub value: String,
    /// Raw text left in the value input after an unparsable edit
    pub input_text: String,
    /// `disabled` on the minus button
    pub minus_disabled: bool,
    /// `disabled` on the plus button
    pub plus_disabled: bool,
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    direction: f64,
    next: Deadline,
}

/// Numeric stepper.
pub struct Counter {
    config: CounterConfig,
    clock: Rc<dyn Clock>,
    inactive: Option<MarkupError>,
    destroyed: bool,
    has_input: bool,
    value: f64,
    raw_input: Option<String>,
    input_focused: bool,
    hold: Option<Hold>,
    outbox: Outbox<CounterMessage>,
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter")
            .field("config", &self.config)
            .field("value", &self.value)
            .field("inactive", &self.inactive)
            .finish_non_exhaustive()
    }
}

impl Counter {
    /// Counter with an explicit starting value and a value input.
    #[must_use]
    pub fn new(initial: f64, config: CounterConfig, clock: Rc<dyn Clock>) -> Self {
        let value = config.normalize(initial);
        Self {
            config,
            clock,
            inactive: None,
            destroyed: false,
            has_input: true,
            value,
            raw_input: None,
            input_focused: false,
            hold: None,
            outbox: Outbox::new(),
        }
    }

    /// Build from the counter root.
    ///
    /// The initial value comes from the value input, then the span text, then
    /// the hidden input, falling back to `min`.
    pub fn from_markup<M: Markup>(
        root: Option<&M>,
        base: CounterConfig,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let config = CounterConfig::from_markup(root, base);
        let find = |query: Query<'_>| root.and_then(|r| r.find(&query));
        let minus = find(Query::Class("counter__btn--minus"));
        let plus = find(Query::Class("counter__btn--plus"));
        let span = find(Query::AttrEq("data-ref", "value"));
        let input = find(Query::AttrEq("data-ref", "value-input"));
        let hidden = find(Query::AttrEq("data-ref", "hidden"));

        let inactive = if root.is_none() {
            Some(MarkupError::MissingRoot { widget: "counter" })
        } else if minus.is_none() {
            Some(MarkupError::MissingAnchor {
                widget: "counter",
                anchor: "counter__btn--minus",
            })
        } else if plus.is_none() {
            Some(MarkupError::MissingAnchor {
                widget: "counter",
                anchor: "counter__btn--plus",
            })
        } else if span.is_none() && input.is_none() {
            Some(MarkupError::MissingAnchor {
                widget: "counter",
                anchor: "value",
            })
        } else {
            None
        };
        if let Some(err) = &inactive {
            tracing::debug!(%err, "counter inactive");
        }

        let initial = input
            .as_ref()
            .and_then(|el| parse_number(&el.attr("value").unwrap_or_default()))
            .or_else(|| span.as_ref().and_then(|el| parse_number(el.text().trim())))
            .or_else(|| {
                hidden
                    .as_ref()
                    .and_then(|el| parse_number(&el.attr("value").unwrap_or_default()))
            })
            .unwrap_or(config.min);

        let mut counter = Self::new(initial, config, clock);
        counter.inactive = inactive;
        counter.has_input = input.is_some();
        counter
    }

    /// Counter over the wall clock with default configuration.
    #[must_use]
    pub fn with_defaults(initial: f64) -> Self {
        Self::new(initial, CounterConfig::default(), Rc::new(SystemClock::new()))
    }

    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Current value.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.value
    }

    /// Why the counter went inactive.
    #[must_use]
    pub const fn inactive_reason(&self) -> Option<&MarkupError> {
        self.inactive.as_ref()
    }

    /// Set a value, snapped and clamped. Emits only on an actual change.
    pub fn set(&mut self, value: f64, silent: Silent) {
        if !self.is_active() {
            return;
        }
        let v = self.config.normalize(value);
        if !v.is_finite() {
            return;
        }
        self.raw_input = None;
        if v == self.value {
            return;
        }
        self.value = v;
        tracing::trace!(value = v, "counter changed");
        self.outbox
            .push_unless(silent, CounterMessage::Change { value: v });
    }

    /// One step up.
    pub fn inc(&mut self) {
        self.set(self.value + self.config.step, Silent::NO);
    }

    /// One step down.
    pub fn dec(&mut self) {
        self.set(self.value - self.config.step, Silent::NO);
    }

    fn step(&mut self, direction: f64) {
        if direction > 0.0 {
            self.inc();
        } else {
            self.dec();
        }
    }

    fn start_hold(&mut self, direction: f64) {
        self.step(direction);
        let now = self.clock.now_ms();
        self.hold = Some(Hold {
            direction,
            next: Deadline::after(now, self.config.hold_delay_ms),
        });
    }

    /// Stop auto-repeat and ignore further input.
    pub fn destroy(&mut self) {
        self.hold = None;
        self.destroyed = true;
    }

    fn manual(&self) -> bool {
        self.has_input && self.config.allow_manual
    }

    fn on_key(&mut self, key: Key, target: EventTarget) -> Handled {
        match (target, key) {
            (EventTarget::Increment, Key::Enter | Key::Space | Key::Up) => self.inc(),
            (EventTarget::Decrement, Key::Enter | Key::Space | Key::Down) => self.dec(),
            (EventTarget::Input, Key::Up) if self.manual() => self.inc(),
            (EventTarget::Input, Key::Down) if self.manual() => self.dec(),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn on_text(&mut self, text: &str) {
        match parse_number(text) {
            Some(n) => self.set(n, Silent::NO),
            None => self.raw_input = Some(text.to_string()),
        }
    }
}

impl Widget for Counter {
    type View = CounterView;
    type Message = CounterMessage;

    fn kind(&self) -> &'static str {
        "counter"
    }

    fn is_active(&self) -> bool {
        self.inactive.is_none() && !self.destroyed
    }

    fn event(&mut self, event: &Event) -> Handled {
        if !self.is_active() {
            return Handled::No;
        }
        match event {
            Event::PointerDown {
                target: EventTarget::Increment,
                ..
            } => {
                self.start_hold(1.0);
                Handled::Yes
            }
            Event::PointerDown {
                target: EventTarget::Decrement,
                ..
            } => {
                self.start_hold(-1.0);
                Handled::Yes
            }
            Event::PointerUp { .. } | Event::PointerCancel => {
                self.hold = None;
                Handled::No
            }
            Event::KeyDown { key, target, .. } => self.on_key(*key, *target),
            Event::TextInput { value, .. } if self.manual() => {
                self.on_text(value);
                Handled::No
            }
            Event::FocusIn => {
                self.input_focused = true;
                Handled::No
            }
            Event::FocusOut => {
                self.input_focused = false;
                if self.manual() {
                    let typed = self.raw_input.take().and_then(|raw| parse_number(&raw));
                    self.set(typed.unwrap_or(self.value), Silent::NO);
                }
                Handled::No
            }
            Event::Wheel { delta_y } if self.manual() && self.input_focused => {
                if *delta_y < 0.0 {
                    self.inc();
                } else if *delta_y > 0.0 {
                    self.dec();
                }
                Handled::No
            }
            _ => Handled::No,
        }
    }

    fn tick(&mut self) {
        let now = self.clock.now_ms();
        let Some(hold) = self.hold else {
            return;
        };
        if hold.next.is_due(now) {
            self.step(hold.direction);
            self.hold = Some(Hold {
                direction: hold.direction,
                next: Deadline::after(now, self.config.hold_interval_ms),
            });
        }
    }

    fn next_deadline(&self) -> Option<Deadline> {
        self.hold.map(|hold| hold.next)
    }

    fn view(&self) -> CounterView {
        let value = format_count(self.value);
        CounterView {
            input_text: self.raw_input.clone().unwrap_or_else(|| value.clone()),
            value,
            minus_disabled: self.value <= self.config.min,
            plus_disabled: self.value >= self.config.max,
        }
    }

    fn take_messages(&mut self) -> Vec<CounterMessage> {
        self.outbox.drain()
    }
}

/// Build one counter per root.
pub fn init_counters<M: Markup>(
    roots: impl IntoIterator<Item = M>,
    base: &CounterConfig,
    clock: &Rc<dyn Clock>,
) -> Vec<Counter> {
    roots
        .into_iter()
        .map(|root| Counter::from_markup(Some(&root), base.clone(), Rc::clone(clock)))
        .collect()
}
