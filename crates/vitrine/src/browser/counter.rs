//! DOM binding for [`Counter`].

use super::app::document;
use super::dom::DomElement;
use super::events::{key_down, pointer_position, wheel};
use super::listener::{ListenOptions, Listener};
use super::timer::Scheduler;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use vitrine_core::{Clock, Event, EventTarget, Markup, Query, Silent, SystemClock, Widget};
use vitrine_widgets::{Counter, CounterConfig, CounterMessage, CounterView};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{KeyboardEvent, PointerEvent, WheelEvent};

#[derive(Debug, Clone)]
struct Refs {
    root: DomElement,
    minus: Option<DomElement>,
    plus: Option<DomElement>,
    span: Option<DomElement>,
    input: Option<DomElement>,
    hidden: Option<DomElement>,
}

impl Refs {
    fn new(root: DomElement) -> Self {
        Self {
            minus: root.find(&Query::Class("counter__btn--minus")),
            plus: root.find(&Query::Class("counter__btn--plus")),
            span: root.find(&Query::AttrEq("data-ref", "value")),
            input: root.find(&Query::AttrEq("data-ref", "value-input")),
            hidden: root.find(&Query::AttrEq("data-ref", "hidden")),
            root,
        }
    }

    fn render(&self, view: &CounterView) {
        if let Some(span) = &self.span {
            span.set_text(&view.value);
        }
        if let Some(input) = &self.input {
            if input.attr("value").as_deref() != Some(view.input_text.as_str()) {
                input.set_value(&view.input_text);
            }
        }
        if let Some(hidden) = &self.hidden {
            hidden.set_value(&view.value);
        }
        if let Some(minus) = &self.minus {
            minus.set_flag("disabled", view.minus_disabled);
        }
        if let Some(plus) = &self.plus {
            plus.set_flag("disabled", view.plus_disabled);
        }
    }

    fn apply(&self, message: &CounterMessage) {
        let CounterMessage::Change { value } = message;
        let detail = serde_json::json!({ "value": value });
        if let Err(err) = self.root.dispatch(message.name(), Some(&detail)) {
            tracing::warn!(event = message.name(), ?err, "counter event not dispatched");
        }
    }
}

struct State {
    counter: Counter,
    refs: Refs,
    clock: Rc<dyn Clock>,
    timer: Scheduler,
}

fn dispatch(state: &Rc<RefCell<State>>, event: &Event) {
    state.borrow_mut().counter.event(event);
    flush(state);
}

/// Render, re-arm the hold timer and dispatch `counter:change` once the
/// borrow is released.
fn flush(state: &Rc<RefCell<State>>) {
    let (messages, refs) = {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        s.refs.render(&s.counter.view());
        let weak = Rc::downgrade(state);
        let now = s.clock.now_ms();
        s.timer
            .schedule(s.counter.next_deadline(), now, move || on_timer(&weak));
        (s.counter.take_messages(), s.refs.clone())
    };
    for message in &messages {
        refs.apply(message);
    }
}

fn on_timer(weak: &Weak<RefCell<State>>) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    {
        let mut s = state.borrow_mut();
        s.timer.cancel();
        s.counter.tick();
    }
    flush(&state);
}

/// A [`Counter`] bound to its root element.
#[wasm_bindgen]
pub struct CounterBinding {
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for CounterBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterBinding")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CounterBinding {
    /// Build the counter from `root` with `base` under its `data-*`
    /// overrides.
    pub fn mount(
        root: web_sys::Element,
        base: CounterConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, JsValue> {
        let root = DomElement(root);
        let counter = Counter::from_markup(Some(&root), base, Rc::clone(&clock));
        let active = counter.is_active();
        let state = Rc::new(RefCell::new(State {
            counter,
            refs: Refs::new(root),
            clock,
            timer: Scheduler::new(),
        }));
        let mut binding = Self {
            state,
            listeners: Vec::new(),
        };
        if active {
            binding.attach()?;
            flush(&binding.state);
        }
        Ok(binding)
    }

    fn listen<F>(
        &mut self,
        target: &web_sys::EventTarget,
        event_type: &'static str,
        options: ListenOptions,
        mut handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(&Rc<RefCell<State>>, web_sys::Event) + 'static,
    {
        let weak = Rc::downgrade(&self.state);
        self.listeners
            .push(Listener::new(target, event_type, options, move |event| {
                if let Some(state) = weak.upgrade() {
                    handler(&state, event);
                }
            })?);
        Ok(())
    }

    fn attach_button(&mut self, button: &DomElement, target: EventTarget) -> Result<(), JsValue> {
        self.listen(
            button.element(),
            "pointerdown",
            ListenOptions::BUBBLE,
            move |state, event| {
                let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if pointer.button() != 0 {
                    return;
                }
                event.prevent_default();
                dispatch(
                    state,
                    &Event::PointerDown {
                        position: pointer_position(pointer),
                        target,
                    },
                );
            },
        )?;
        self.listen(
            button.element(),
            "keydown",
            ListenOptions::BUBBLE,
            move |state, event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let handled = state.borrow_mut().counter.event(&key_down(key, target));
                flush(state);
                if handled.is_handled() {
                    event.prevent_default();
                }
            },
        )
    }

    fn attach(&mut self) -> Result<(), JsValue> {
        let doc: web_sys::EventTarget = document()?.into();
        let refs = self.state.borrow().refs.clone();

        if let Some(minus) = &refs.minus {
            self.attach_button(minus, EventTarget::Decrement)?;
        }
        if let Some(plus) = &refs.plus {
            self.attach_button(plus, EventTarget::Increment)?;
        }

        self.listen(&doc, "pointerup", ListenOptions::BUBBLE, |state, event| {
            if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
                dispatch(
                    state,
                    &Event::PointerUp {
                        position: pointer_position(pointer),
                        target: EventTarget::Outside,
                    },
                );
            }
        })?;
        self.listen(&doc, "pointercancel", ListenOptions::BUBBLE, |state, _| {
            dispatch(state, &Event::PointerCancel);
        })?;

        let Some(input) = &refs.input else {
            return Ok(());
        };
        let field = input.clone();
        self.listen(
            input.element(),
            "input",
            ListenOptions::BUBBLE,
            move |state, _| {
                let value = field.attr("value").unwrap_or_default();
                let caret = field.caret().unwrap_or_else(|| value.chars().count());
                dispatch(state, &Event::TextInput { value, caret });
            },
        )?;
        self.listen(
            input.element(),
            "keydown",
            ListenOptions::BUBBLE,
            |state, event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let handled = state
                    .borrow_mut()
                    .counter
                    .event(&key_down(key, EventTarget::Input));
                flush(state);
                if handled.is_handled() {
                    event.prevent_default();
                }
            },
        )?;
        self.listen(input.element(), "focus", ListenOptions::BUBBLE, |state, _| {
            dispatch(state, &Event::FocusIn);
        })?;
        self.listen(input.element(), "blur", ListenOptions::BUBBLE, |state, _| {
            dispatch(state, &Event::FocusOut);
        })?;
        self.listen(
            input.element(),
            "wheel",
            ListenOptions::BUBBLE,
            |state, event| {
                let Some(wheel_event) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                let before = state.borrow().counter.get();
                dispatch(state, &wheel(wheel_event));
                if state.borrow().counter.get() != before {
                    event.prevent_default();
                }
            },
        )?;
        Ok(())
    }

    /// Rust access to the headless counter.
    pub fn with_counter<R>(&self, f: impl FnOnce(&Counter) -> R) -> R {
        f(&self.state.borrow().counter)
    }

    fn update(&self, f: impl FnOnce(&mut Counter)) {
        f(&mut self.state.borrow_mut().counter);
        flush(&self.state);
    }
}

#[wasm_bindgen]
impl CounterBinding {
    /// Mount on `root` with default configuration and the wall clock.
    #[wasm_bindgen(constructor)]
    pub fn new(root: web_sys::Element) -> Result<CounterBinding, JsValue> {
        Self::mount(root, CounterConfig::default(), Rc::new(SystemClock::new()))
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        self.with_counter(Counter::get)
    }

    /// Set a value, snapped to the step and clamped.
    pub fn set(&self, value: f64, silent: bool) {
        self.update(|counter| counter.set(value, Silent(silent)));
    }

    /// One step up.
    pub fn inc(&self) {
        self.update(Counter::inc);
    }

    /// One step down.
    pub fn dec(&self) {
        self.update(Counter::dec);
    }

    /// Stop auto-repeat and remove every listener.
    pub fn destroy(&mut self) {
        {
            let mut s = self.state.borrow_mut();
            s.counter.destroy();
            s.timer.cancel();
        }
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
    }
}

/// Mount a counter on every element matching `selector`, sharing one clock.
pub fn mount_counters(selector: &str) -> Result<Vec<CounterBinding>, JsValue> {
    let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());
    let list = document()?.query_selector_all(selector)?;
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(|root| CounterBinding::mount(root, CounterConfig::default(), Rc::clone(&clock)))
        .collect()
}
