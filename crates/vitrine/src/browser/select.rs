//! DOM binding for [`Select`].
//!
//! Listener layout:
//! - document `pointerdown`: pointer presses outside the root close it
//! - document `click` (capture): swallows the click that follows a pointer pick
//! - root `keydown`, toggle `click`
//! - dropdown `pointerdown` / `pointerup` / `pointercancel` (capture),
//!   `pointermove` (passive) and `transitionend`
//! - list `scroll`

use super::app::document;
use super::dom::DomElement;
use super::events::{key_down, pointer_position, transition_end};
use super::listener::{ListenOptions, Listener};
use super::timer::Scheduler;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use vitrine_core::{Clock, Event, EventTarget, Handled, Markup, Query, Silent, Widget};
use vitrine_widgets::select::OPTION_CLASS;
use vitrine_widgets::{
    FormValue, Select, SelectContext, SelectInput, SelectMessage, SelectOverrides, SelectView,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{KeyboardEvent, PointerEvent, TransitionEvent};

#[derive(Debug, Clone)]
struct Refs {
    root: DomElement,
    toggle: Option<DomElement>,
    dropdown: Option<DomElement>,
    list: Option<DomElement>,
    value: Option<DomElement>,
    input: Option<DomElement>,
    inputs: Option<DomElement>,
    options: Vec<DomElement>,
}

impl Refs {
    fn new(root: DomElement) -> Self {
        let list = root.find_ref("list");
        let options = list
            .as_ref()
            .map(|list| list.find_all(&Query::Class(OPTION_CLASS)))
            .unwrap_or_default();
        Self {
            toggle: root.find_ref("toggle"),
            dropdown: root.find_ref("dropdown"),
            value: root.find_ref("value"),
            input: root.find_ref("input"),
            inputs: root.find_ref("inputs"),
            list,
            options,
            root,
        }
    }

    fn inside(&self, anchor: Option<&DomElement>, node: Option<&web_sys::Node>) -> bool {
        anchor.is_some_and(|a| a.contains(node))
    }

    /// Resolve the part of the select an event target belongs to.
    fn target_of(&self, event: &web_sys::Event) -> EventTarget {
        let Some(node) = event.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok()) else {
            return EventTarget::Outside;
        };
        if !self.in_path(event) && !self.root.contains(Some(&node)) {
            return EventTarget::Outside;
        }
        if let Some(option) = node
            .dyn_ref::<web_sys::Element>()
            .map(|el| DomElement(el.clone()))
            .or_else(|| node.parent_element().map(DomElement))
            .and_then(|el| el.closest(&format!(".{OPTION_CLASS}")))
        {
            if let Some(index) = self.options.iter().position(|o| o.is_same(&option)) {
                return EventTarget::Item(index);
            }
        }
        if self.inside(self.toggle.as_ref(), Some(&node)) {
            return EventTarget::Toggle;
        }
        EventTarget::Root
    }

    /// Whether the root appears in the event's composed path, which also
    /// covers targets inside shadow trees.
    fn in_path(&self, event: &web_sys::Event) -> bool {
        event
            .composed_path()
            .includes(self.root.element().as_ref(), 0)
    }

    fn render(&self, view: &SelectView) {
        self.root.set_class("is-open", view.open);
        self.root.set_class("is-disabled", view.disabled);
        if let Some(toggle) = &self.toggle {
            toggle.set_attr("aria-expanded", Some(if view.open { "true" } else { "false" }));
            toggle.set_flag("disabled", view.disabled);
        }
        if let Some(dropdown) = &self.dropdown {
            dropdown.set_flag("hidden", view.dropdown_hidden);
            dropdown.set_style("display", if view.dropdown_hidden { "none" } else { "" });
        }
        if let Some(value) = &self.value {
            value.set_text(&view.label);
            value.set_class("has-value", view.has_value);
        }
        for (el, option) in self.options.iter().zip(&view.options) {
            el.set_class("is-selected", option.selected);
            el.set_attr("aria-selected", Some(if option.selected { "true" } else { "false" }));
            el.set_class("is-focused", option.focused);
        }
        match &view.form {
            FormValue::None => {}
            FormValue::Joined(joined) => {
                if let Some(input) = &self.input {
                    input.set_value(joined);
                }
            }
            FormValue::PerValue { name, values } => {
                if let Some(inputs) = &self.inputs {
                    if let Err(err) = render_hidden_inputs(inputs, name, values) {
                        tracing::warn!(?err, "select hidden inputs not rendered");
                    }
                }
            }
        }
    }

    fn apply(&self, message: &SelectMessage) {
        match message {
            SelectMessage::Emit(event) => {
                if let Err(err) = self.root.dispatch(event.name(), event.detail()) {
                    tracing::warn!(event = event.name(), ?err, "select event not dispatched");
                }
            }
            SelectMessage::FocusToggle => {
                if let Some(toggle) = &self.toggle {
                    toggle.focus();
                }
            }
            SelectMessage::FocusOption(index) => {
                if let Some(option) = self.options.get(*index) {
                    option.focus();
                    option.scroll_into_view_nearest();
                }
            }
        }
    }
}

fn render_hidden_inputs(container: &DomElement, name: &str, values: &[String]) -> Result<(), JsValue> {
    let doc = document()?;
    container.element().set_inner_html("");
    for value in values {
        let input = doc.create_element("input")?;
        input.set_attribute("type", "hidden")?;
        input.set_attribute("name", name)?;
        input.set_attribute("value", value)?;
        container.element().append_child(&input)?;
    }
    Ok(())
}

struct State {
    select: Select,
    refs: Refs,
    clock: Rc<dyn Clock>,
    timer: Scheduler,
}

/// Hand `event` to the select, then render and flush its messages.
fn dispatch(state: &Rc<RefCell<State>>, event: &Event) -> Handled {
    let handled = state.borrow_mut().select.event(event);
    flush(state);
    handled
}

/// Render, re-arm the hide timer and apply queued messages. Messages are
/// applied after the borrow ends so `select:*` listeners may call back in.
fn flush(state: &Rc<RefCell<State>>) {
    let (messages, refs) = {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        s.refs.render(&s.select.view());
        let weak = Rc::downgrade(state);
        let now = s.clock.now_ms();
        s.timer.schedule(s.select.next_deadline(), now, move || on_timer(&weak));
        (s.select.take_messages(), s.refs.clone())
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
        s.select.tick();
    }
    flush(&state);
}

fn consume(event: &web_sys::Event, handled: Handled) {
    if handled.is_handled() {
        event.prevent_default();
        event.stop_propagation();
    }
}

/// A [`Select`] bound to its root element.
#[wasm_bindgen]
pub struct SelectBinding {
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for SelectBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectBinding")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl SelectBinding {
    /// Build the select from `root` and register its listeners. A root
    /// missing required anchors mounts as an inactive select with no
    /// listeners.
    pub fn mount(
        root: web_sys::Element,
        overrides: &SelectOverrides,
        ctx: SelectContext,
    ) -> Result<Self, JsValue> {
        let root = DomElement(root);
        let clock = Rc::clone(ctx.clock());
        let select = Select::from_markup(Some(&root), overrides, ctx);
        let active = select.is_active();
        let state = Rc::new(RefCell::new(State {
            select,
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
        let listener = Listener::new(target, event_type, options, move |event| {
            if let Some(state) = weak.upgrade() {
                handler(&state, event);
            }
        })?;
        self.listeners.push(listener);
        Ok(())
    }

    fn attach(&mut self) -> Result<(), JsValue> {
        let doc: web_sys::EventTarget = document()?.into();
        let refs = self.state.borrow().refs.clone();

        self.listen(&doc, "pointerdown", ListenOptions::BUBBLE, |state, event| {
            let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let target = state.borrow().refs.target_of(&event);
            if target == EventTarget::Outside {
                dispatch(
                    state,
                    &Event::PointerDown {
                        position: pointer_position(pointer),
                        target,
                    },
                );
            }
        })?;

        self.listen(&doc, "click", ListenOptions::CAPTURE, |state, event| {
            let target = match state.borrow().refs.target_of(&event) {
                EventTarget::Toggle => EventTarget::Root,
                other => other,
            };
            let handled = dispatch(state, &Event::Click { target });
            consume(&event, handled);
        })?;

        self.listen(
            refs.root.element(),
            "keydown",
            ListenOptions::BUBBLE,
            |state, event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let target = state.borrow().refs.target_of(&event);
                let handled = dispatch(state, &key_down(key, target));
                consume(&event, handled);
            },
        )?;

        if let Some(toggle) = &refs.toggle {
            self.listen(toggle.element(), "click", ListenOptions::BUBBLE, |state, _| {
                dispatch(
                    state,
                    &Event::Click {
                        target: EventTarget::Toggle,
                    },
                );
            })?;
        }

        if let Some(dropdown) = &refs.dropdown {
            self.listen(
                dropdown.element(),
                "pointerdown",
                ListenOptions::CAPTURE,
                |state, event| {
                    let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    let target = state.borrow().refs.target_of(&event);
                    let handled = dispatch(
                        state,
                        &Event::PointerDown {
                            position: pointer_position(pointer),
                            target,
                        },
                    );
                    consume(&event, handled);
                },
            )?;
            self.listen(
                dropdown.element(),
                "pointermove",
                ListenOptions::PASSIVE,
                |state, event| {
                    if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
                        dispatch(
                            state,
                            &Event::PointerMove {
                                position: pointer_position(pointer),
                            },
                        );
                    }
                },
            )?;
            self.listen(
                dropdown.element(),
                "pointerup",
                ListenOptions::CAPTURE,
                |state, event| {
                    let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    let target = state.borrow().refs.target_of(&event);
                    let handled = dispatch(
                        state,
                        &Event::PointerUp {
                            position: pointer_position(pointer),
                            target,
                        },
                    );
                    consume(&event, handled);
                },
            )?;
            self.listen(
                dropdown.element(),
                "pointercancel",
                ListenOptions::CAPTURE,
                |state, _| {
                    dispatch(state, &Event::PointerCancel);
                },
            )?;
            let own = dropdown.clone();
            self.listen(
                dropdown.element(),
                "transitionend",
                ListenOptions::BUBBLE,
                move |state, event| {
                    let Some(transition) = event.dyn_ref::<TransitionEvent>() else {
                        return;
                    };
                    let on_dropdown = event
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                        .is_some_and(|el| own.is_same(&DomElement(el)));
                    if on_dropdown {
                        dispatch(state, &transition_end(transition));
                    }
                },
            )?;
        }

        if let Some(list) = &refs.list {
            let scroller = list.clone();
            self.listen(
                list.element(),
                "scroll",
                ListenOptions::PASSIVE,
                move |state, _| {
                    dispatch(
                        state,
                        &Event::Scrolled {
                            offset: scroller.element().scroll_top() as f32,
                        },
                    );
                },
            )?;
        }
        Ok(())
    }

    /// Rust access to the headless select.
    pub fn with_select<R>(&self, f: impl FnOnce(&Select) -> R) -> R {
        f(&self.state.borrow().select)
    }

    fn update(&self, f: impl FnOnce(&mut Select)) {
        f(&mut self.state.borrow_mut().select);
        flush(&self.state);
    }
}

fn input_from_js(value: &JsValue) -> SelectInput {
    if let Some(one) = value.as_string() {
        return SelectInput::One(one);
    }
    if js_sys::Array::is_array(value) {
        return SelectInput::Many(
            js_sys::Array::from(value)
                .iter()
                .filter_map(|v| v.as_string())
                .collect(),
        );
    }
    SelectInput::None
}

#[wasm_bindgen]
impl SelectBinding {
    /// Mount on `root` with the wall clock and the page-wide cooldown.
    #[wasm_bindgen(constructor)]
    pub fn new(root: web_sys::Element) -> Result<SelectBinding, JsValue> {
        Self::mount(root, &SelectOverrides::default(), SelectContext::system())
    }

    /// Open the dropdown.
    pub fn open(&self) {
        self.update(Select::open);
    }

    /// Close the dropdown.
    pub fn close(&self) {
        self.update(Select::close);
    }

    /// Open when closed, close when open.
    pub fn toggle(&self) {
        self.update(Select::toggle);
    }

    /// Current value: a string or `null` in single mode, an array in
    /// multiple mode.
    pub fn value(&self) -> Result<JsValue, JsValue> {
        let value = self.with_select(Select::value);
        Ok(serde_wasm_bindgen::to_value(&value)?)
    }

    /// Replace the selection with a string, an array of strings or `null`.
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&self, value: JsValue, silent: bool) {
        let input = input_from_js(&value);
        self.update(|select| select.set_value(input, Silent(silent)));
    }

    /// Select `value`. Multiple mode toggles membership; single mode
    /// replaces the selection.
    pub fn select(&self, value: &str, silent: bool) {
        self.update(|select| select.select(value, Silent(silent)));
    }

    /// Remove `value` from a multiple selection.
    pub fn deselect(&self, value: &str, silent: bool) {
        self.update(|select| select.deselect(value, Silent(silent)));
    }

    /// Deselect everything.
    pub fn clear(&self, silent: bool) {
        self.update(|select| select.clear(Silent(silent)));
    }

    /// Enable the select.
    pub fn enable(&self) {
        self.update(Select::enable);
    }

    /// Disable the select, closing it.
    pub fn disable(&self) {
        self.update(Select::disable);
    }

    /// Whether the select ignores input.
    #[wasm_bindgen(js_name = isDisabled)]
    pub fn is_disabled(&self) -> bool {
        self.with_select(Select::is_disabled)
    }

    /// Remove every listener and leave the select closed with its dropdown
    /// hidden. An open select still reports `select:close`.
    pub fn destroy(&mut self) {
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
        self.state.borrow_mut().select.destroy();
        flush(&self.state);
        self.state.borrow_mut().timer.cancel();
        tracing::debug!("select binding destroyed");
    }
}

/// Mount a [`SelectBinding`] on every element matching `selector`.
/// Selects mounted together share the page-wide cooldown.
pub fn mount_selects(selector: &str) -> Result<Vec<SelectBinding>, JsValue> {
    let list = document()?.query_selector_all(selector)?;
    let ctx = SelectContext::system();
    let overrides = SelectOverrides::default();
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(|root| SelectBinding::mount(root, &overrides, ctx.clone()))
        .collect()
}
