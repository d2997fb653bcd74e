//! DOM binding for [`PhoneMask`].

use super::app::document;
use super::dom::DomElement;
use super::events::key_down;
use super::listener::{ListenOptions, Listener};
use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::{Event, EventTarget, Handled, Markup, Widget};
use vitrine_widgets::phone_mask::{field_attributes, is_phone_field, PHONE_FIELD_SELECTOR};
use vitrine_widgets::PhoneMask;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, KeyboardEvent};

struct State {
    mask: PhoneMask,
    input: DomElement,
}

impl State {
    fn render(&self) {
        let view = self.mask.view();
        self.input.set_value(&view.value);
        self.input.set_caret(view.caret);
    }
}

/// Handle `event`; field writes happen for edits and for handled keys only,
/// so plain navigation keeps the user's selection.
fn dispatch(state: &Rc<RefCell<State>>, event: &Event, render: bool) -> Handled {
    let mut s = state.borrow_mut();
    let handled = s.mask.event(event);
    if render || handled.is_handled() {
        s.render();
    }
    handled
}

/// A [`PhoneMask`] bound to an `<input>`.
#[wasm_bindgen]
pub struct PhoneMaskBinding {
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for PhoneMaskBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhoneMaskBinding")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl PhoneMaskBinding {
    /// Mask `input`: enforce `type=tel`, `inputmode` and the placeholder,
    /// reformat the current value and register listeners.
    pub fn mount(input: web_sys::Element) -> Result<Self, JsValue> {
        let input = DomElement(input);
        let mask = PhoneMask::from_markup(Some(&input));
        let active = mask.is_active();
        let state = Rc::new(RefCell::new(State {
            mask,
            input: input.clone(),
        }));
        let mut binding = Self {
            state,
            listeners: Vec::new(),
        };
        if !active {
            return Ok(binding);
        }
        for (name, value) in field_attributes(&input) {
            input.set_attr(name, Some(&value));
        }
        if !input.attr("value").unwrap_or_default().is_empty() {
            binding.state.borrow().render();
        }
        binding.attach(&input)?;
        Ok(binding)
    }

    fn listen<F>(&mut self, input: &DomElement, event_type: &'static str, mut handler: F) -> Result<(), JsValue>
    where
        F: FnMut(&Rc<RefCell<State>>, web_sys::Event) + 'static,
    {
        let weak = Rc::downgrade(&self.state);
        self.listeners.push(Listener::new(
            input.element(),
            event_type,
            ListenOptions::BUBBLE,
            move |event| {
                if let Some(state) = weak.upgrade() {
                    handler(&state, event);
                }
            },
        )?);
        Ok(())
    }

    fn attach(&mut self, input: &DomElement) -> Result<(), JsValue> {
        self.listen(input, "input", |state, _| {
            let (value, caret) = {
                let s = state.borrow();
                let value = s.input.attr("value").unwrap_or_default();
                let caret = s.input.caret().unwrap_or_else(|| value.chars().count());
                (value, caret)
            };
            dispatch(state, &Event::TextInput { value, caret }, true);
        })?;

        self.listen(input, "keydown", |state, event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            {
                let mut s = state.borrow_mut();
                let value = s.input.attr("value").unwrap_or_default();
                let caret = s.input.caret().unwrap_or_else(|| value.chars().count());
                s.mask.sync(&value, caret);
            }
            if dispatch(state, &key_down(key, EventTarget::Input), false).is_handled() {
                event.prevent_default();
            }
        })?;

        self.listen(input, "paste", |state, event| {
            let text = event
                .dyn_ref::<ClipboardEvent>()
                .and_then(ClipboardEvent::clipboard_data)
                .and_then(|data| data.get_data("text").ok())
                .unwrap_or_default();
            if dispatch(state, &Event::Paste { text }, true).is_handled() {
                event.prevent_default();
            }
        })?;

        self.listen(input, "focus", |state, _| {
            dispatch(state, &Event::FocusIn, true);
        })?;

        self.listen(input, "blur", |state, _| {
            dispatch(state, &Event::FocusOut, true);
        })?;
        Ok(())
    }
}

#[wasm_bindgen]
impl PhoneMaskBinding {
    /// Mask `input`.
    #[wasm_bindgen(constructor)]
    pub fn new(input: web_sys::Element) -> Result<PhoneMaskBinding, JsValue> {
        Self::mount(input)
    }

    /// Digits only.
    #[wasm_bindgen(js_name = cleanValue)]
    pub fn clean_value(&self) -> String {
        self.state.borrow().mask.clean_value()
    }

    /// Value as displayed.
    #[wasm_bindgen(js_name = formattedValue)]
    pub fn formatted_value(&self) -> String {
        self.state.borrow().mask.formatted_value().to_string()
    }

    /// Whether the field holds a complete number.
    #[wasm_bindgen(js_name = isValid)]
    pub fn is_valid(&self) -> bool {
        self.state.borrow().mask.is_valid()
    }

    /// Remove every listener.
    pub fn destroy(&mut self) {
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
    }
}

/// Mask every phone field on the page. Contact-value fields are left to
/// their channel switcher.
pub fn mount_phone_masks() -> Result<Vec<PhoneMaskBinding>, JsValue> {
    let list = document()?.query_selector_all(PHONE_FIELD_SELECTOR)?;
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .filter(|el| is_phone_field(&DomElement(el.clone())))
        .map(PhoneMaskBinding::mount)
        .collect()
}
