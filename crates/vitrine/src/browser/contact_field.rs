//! DOM binding for [`ContactField`].
//!
//! Listens for `select:change` on the channel select and rewrites the value
//! input. Phone channels hand the input to a [`PhoneMaskBinding`], which is
//! detached again when the channel moves on.

use super::app::document;
use super::dom::DomElement;
use super::listener::{ListenOptions, Listener};
use super::phone_mask::PhoneMaskBinding;
use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::{Event, Markup, Query, Widget};
use vitrine_widgets::contact_field::{CHANNEL_SELECT_NAME, CONTACT_VALUE_NAME};
use vitrine_widgets::{ChangeDetail, ContactField};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::CustomEvent;

struct State {
    field: ContactField,
    input: Option<DomElement>,
    mask: Option<PhoneMaskBinding>,
}

impl State {
    /// Write the channel's attributes, then attach or drop the mask.
    fn render(&mut self) -> Result<(), JsValue> {
        let Some(input) = &self.input else {
            return Ok(());
        };
        let view = self.field.view();
        if let Some(mut mask) = self.mask.take() {
            mask.destroy();
        }
        input.set_value(&view.value);
        input.set_attr("type", Some(view.input_type));
        input.set_attr("placeholder", Some(view.placeholder));
        input.set_attr("inputmode", None);
        if self.field.is_masked() {
            self.mask = Some(PhoneMaskBinding::mount(input.element().clone())?);
        }
        tracing::debug!(channel = ?view.channel, masked = self.mask.is_some(), "contact field rendered");
        Ok(())
    }

    fn value(&self) -> String {
        self.mask
            .as_ref()
            .map_or_else(|| self.field.value().to_string(), PhoneMaskBinding::formatted_value)
    }
}

fn on_select_change(state: &Rc<RefCell<State>>, event: &web_sys::Event) {
    let Some(custom) = event.dyn_ref::<CustomEvent>() else {
        return;
    };
    let detail: ChangeDetail = match serde_wasm_bindgen::from_value(custom.detail()) {
        Ok(detail) => detail,
        Err(err) => {
            tracing::warn!(%err, "select:change detail unreadable");
            return;
        }
    };
    let mut s = state.borrow_mut();
    s.field.on_channel_change(&detail);
    if let Err(err) = s.render() {
        tracing::warn!(?err, "contact field not rendered");
    }
}

/// A [`ContactField`] bound to the form holding the channel select and the
/// value input.
#[wasm_bindgen]
pub struct ContactFieldBinding {
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for ContactFieldBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactFieldBinding")
            .field("listeners", &self.listeners.len())
            .field("masked", &self.state.borrow().mask.is_some())
            .finish_non_exhaustive()
    }
}

impl ContactFieldBinding {
    /// Bind to `form`. A form without both anchors mounts inert.
    pub fn mount(form: web_sys::Element) -> Result<Self, JsValue> {
        let form = DomElement(form);
        let field = ContactField::from_markup(Some(&form));
        let select = form
            .find_all(&Query::AttrEq("data-name", CHANNEL_SELECT_NAME))
            .into_iter()
            .find(|s| s.attr("data-component").as_deref() == Some("select"));
        let input = form
            .find_all(&Query::TagAttrEq("input", "name", CONTACT_VALUE_NAME))
            .into_iter()
            .find(|el| el.has_attr("data-quiz-contact-field"));
        let picked = select
            .as_ref()
            .and_then(|s| s.find(&Query::TagAttrEq("input", "type", "hidden")))
            .and_then(|hidden| hidden.attr("value"))
            .is_some_and(|v| !v.is_empty());
        let active = field.is_active();
        let state = Rc::new(RefCell::new(State {
            field,
            input,
            mask: None,
        }));
        let mut binding = Self {
            state,
            listeners: Vec::new(),
        };
        let Some(select) = select.filter(|_| active) else {
            return Ok(binding);
        };
        if picked {
            binding.state.borrow_mut().render()?;
        }
        binding.attach(&select)?;
        Ok(binding)
    }

    fn attach(&mut self, select: &DomElement) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.state);
        self.listeners.push(Listener::new(
            select.element(),
            "select:change",
            ListenOptions::BUBBLE,
            move |event| {
                if let Some(state) = weak.upgrade() {
                    on_select_change(&state, &event);
                }
            },
        )?);

        let Some(input) = self.state.borrow().input.clone() else {
            return Ok(());
        };
        let weak = Rc::downgrade(&self.state);
        let field = input.clone();
        self.listeners.push(Listener::new(
            input.element(),
            "input",
            ListenOptions::BUBBLE,
            move |_| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                let mut s = state.borrow_mut();
                // Masked input belongs to the phone mask binding.
                if s.mask.is_none() {
                    let value = field.attr("value").unwrap_or_default();
                    let caret = field.caret().unwrap_or_else(|| value.chars().count());
                    s.field.event(&Event::TextInput { value, caret });
                }
            },
        )?);
        Ok(())
    }
}

#[wasm_bindgen]
impl ContactFieldBinding {
    /// Bind to `form`.
    #[wasm_bindgen(constructor)]
    pub fn new(form: web_sys::Element) -> Result<ContactFieldBinding, JsValue> {
        Self::mount(form)
    }

    /// Current channel as its select value (`phone`, `email`, ...).
    pub fn channel(&self) -> Result<JsValue, JsValue> {
        let channel = self.state.borrow().field.channel();
        Ok(serde_wasm_bindgen::to_value(&channel)?)
    }

    /// Whether a phone mask currently drives the input.
    #[wasm_bindgen(js_name = isMasked)]
    pub fn is_masked(&self) -> bool {
        self.state.borrow().mask.is_some()
    }

    /// Field value; formatted when masked.
    pub fn value(&self) -> String {
        self.state.borrow().value()
    }

    /// Remove every listener, including the phone mask's.
    pub fn destroy(&mut self) {
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
        if let Some(mut mask) = self.state.borrow_mut().mask.take() {
            mask.destroy();
        }
    }
}

/// Bind every `<form>` that holds a contact-channel select and a contact
/// value input.
pub fn mount_contact_fields() -> Result<Vec<ContactFieldBinding>, JsValue> {
    let list = document()?.query_selector_all("form")?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(ContactFieldBinding::mount)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|binding| !binding.listeners.is_empty())
        .collect())
}
