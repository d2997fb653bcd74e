//! Live DOM elements behind the [`Markup`] trait, plus the handful of
//! writes bindings make when applying a view.

use serde::Serialize;
use vitrine_core::{Markup, Query};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CustomEvent, CustomEventInit, Element, HtmlElement, HtmlInputElement, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

/// A DOM element handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomElement(pub Element);

impl From<Element> for DomElement {
    fn from(el: Element) -> Self {
        Self(el)
    }
}

impl Markup for DomElement {
    fn tag(&self) -> String {
        self.0.tag_name().to_ascii_lowercase()
    }

    /// `value` on form inputs reads the live property, not the attribute.
    fn attr(&self, name: &str) -> Option<String> {
        if name == "value" {
            if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
                return Some(input.value());
            }
        }
        self.0.get_attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn find_all(&self, query: &Query<'_>) -> Vec<Self> {
        let Ok(list) = self.0.query_selector_all(&query.to_css()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(Self)
            .collect()
    }

    fn is_same(&self, other: &Self) -> bool {
        self.0.is_same_node(Some(other.0.as_ref()))
    }
}

impl DomElement {
    /// Underlying element.
    pub const fn element(&self) -> &Element {
        &self.0
    }

    /// Whether `node` is this element or one of its descendants.
    pub fn contains(&self, node: Option<&web_sys::Node>) -> bool {
        self.0.contains(node)
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, selector: &str) -> Option<Self> {
        self.0.closest(selector).ok().flatten().map(Self)
    }

    /// Add or remove a class.
    pub fn set_class(&self, class: &str, on: bool) {
        if let Err(err) = self.0.class_list().toggle_with_force(class, on) {
            tracing::warn!(class, ?err, "classList.toggle failed");
        }
    }

    /// Set or remove an attribute.
    pub fn set_attr(&self, name: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.0.set_attribute(name, value),
            None => self.0.remove_attribute(name),
        };
        if let Err(err) = result {
            tracing::warn!(name, ?err, "attribute write failed");
        }
    }

    /// Set or remove a boolean attribute such as `disabled` or `hidden`.
    pub fn set_flag(&self, name: &str, on: bool) {
        self.set_attr(name, on.then_some(""));
    }

    /// Replace the text content when it differs.
    pub fn set_text(&self, text: &str) {
        if self.0.text_content().as_deref() != Some(text) {
            self.0.set_text_content(Some(text));
        }
    }

    /// Set an inline style property; an empty value removes it.
    pub fn set_style(&self, property: &str, value: &str) {
        let Some(el) = self.0.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            tracing::warn!(property, ?err, "style write failed");
        }
    }

    /// Write the live `value` of an input.
    pub fn set_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            if input.value() != value {
                input.set_value(value);
            }
        }
    }

    /// Caret position of an input, in UTF-16 units.
    pub fn caret(&self) -> Option<usize> {
        let input = self.0.dyn_ref::<HtmlInputElement>()?;
        input.selection_start().ok().flatten().map(|c| c as usize)
    }

    /// Collapse the selection of an input to `caret`.
    pub fn set_caret(&self, caret: usize) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            let caret = u32::try_from(caret).unwrap_or(u32::MAX);
            if let Err(err) = input.set_selection_range(caret, caret) {
                tracing::trace!(?err, "setSelectionRange rejected");
            }
        }
    }

    /// Move keyboard focus here.
    pub fn focus(&self) {
        if let Some(el) = self.0.dyn_ref::<HtmlElement>() {
            if let Err(err) = el.focus() {
                tracing::trace!(?err, "focus rejected");
            }
        }
    }

    /// Scroll into view along the block axis only as far as needed.
    pub fn scroll_into_view_nearest(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_block(ScrollLogicalPosition::Nearest);
        self.0.scroll_into_view_with_scroll_into_view_options(&options);
    }

    /// Dispatch a bubbling `CustomEvent`, with `detail` when given.
    pub fn dispatch<D: Serialize>(&self, event_type: &str, detail: Option<&D>) -> Result<(), JsValue> {
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        if let Some(detail) = detail {
            let value = detail
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(JsValue::from)?;
            init.set_detail(&value);
        }
        let event = CustomEvent::new_with_event_init_dict(event_type, &init)?;
        self.0.dispatch_event(&event)?;
        Ok(())
    }
}
