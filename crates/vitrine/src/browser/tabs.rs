//! DOM binding for [`Tabs`].

use super::app::document;
use super::dom::DomElement;
use super::listener::{ListenOptions, Listener};
use crate::page::TABS_ROOT;
use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::{Event, EventTarget, Markup, Query, Widget};
use vitrine_widgets::tabs::VARIANT_CLASSES;
use vitrine_widgets::{TabChanged, Tabs, TabsView};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Event dispatched on the tabs root after a button is activated.
const CHANGE_EVENT: &str = "tabs:change";

#[derive(Debug, Clone)]
struct Refs {
    root: DomElement,
    buttons: Vec<DomElement>,
    panels: Vec<DomElement>,
}

impl Refs {
    fn render(&self, view: &TabsView) {
        for (el, button) in self.buttons.iter().zip(&view.buttons) {
            el.set_attr("data-tab-active", button.active.then_some("true"));
            if button.variant.is_empty() {
                continue;
            }
            for class in VARIANT_CLASSES {
                el.set_class(class, false);
            }
            el.set_class(&format!("button--{}", button.variant), true);
            el.set_attr("data-tab-variant", Some(&button.variant));
        }
        for (el, active) in self.panels.iter().zip(&view.panels) {
            el.set_attr("data-tab-active", active.then_some("true"));
            el.set_class("tabs_item--active", *active);
        }
    }

    fn apply(&self, message: &TabChanged) {
        if let Err(err) = self.root.dispatch(CHANGE_EVENT, Some(message)) {
            tracing::warn!(event = CHANGE_EVENT, ?err, "tabs event not dispatched");
        }
    }
}

struct State {
    tabs: Tabs,
    refs: Refs,
}

fn dispatch(state: &Rc<RefCell<State>>, event: &Event) {
    let (messages, refs) = {
        let mut s = state.borrow_mut();
        s.tabs.event(event);
        s.refs.render(&s.tabs.view());
        (s.tabs.take_messages(), s.refs.clone())
    };
    for message in &messages {
        refs.apply(message);
    }
}

/// A [`Tabs`] group bound to its `[data-component="tabs"]` root.
#[wasm_bindgen]
pub struct TabsBinding {
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for TabsBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabsBinding")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl TabsBinding {
    /// Bind `root`. Markup the tabs cannot use mounts inert.
    pub fn mount(root: web_sys::Element) -> Result<Self, JsValue> {
        let root = DomElement(root);
        let tabs = Tabs::from_markup(&root);
        let refs = Refs {
            buttons: root.find_all(&Query::Attr("data-tab-button")),
            panels: root.find_all(&Query::Attr("data-tab-content")),
            root,
        };
        let active = tabs.is_active();
        let buttons = refs.buttons.clone();
        let state = Rc::new(RefCell::new(State { tabs, refs }));
        let mut listeners = Vec::new();
        if active {
            for (position, button) in buttons.iter().enumerate() {
                let weak = Rc::downgrade(&state);
                listeners.push(Listener::new(
                    button.element(),
                    "click",
                    ListenOptions::BUBBLE,
                    move |_| {
                        if let Some(state) = weak.upgrade() {
                            dispatch(
                                &state,
                                &Event::Click {
                                    target: EventTarget::Item(position),
                                },
                            );
                        }
                    },
                )?);
            }
        }
        Ok(Self { state, listeners })
    }
}

#[wasm_bindgen]
impl TabsBinding {
    /// Bind `root`.
    #[wasm_bindgen(constructor)]
    pub fn new(root: web_sys::Element) -> Result<TabsBinding, JsValue> {
        Self::mount(root)
    }

    /// Activate the button at `position`, as a click would.
    pub fn activate(&self, position: usize) {
        dispatch(
            &self.state,
            &Event::Click {
                target: EventTarget::Item(position),
            },
        );
    }

    /// Position of the active button, if any.
    #[wasm_bindgen(js_name = activeButton)]
    pub fn active_button(&self) -> Option<usize> {
        self.state.borrow().tabs.active_button()
    }

    /// Index of the visible panel, if any.
    #[wasm_bindgen(js_name = activePanel)]
    pub fn active_panel(&self) -> Option<usize> {
        self.state.borrow().tabs.active_panel()
    }

    /// Remove every listener.
    pub fn destroy(&mut self) {
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
    }
}

/// Bind every `[data-component="tabs"]` root.
pub fn mount_tabs() -> Result<Vec<TabsBinding>, JsValue> {
    let list = document()?.query_selector_all(&TABS_ROOT.to_css())?;
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(TabsBinding::mount)
        .collect()
}
