//! DOM binding for [`Accordion`].

use super::app::document;
use super::dom::DomElement;
use super::listener::{ListenOptions, Listener};
use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::{Event, EventTarget, Markup, Widget};
use vitrine_widgets::accordion::{ROOTS, TRIGGERS};
use vitrine_widgets::Accordion;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

struct State {
    accordion: Accordion,
    root: DomElement,
}

impl State {
    fn click(&mut self) {
        self.accordion.event(&Event::Click {
            target: EventTarget::Toggle,
        });
        self.root.set_class("open", self.accordion.view());
    }
}

/// An [`Accordion`] bound to its root.
#[wasm_bindgen]
pub struct AccordionBinding {
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for AccordionBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccordionBinding")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl AccordionBinding {
    /// Bind `root`; every trigger inside it toggles the section.
    pub fn mount(root: web_sys::Element) -> Result<Self, JsValue> {
        let root = DomElement(root);
        let mut triggers: Vec<DomElement> = Vec::new();
        for trigger in TRIGGERS.iter().flat_map(|q| root.find_all(q)) {
            if !triggers.iter().any(|seen| seen.is_same(&trigger)) {
                triggers.push(trigger);
            }
        }
        let state = Rc::new(RefCell::new(State {
            accordion: Accordion::from_markup(&root),
            root,
        }));
        let mut listeners = Vec::with_capacity(triggers.len());
        for trigger in &triggers {
            let weak = Rc::downgrade(&state);
            listeners.push(Listener::new(
                trigger.element(),
                "click",
                ListenOptions::BUBBLE,
                move |_| {
                    if let Some(state) = weak.upgrade() {
                        state.borrow_mut().click();
                    }
                },
            )?);
        }
        Ok(Self { state, listeners })
    }
}

#[wasm_bindgen]
impl AccordionBinding {
    /// Bind `root`.
    #[wasm_bindgen(constructor)]
    pub fn new(root: web_sys::Element) -> Result<AccordionBinding, JsValue> {
        Self::mount(root)
    }

    /// Whether the section is expanded.
    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.state.borrow().accordion.is_open()
    }

    /// Remove every listener.
    pub fn destroy(&mut self) {
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
    }
}

/// Bind every accordion root, current and legacy markup alike, once each.
pub fn mount_accordions() -> Result<Vec<AccordionBinding>, JsValue> {
    let selector = ROOTS.iter().map(|q| q.to_css()).collect::<Vec<_>>().join(", ");
    let list = document()?.query_selector_all(&selector)?;
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(AccordionBinding::mount)
        .collect()
}
