//! DOM binding for [`ModalRegistry`].
//!
//! Document listeners handle `[data-modal]` triggers (click),
//! `[data-modal-on-focus]` fields (focusin) and Escape. Each registered
//! modal also listens for backdrop clicks and its `[data-close]` buttons.

use super::app::document;
use super::dom::DomElement;
use super::events::key_down;
use super::listener::{ListenOptions, Listener};
use super::timer::Scheduler;
use crate::page::PageOptions;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use vitrine_core::{Clock, EventTarget, Markup, Query, SystemClock, Widget};
use vitrine_widgets::{ModalConfig, ModalMessage, ModalRegistry, ModalTrigger, RegistryView};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

const OPEN_EVENT: &str = "modal:open";
const CLOSE_EVENT: &str = "modal:close";

struct State {
    registry: ModalRegistry,
    modals: Vec<DomElement>,
    body: Option<DomElement>,
    /// Last view written, so untouched modals keep their markup
    rendered: RegistryView,
    clock: Rc<dyn Clock>,
    timer: Scheduler,
}

fn by_id<'a>(modals: &'a [DomElement], id: &str) -> Option<&'a DomElement> {
    modals.iter().find(|el| el.attr("id").as_deref() == Some(id))
}

impl State {
    fn render(&mut self) {
        let view = self.registry.view();
        for modal in &view.modals {
            if self.rendered.modals.contains(modal) {
                continue;
            }
            let Some(el) = by_id(&self.modals, &modal.id) else {
                continue;
            };
            el.set_class("open", modal.open);
            el.set_style("display", if modal.displayed { "block" } else { "none" });
            el.set_attr("aria-hidden", Some(if modal.aria_hidden { "true" } else { "false" }));
        }
        if view.body_scroll_locked != self.rendered.body_scroll_locked {
            if let Some(body) = &self.body {
                body.set_style("overflow", if view.body_scroll_locked { "hidden" } else { "" });
            }
        }
        self.rendered = view;
    }
}

fn apply(modals: &[DomElement], message: &ModalMessage) {
    let (name, id, detail) = match message {
        ModalMessage::Opened { id } => (OPEN_EVENT, id, serde_json::json!({ "id": id })),
        ModalMessage::Closed { id, reason } => (
            CLOSE_EVENT,
            id,
            serde_json::json!({ "id": id, "reason": reason }),
        ),
    };
    let Some(el) = by_id(modals, id) else {
        return;
    };
    if let Err(err) = el.dispatch(name, Some(&detail)) {
        tracing::warn!(event = name, ?err, "modal event not dispatched");
    }
}

/// Run `f` against the registry, then flush.
fn update<R>(state: &Rc<RefCell<State>>, f: impl FnOnce(&mut ModalRegistry) -> R) -> R {
    let result = f(&mut state.borrow_mut().registry);
    flush(state);
    result
}

/// Render, re-arm the hide timer and dispatch `modal:*` events once the
/// borrow is released.
fn flush(state: &Rc<RefCell<State>>) {
    let (messages, modals) = {
        let mut s = state.borrow_mut();
        s.render();
        let s = &mut *s;
        let weak = Rc::downgrade(state);
        let now = s.clock.now_ms();
        s.timer
            .schedule(s.registry.next_deadline(), now, move || on_timer(&weak));
        (s.registry.take_messages(), s.modals.clone())
    };
    for message in &messages {
        apply(&modals, message);
    }
}

fn on_timer(weak: &Weak<RefCell<State>>) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    {
        let mut s = state.borrow_mut();
        s.timer.cancel();
        s.registry.tick();
    }
    flush(&state);
}

/// Nearest ancestor-or-self of the event target matching `selector`.
fn closest(event: &web_sys::Event, selector: &str) -> Option<DomElement> {
    let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
    DomElement(target).closest(selector)
}

/// Every modal on the page behind one [`ModalRegistry`].
#[wasm_bindgen]
pub struct ModalBinding {
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for ModalBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalBinding")
            .field("modals", &self.state.borrow().modals.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl ModalBinding {
    /// Register the document-wide trigger listeners. Modals are added with
    /// [`ModalBinding::register_element`].
    pub fn mount(clock: Rc<dyn Clock>) -> Result<Self, JsValue> {
        let doc = document()?;
        let registry = ModalRegistry::new(Rc::clone(&clock));
        let rendered = registry.view();
        let state = Rc::new(RefCell::new(State {
            registry,
            modals: Vec::new(),
            body: doc.body().map(|b| DomElement(b.into())),
            rendered,
            clock,
            timer: Scheduler::new(),
        }));
        let mut binding = Self {
            state,
            listeners: Vec::new(),
        };
        binding.attach(&doc.into())?;
        Ok(binding)
    }

    fn listen<F>(
        &mut self,
        target: &web_sys::EventTarget,
        event_type: &'static str,
        mut handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(&Rc<RefCell<State>>, web_sys::Event) + 'static,
    {
        let weak = Rc::downgrade(&self.state);
        self.listeners.push(Listener::new(
            target,
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

    fn attach(&mut self, doc: &web_sys::EventTarget) -> Result<(), JsValue> {
        self.listen(doc, "click", |state, event| {
            let Some(trigger) = closest(&event, "[data-modal]")
                .and_then(|el| ModalTrigger::from_markup(&el))
            else {
                return;
            };
            update(state, |registry| registry.trigger(&trigger));
        })?;
        self.listen(doc, "focusin", |state, event| {
            let Some(id) = closest(&event, "[data-modal-on-focus]")
                .and_then(|el| el.attr("data-modal-on-focus"))
            else {
                return;
            };
            update(state, |registry| registry.focus_trigger(&id));
        })?;
        self.listen(doc, "keydown", |state, event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                update(state, |registry| registry.event(&key_down(key, EventTarget::Root)));
            }
        })
    }

    /// Register `el` under its `id` with `config` and bind its backdrop and
    /// `[data-close]` buttons. Elements without an id are skipped.
    pub fn register_element(
        &mut self,
        el: web_sys::Element,
        config: ModalConfig,
    ) -> Result<bool, JsValue> {
        let modal = DomElement(el);
        let Some(id) = modal.attr("id").filter(|id| !id.is_empty()) else {
            return Ok(false);
        };
        {
            let mut s = self.state.borrow_mut();
            s.registry.register_markup(&modal, config);
            s.rendered = s.registry.view();
            s.modals.retain(|seen| !seen.is_same(&modal));
            s.modals.push(modal.clone());
        }

        let own = modal.clone();
        let backdrop_id = id.clone();
        self.listen(modal.element(), "click", move |state, event| {
            let on_backdrop = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .is_some_and(|target| own.is_same(&DomElement(target)));
            if on_backdrop {
                update(state, |registry| registry.backdrop_click(&backdrop_id));
            }
        })?;
        for button in modal.find_all(&Query::Attr("data-close")) {
            let id = id.clone();
            let data_close = button.attr("data-close");
            self.listen(button.element(), "click", move |state, _| {
                update(state, |registry| registry.close_button(&id, data_close.as_deref()));
            })?;
        }
        tracing::debug!(%id, "modal bound");
        Ok(true)
    }
}

#[wasm_bindgen]
impl ModalBinding {
    /// Bind the page's default modals (`mobile-menu`, `modal-form`,
    /// `video-player-modal`) with the wall clock.
    #[allow(clippy::new_without_default)]
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ModalBinding, JsValue> {
        let options = PageOptions::default();
        let doc = document()?;
        let mut binding = Self::mount(Rc::new(SystemClock::new()))?;
        for id in &options.modals {
            if let Some(el) = doc.get_element_by_id(id) {
                binding.register_element(el, options.modal)?;
            }
        }
        Ok(binding)
    }

    /// Register the element with id `id`. Returns whether it was found.
    pub fn register(
        &mut self,
        id: &str,
        close_on_backdrop: bool,
        close_on_escape: bool,
        exclusive: bool,
    ) -> Result<bool, JsValue> {
        let Some(el) = document()?.get_element_by_id(id) else {
            return Ok(false);
        };
        let config = ModalConfig {
            close_on_backdrop,
            close_on_escape,
            exclusive,
        };
        self.register_element(el, config)
    }

    /// Open modal `id`.
    pub fn open(&self, id: &str) {
        update(&self.state, |registry| registry.open(id));
    }

    /// Close modal `id`.
    pub fn close(&self, id: &str) {
        update(&self.state, |registry| registry.close(id));
    }

    /// Open when closed, close when open.
    pub fn toggle(&self, id: &str) {
        update(&self.state, |registry| registry.toggle(id));
    }

    /// Close every open modal.
    #[wasm_bindgen(js_name = closeAll)]
    pub fn close_all(&self) {
        update(&self.state, |registry| registry.close_all(None));
    }

    /// Whether modal `id` is open.
    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self, id: &str) -> bool {
        self.state.borrow().registry.is_open(id)
    }

    /// Ids of the open modals.
    #[wasm_bindgen(js_name = openModals)]
    pub fn open_modals(&self) -> Result<JsValue, JsValue> {
        let s = self.state.borrow();
        Ok(serde_wasm_bindgen::to_value(&s.registry.open_modals())?)
    }

    /// Remove every listener and cancel the hide timer.
    pub fn destroy(&mut self) {
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
        self.state.borrow_mut().timer.cancel();
    }
}
