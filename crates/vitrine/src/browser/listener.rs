//! Event listener registration objects.
//!
//! Every `addEventListener` call made by a binding is owned by a
//! [`Listener`]. Detaching removes exactly the registration that was made
//! (same target, type, callback and capture flag), and dropping a listener
//! detaches it.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, EventTarget};

/// `addEventListener` options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenOptions {
    /// Listen in the capture phase
    pub capture: bool,
    /// Promise never to call `preventDefault()`
    pub passive: bool,
}

impl ListenOptions {
    /// Bubble phase, not passive.
    pub const BUBBLE: Self = Self {
        capture: false,
        passive: false,
    };

    /// Capture phase.
    pub const CAPTURE: Self = Self {
        capture: true,
        passive: false,
    };

    /// Bubble phase, passive.
    pub const PASSIVE: Self = Self {
        capture: false,
        passive: true,
    };
}

/// One registered event listener.
pub struct Listener {
    target: EventTarget,
    event_type: &'static str,
    capture: bool,
    closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("event_type", &self.event_type)
            .field("capture", &self.capture)
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

impl Listener {
    /// Register `callback` for `event_type` on `target`.
    pub fn new<F>(
        target: &EventTarget,
        event_type: &'static str,
        options: ListenOptions,
        callback: F,
    ) -> Result<Self, JsValue>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(callback);
        let opts = AddEventListenerOptions::new();
        opts.set_capture(options.capture);
        opts.set_passive(options.passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        Ok(Self {
            target: target.clone(),
            event_type,
            capture: options.capture,
            closure: Some(closure),
        })
    }

    /// Event type this listener is registered for.
    pub const fn event_type(&self) -> &'static str {
        self.event_type
    }

    /// Whether the registration is still live.
    pub const fn is_attached(&self) -> bool {
        self.closure.is_some()
    }

    /// Remove the registration. Calling it again is a no-op.
    pub fn detach(&mut self) {
        if let Some(closure) = self.closure.take() {
            if let Err(err) = self.target.remove_event_listener_with_callback_and_bool(
                self.event_type,
                closure.as_ref().unchecked_ref(),
                self.capture,
            ) {
                tracing::warn!(event_type = self.event_type, ?err, "removeEventListener failed");
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.detach();
    }
}
