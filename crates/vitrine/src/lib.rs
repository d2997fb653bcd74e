//! Vitrine: interactive widgets for marketing sites.
//!
//! Widgets are headless state machines (see [`widgets`]) driven by typed
//! [`Event`]s and rendered from `view()` snapshots. On `wasm32` the
//! [`browser`] module binds them to live DOM elements.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { SelectBinding } from './vitrine.js';
//!
//! async function main() {
//!     await init();
//!     const root = document.querySelector('#cert-select');
//!     const select = new SelectBinding(root);
//!     root.addEventListener('select:change', (e) => console.log(e.detail.values));
//!     select.setValue('diesel', false);
//! }
//! ```

#![allow(
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::needless_pass_by_value,
    clippy::too_many_lines,
    clippy::use_self
)]

pub use vitrine_core::*;
pub use vitrine_widgets as widgets;

pub use vitrine_widgets::{
    ChangeDetail, ContactField, Counter, CounterConfig, CounterMessage, GeneratorTotal,
    ModalConfig, ModalRegistry, PhoneMask, Quiz, Select, SelectConfig, SelectContext,
    SelectEvent, SelectMessage, SelectOption, SelectOverrides, SelectValue, SelectView, Tabs,
};

pub mod page;

pub use page::{Page, PageMessage, PageOptions};

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{
    init, mount_accordions, mount_contact_fields, mount_counters, mount_phone_masks, mount_quiz,
    mount_selects, mount_tabs, AccordionBinding, ContactFieldBinding, CounterBinding,
    ModalBinding, PhoneMaskBinding, QuizBinding, SelectBinding, TabsBinding,
};
