//! Widget state machines for Vitrine.
//!
//! Every widget implements [`vitrine_core::Widget`]: it reads its markup once,
//! reacts to resolved [`vitrine_core::Event`]s and exposes a view snapshot and
//! a message queue for the host to apply.

#[cfg(feature = "layout-widgets")]
pub mod accordion;
#[cfg(feature = "form-widgets")]
pub mod contact_field;
#[cfg(feature = "form-widgets")]
pub mod counter;
#[cfg(feature = "form-widgets")]
pub mod generator_total;
#[cfg(feature = "layout-widgets")]
pub mod modal;
#[cfg(feature = "form-widgets")]
pub mod phone_mask;
#[cfg(feature = "form-widgets")]
pub mod quiz;
#[cfg(feature = "form-widgets")]
pub mod quiz_progress;
#[cfg(feature = "form-widgets")]
pub mod select;
#[cfg(feature = "layout-widgets")]
pub mod tabs;

#[cfg(feature = "layout-widgets")]
pub use accordion::{is_accordion_root, Accordion};
#[cfg(feature = "form-widgets")]
pub use contact_field::{ContactChannel, ContactField, ContactFieldView};
#[cfg(feature = "form-widgets")]
pub use counter::{init_counters, Counter, CounterConfig, CounterMessage, CounterView};
#[cfg(feature = "form-widgets")]
pub use generator_total::{format_total, GeneratorTotal, TotalConfig};
#[cfg(feature = "layout-widgets")]
pub use modal::{
    CloseReason, ModalConfig, ModalMessage, ModalRegistry, ModalTimings, ModalTrigger, ModalView,
    RegistryView, TriggerAction,
};
#[cfg(feature = "form-widgets")]
pub use phone_mask::{clean_phone, format_phone, PhoneMask, PhoneMaskView, PHONE_MASK};
#[cfg(feature = "form-widgets")]
pub use quiz::{FormField, Quiz, QuizForm, QuizMessage, QuizOption, QuizSubmission, QuizView};
#[cfg(feature = "form-widgets")]
pub use quiz_progress::{ProgressTimings, QuizProgress, QuizProgressView};
#[cfg(feature = "form-widgets")]
pub use select::{
    init_selects, ChangeDetail, FormValue, OptionView, Select, SelectConfig, SelectContext,
    SelectEvent, SelectInput, SelectMessage, SelectOption, SelectOverrides, SelectTimings,
    SelectValue, SelectView,
};
#[cfg(feature = "layout-widgets")]
pub use tabs::{TabButton, TabButtonView, TabChanged, Tabs, TabsView};
