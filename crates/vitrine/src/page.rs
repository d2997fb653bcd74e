//! Page-wide widget discovery and message routing.
//!
//! [`Page::discover`] finds every widget root in a document the way the
//! site bootstraps on `DOMContentLoaded`, and [`Page::pump`] forwards select
//! and counter changes to the widgets that listen for them (contact fields
//! and the generator summary line).

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use vitrine_core::{Clock, Deadline, Markup, OpenCooldown, Query, Widget};
use vitrine_widgets::contact_field::CHANNEL_SELECT_NAME;
use vitrine_widgets::phone_mask::is_phone_field;
use vitrine_widgets::{
    init_counters, init_selects, Accordion, ContactField, Counter, CounterConfig, CounterMessage,
    GeneratorTotal, ModalConfig, ModalMessage, ModalRegistry, PhoneMask, Quiz, QuizMessage, Select,
    SelectContext, SelectEvent, SelectMessage, SelectOverrides, TabChanged, Tabs, TotalConfig,
};

/// Custom select roots.
pub const SELECT_ROOT: Query<'static> = Query::AttrEq("data-component", "select");

/// Counter roots.
pub const COUNTER_ROOT: Query<'static> = Query::AttrEq("data-component", "counter");

/// Tab group roots.
pub const TABS_ROOT: Query<'static> = Query::AttrEq("data-component", "tabs");

/// Quiz root.
pub const QUIZ_ROOT: Query<'static> = Query::AttrEq("data-component", "quiz");

/// Summary line output.
pub const TOTAL_OUTPUT: Query<'static> = Query::Class("generator-form__total-count");

/// Page discovery options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// Applied to every select
    pub select: SelectOverrides,
    /// Base configuration for every counter
    pub counter: CounterConfig,
    /// Summary line formatting
    pub total: TotalConfig,
    /// `id` of the select feeding the summary line
    pub total_select_id: String,
    /// `id` of the counter feeding the summary line
    pub total_counter_id: String,
    /// Modal ids registered when present in the document
    pub modals: Vec<String>,
    /// Configuration shared by those modals
    pub modal: ModalConfig,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            select: SelectOverrides::default(),
            counter: CounterConfig::default(),
            total: TotalConfig::default(),
            total_select_id: "cert-select".to_string(),
            total_counter_id: "cert-counter".to_string(),
            modals: ["mobile-menu", "modal-form", "video-player-modal"]
                .into_iter()
                .map(String::from)
                .collect(),
            modal: ModalConfig {
                exclusive: true,
                ..ModalConfig::default()
            },
        }
    }
}

/// Outbound message tagged with the widget that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum PageMessage {
    /// From `selects[index]`
    Select {
        /// Position in [`Page::selects`]
        index: usize,
        /// Message
        message: SelectMessage,
    },
    /// From `counters[index]`
    Counter {
        /// Position in [`Page::counters`]
        index: usize,
        /// Message
        message: CounterMessage,
    },
    /// From `tabs[index]`
    Tabs {
        /// Position in [`Page::tabs`]
        index: usize,
        /// Message
        message: TabChanged,
    },
    /// From the modal registry
    Modal(ModalMessage),
    /// From the quiz
    Quiz(QuizMessage),
}

/// Every widget found on one page.
pub struct Page {
    /// Custom selects, document order
    pub selects: Vec<Select>,
    /// Counters, document order
    pub counters: Vec<Counter>,
    /// Masks on phone inputs outside contact fields
    pub phone_masks: Vec<PhoneMask>,
    /// Contact fields, one per form with a channel select
    pub contact_fields: Vec<ContactField>,
    /// Tab groups
    pub tabs: Vec<Tabs>,
    /// Accordions
    pub accordions: Vec<Accordion>,
    /// Registered modals
    pub modals: ModalRegistry,
    /// The quiz, when the page has one
    pub quiz: Option<Quiz>,
    /// The summary line, when the page has one
    pub total: Option<GeneratorTotal>,
    /// `(select, contact field)` pairs
    channel_links: Vec<(usize, usize)>,
    total_select: Option<usize>,
    total_counter: Option<usize>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("selects", &self.selects.len())
            .field("counters", &self.counters.len())
            .field("phone_masks", &self.phone_masks.len())
            .field("contact_fields", &self.contact_fields.len())
            .field("tabs", &self.tabs.len())
            .field("accordions", &self.accordions.len())
            .field("quiz", &self.quiz.is_some())
            .field("total", &self.total.is_some())
            .finish_non_exhaustive()
    }
}

fn position_of<M: Markup>(roots: &[M], el: &M) -> Option<usize> {
    roots.iter().position(|root| root.is_same(el))
}

fn by_id<M: Markup>(roots: &[M], id: &str) -> Option<usize> {
    roots
        .iter()
        .position(|root| root.attr("id").as_deref() == Some(id))
}

impl Page {
    /// Build every widget under `document`. Selects share one open cooldown.
    pub fn discover<M: Markup>(document: &M, clock: Rc<dyn Clock>, options: &PageOptions) -> Self {
        let ctx = SelectContext::new(
            Rc::clone(&clock),
            Rc::new(OpenCooldown::new(Rc::clone(&clock))),
        );
        let select_roots = document.find_all(&SELECT_ROOT);
        let counter_roots = document.find_all(&COUNTER_ROOT);

        let mut contact_fields = Vec::new();
        let mut channel_links = Vec::new();
        for form in document.find_all(&Query::Tag("form")) {
            let field = ContactField::from_markup(Some(&form));
            if !field.is_active() {
                continue;
            }
            let channel = form
                .find_all(&Query::AttrEq("data-name", CHANNEL_SELECT_NAME))
                .into_iter()
                .find(|el| SELECT_ROOT.matches(el));
            if let Some(index) = channel.and_then(|el| position_of(&select_roots, &el)) {
                channel_links.push((index, contact_fields.len()));
            }
            contact_fields.push(field);
        }

        let total_select = by_id(&select_roots, &options.total_select_id);
        let total_counter = by_id(&counter_roots, &options.total_counter_id);
        let total = document.find(&TOTAL_OUTPUT).map(|out| {
            GeneratorTotal::from_markup(
                total_select.map(|i| &select_roots[i]),
                total_counter.map(|i| &counter_roots[i]),
                Some(&out),
                options.total.clone(),
            )
        });

        let mut modals = ModalRegistry::new(Rc::clone(&clock));
        for id in &options.modals {
            if let Some(el) = document.find(&Query::AttrEq("id", id)) {
                modals.register_markup(&el, options.modal);
            }
        }

        let phone_masks = document
            .find_all(&Query::Tag("input"))
            .into_iter()
            .filter(is_phone_field)
            .map(|input| PhoneMask::from_markup(Some(&input)))
            .collect();

        let mut accordion_roots: Vec<M> = Vec::new();
        for root in document
            .find_all(&Query::Attr("data-accordion"))
            .into_iter()
            .chain(document.find_all(&Query::Class("ad_accordion")))
        {
            if !accordion_roots.iter().any(|seen| seen.is_same(&root)) {
                accordion_roots.push(root);
            }
        }
        let accordions = accordion_roots.iter().map(Accordion::from_markup).collect();

        let quiz = document
            .find(&QUIZ_ROOT)
            .map(|root| Quiz::from_markup(Some(&root), Rc::clone(&clock)));

        let page = Self {
            selects: init_selects(select_roots, &options.select, &ctx),
            counters: init_counters(counter_roots, &options.counter, &clock),
            phone_masks,
            contact_fields,
            tabs: document
                .find_all(&TABS_ROOT)
                .iter()
                .map(Tabs::from_markup)
                .collect(),
            accordions,
            modals,
            quiz,
            total,
            channel_links,
            total_select,
            total_counter,
        };
        tracing::debug!(?page, "page discovered");
        page
    }

    /// Drain every widget's messages, routing changes to listeners first.
    pub fn pump(&mut self) -> Vec<PageMessage> {
        let mut out = Vec::new();
        for (index, select) in self.selects.iter_mut().enumerate() {
            for message in select.take_messages() {
                if let SelectMessage::Emit(SelectEvent::Change(detail)) = &message {
                    for &(_, field) in self.channel_links.iter().filter(|(s, _)| *s == index) {
                        self.contact_fields[field].on_channel_change(detail);
                    }
                    if self.total_select == Some(index) {
                        if let Some(total) = &mut self.total {
                            total.on_select_change(detail);
                        }
                    }
                }
                out.push(PageMessage::Select { index, message });
            }
        }
        for (index, counter) in self.counters.iter_mut().enumerate() {
            for message in counter.take_messages() {
                let CounterMessage::Change { value } = &message;
                if self.total_counter == Some(index) {
                    if let Some(total) = &mut self.total {
                        total.on_counter_change(*value);
                    }
                }
                out.push(PageMessage::Counter { index, message });
            }
        }
        for (index, tabs) in self.tabs.iter_mut().enumerate() {
            out.extend(
                tabs.take_messages()
                    .into_iter()
                    .map(|message| PageMessage::Tabs { index, message }),
            );
        }
        out.extend(self.modals.take_messages().into_iter().map(PageMessage::Modal));
        if let Some(quiz) = &mut self.quiz {
            out.extend(quiz.take_messages().into_iter().map(PageMessage::Quiz));
        }
        out
    }

    /// Advance every timer-driven widget.
    pub fn tick(&mut self) {
        self.selects.iter_mut().for_each(Widget::tick);
        self.counters.iter_mut().for_each(Widget::tick);
        self.modals.tick();
        if let Some(quiz) = &mut self.quiz {
            quiz.tick();
        }
    }

    /// Earliest pending deadline across the page.
    pub fn next_deadline(&self) -> Option<Deadline> {
        self.selects
            .iter()
            .map(Widget::next_deadline)
            .chain(self.counters.iter().map(Widget::next_deadline))
            .chain([self.modals.next_deadline()])
            .chain(self.quiz.iter().map(Widget::next_deadline))
            .flatten()
            .min_by(|a, b| a.at_ms().total_cmp(&b.at_ms()))
    }
}
