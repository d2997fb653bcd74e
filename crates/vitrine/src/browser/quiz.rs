//! DOM binding for [`Quiz`] and its progress bar.

use super::app::document;
use super::dom::DomElement;
use super::listener::{ListenOptions, Listener};
use super::timer::Scheduler;
use crate::page::QUIZ_ROOT;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use vitrine_core::{Clock, Markup, Query, SystemClock, Widget};
use vitrine_widgets::quiz::FORM_STEP;
use vitrine_widgets::{Quiz, QuizForm, QuizMessage, QuizView};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const SUBMIT_EVENT: &str = "quiz:submit";

#[derive(Debug, Clone)]
struct Refs {
    root: DomElement,
    steps: Vec<DomElement>,
    options: Vec<Vec<DomElement>>,
    prev: Option<DomElement>,
    next: Option<DomElement>,
    next_text: Option<DomElement>,
    form: Option<DomElement>,
    progress: Option<DomElement>,
    fill: Option<DomElement>,
    percentage: Option<DomElement>,
}

impl Refs {
    fn new(root: DomElement) -> Self {
        let steps = root.find_all(&Query::Class("quiz_step"));
        let options = steps
            .iter()
            .map(|step| step.find_all(&Query::Class("quiz_option")))
            .collect();
        let next = root.find(&Query::Class("quiz_btn--next"));
        let progress = root.find(&Query::Class("quiz_progress"));
        Self {
            prev: root.find(&Query::Class("quiz_btn--prev")),
            next_text: next
                .as_ref()
                .and_then(|n| n.find(&Query::Class("btn__quiz-text"))),
            next,
            form: root.find(&Query::Class("form")),
            fill: progress
                .as_ref()
                .and_then(|p| p.find(&Query::Class("quiz_progress__fill"))),
            percentage: progress
                .as_ref()
                .and_then(|p| p.find(&Query::Class("quiz_progress__percentage"))),
            progress,
            steps,
            options,
            root,
        }
    }

    fn render(&self, view: &QuizView) {
        for (i, step) in self.steps.iter().enumerate() {
            step.set_class("quiz_step--active", i + 1 == view.step);
        }
        for (options, selected) in self.options.iter().zip(&view.selected) {
            for (i, option) in options.iter().enumerate() {
                option.set_class("quiz_option--selected", *selected == Some(i));
            }
        }
        if let Some(prev) = &self.prev {
            prev.set_flag("disabled", view.prev_disabled);
            prev.set_class("disabled", view.prev_disabled);
        }
        if let Some(next) = &self.next {
            next.set_style("display", if view.next_hidden { "none" } else { "" });
        }
        if let Some(text) = self.next_text.as_ref().filter(|_| !view.next_hidden) {
            text.set_text(view.next_label);
        }
        self.render_summary(view);
        self.render_errors(view);
        if let Some(progress) = &view.progress {
            let percent = format!("{}%", progress.percent);
            if let Some(fill) = &self.fill {
                fill.set_style("width", &percent);
            }
            if let Some(label) = &self.percentage {
                label.set_text(&percent);
            }
            if let Some(container) = &self.progress {
                container.set_class("quiz_progress--completed", progress.completed);
            }
        }
    }

    fn render_summary(&self, view: &QuizView) {
        let Some(step) = self.steps.get(FORM_STEP - 1) else {
            return;
        };
        for entry in &view.summary {
            if let Some(el) = step.find(&Query::AttrEq("data-summary", entry.key)) {
                el.set_text(&entry.label);
            }
            let Some(slot) = step.find(&Query::AttrEq("data-summary-image", entry.key)) else {
                continue;
            };
            if entry.key == "size" {
                if let Some(size) = slot.find(&Query::AttrEq("data-summary-size", "size")) {
                    size.set_text(&entry.label);
                }
            } else if let (Some(img), Some(src)) = (slot.find(&Query::Tag("img")), &entry.img) {
                img.set_attr("src", Some(src));
                img.set_attr("alt", Some(&entry.label));
            }
        }
    }

    fn render_errors(&self, view: &QuizView) {
        let Some(form) = &self.form else {
            return;
        };
        for field in form.find_all(&Query::Attr("required")) {
            let name = field.attr("name").unwrap_or_default();
            field.set_class("error", view.field_errors.contains(&name));
        }
        if let Some(select) = form.find(&Query::AttrEq("data-component", "select")) {
            select.set_class("error", view.select_error);
        }
    }

    fn apply(&self, message: &QuizMessage) {
        let QuizMessage::Submit(submission) = message else {
            return;
        };
        let detail = serde_json::json!({ "formData": submission.to_json() });
        if let Err(err) = self.root.dispatch(SUBMIT_EVENT, Some(&detail)) {
            tracing::warn!(event = SUBMIT_EVENT, ?err, "quiz event not dispatched");
        }
    }

    /// Copy live control values into the quiz form before validation.
    fn sync_form(&self, quiz: &mut Quiz) {
        let (Some(el), Some(form)) = (&self.form, quiz.form_mut()) else {
            return;
        };
        let live = QuizForm::from_markup(el);
        for field in &live.fields {
            form.set_field(&field.name, field.value.clone());
        }
        form.select_value = live.select_value;
    }
}

struct State {
    quiz: Quiz,
    refs: Refs,
    clock: Rc<dyn Clock>,
    timer: Scheduler,
}

/// Run `f` against the quiz, then flush.
fn update(state: &Rc<RefCell<State>>, f: impl FnOnce(&mut Quiz, &Refs)) {
    {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        f(&mut s.quiz, &s.refs);
    }
    flush(state);
}

/// Render, re-arm the progress animation and dispatch `quiz:submit` once
/// the borrow is released.
fn flush(state: &Rc<RefCell<State>>) {
    let (messages, refs) = {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        s.refs.render(&s.quiz.view());
        let weak = Rc::downgrade(state);
        let now = s.clock.now_ms();
        s.timer
            .schedule(s.quiz.next_deadline(), now, move || on_timer(&weak));
        (s.quiz.take_messages(), s.refs.clone())
    };
    for message in &messages {
        refs.apply(message);
    }
}

fn on_timer(weak: &Weak<RefCell<State>>) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    {
        let mut s = state.borrow_mut();
        s.timer.cancel();
        s.quiz.tick();
    }
    flush(&state);
}

/// A [`Quiz`] bound to its root.
#[wasm_bindgen]
pub struct QuizBinding {
    state: Rc<RefCell<State>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for QuizBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizBinding")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl QuizBinding {
    /// Build the quiz from `root`. A root without steps mounts inert.
    pub fn mount(root: web_sys::Element, clock: Rc<dyn Clock>) -> Result<Self, JsValue> {
        let root = DomElement(root);
        let quiz = Quiz::from_markup(Some(&root), Rc::clone(&clock));
        let active = quiz.is_active();
        let state = Rc::new(RefCell::new(State {
            quiz,
            refs: Refs::new(root),
            clock,
            timer: Scheduler::new(),
        }));
        let mut binding = Self {
            state,
            listeners: Vec::new(),
        };
        if active {
            binding.attach()?;
            flush(&binding.state);
        }
        Ok(binding)
    }

    fn listen<F>(
        &mut self,
        target: &DomElement,
        event_type: &'static str,
        mut handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(&Rc<RefCell<State>>, web_sys::Event) + 'static,
    {
        let weak = Rc::downgrade(&self.state);
        self.listeners.push(Listener::new(
            target.element(),
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

    fn attach(&mut self) -> Result<(), JsValue> {
        let refs = self.state.borrow().refs.clone();

        for (i, options) in refs.options.iter().enumerate() {
            for (index, option) in options.iter().enumerate() {
                self.listen(option, "click", move |state, _| {
                    update(state, |quiz, _| quiz.select_option(i + 1, index));
                })?;
            }
        }
        if let Some(prev) = &refs.prev {
            self.listen(prev, "click", |state, _| update(state, |quiz, _| quiz.prev()))?;
        }
        if let Some(next) = &refs.next {
            self.listen(next, "click", |state, _| {
                update(state, |quiz, refs| {
                    refs.sync_form(quiz);
                    quiz.next();
                });
            })?;
        }
        if let Some(form) = &refs.form {
            self.listen(form, "submit", |state, event| {
                event.prevent_default();
                update(state, |quiz, refs| {
                    refs.sync_form(quiz);
                    quiz.submit();
                });
            })?;
        }
        for link in refs.root.find_all(&Query::AttrEq("data-action", "change")) {
            let data_step = link.attr("data-step").unwrap_or_default();
            self.listen(&link, "click", move |state, event| {
                event.prevent_default();
                update(state, |quiz, _| quiz.change_link(&data_step));
            })?;
        }
        Ok(())
    }
}

#[wasm_bindgen]
impl QuizBinding {
    /// Mount on `root` with the wall clock.
    #[wasm_bindgen(constructor)]
    pub fn new(root: web_sys::Element) -> Result<QuizBinding, JsValue> {
        Self::mount(root, Rc::new(SystemClock::new()))
    }

    /// Current step number.
    #[wasm_bindgen(js_name = currentStep)]
    pub fn current_step(&self) -> usize {
        self.state.borrow().quiz.current_step()
    }

    /// Show step `step`.
    #[wasm_bindgen(js_name = setStep)]
    pub fn set_step(&self, step: usize) {
        update(&self.state, |quiz, _| {
            quiz.set_step(step);
        });
    }

    /// Back one step.
    pub fn prev(&self) {
        update(&self.state, |quiz, _| quiz.prev());
    }

    /// Forward one step, submitting on the form step.
    pub fn next(&self) {
        update(&self.state, |quiz, refs| {
            refs.sync_form(quiz);
            quiz.next();
        });
    }

    /// Clear answers and return to step 1.
    pub fn reset(&self) {
        update(&self.state, |quiz, _| quiz.reset());
    }

    /// Remove every listener and stop the progress animation.
    pub fn destroy(&mut self) {
        for listener in &mut self.listeners {
            listener.detach();
        }
        self.listeners.clear();
        self.state.borrow_mut().timer.cancel();
    }
}

/// Mount the first `[data-component="quiz"]` root, if the page has one.
pub fn mount_quiz() -> Result<Option<QuizBinding>, JsValue> {
    document()?
        .query_selector(&QUIZ_ROOT.to_css())?
        .map(|root| QuizBinding::mount(root, Rc::new(SystemClock::new())))
        .transpose()
}
