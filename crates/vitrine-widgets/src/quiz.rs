//! Multi-step quiz: option steps, a contact form step and a success step.
//!
//! Steps are `.quiz_step` elements numbered from 1. Options (`.quiz_option`)
//! on the first steps record one answer per step; step 5 holds the form and
//! step 6 confirms the submission.

use crate::quiz_progress::{QuizProgress, QuizProgressView};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;
use vitrine_core::attrs::parse_leading_int;
use vitrine_core::{
    Clock, Deadline, Event, EventTarget, Handled, Markup, MarkupError, Outbox, Query, Widget,
};

/// Step holding the contact form.
pub const FORM_STEP: usize = 5;

/// Step shown after a successful submission.
pub const SUCCESS_STEP: usize = 6;

/// Next button label on regular steps.
pub const NEXT_LABEL: &str = "ДАЛЕЕ";

/// Next button label on the form step.
pub const SUBMIT_LABEL: &str = "ОТПРАВИТЬ";

const SUMMARY_KEYS: [&str; 4] = ["location", "size", "design", "type"];

/// Summary slot (`[data-summary="..."]`) filled by a step's answer.
#[must_use]
pub fn summary_key(step: usize) -> Option<&'static str> {
    step.checked_sub(1).and_then(|i| SUMMARY_KEYS.get(i)).copied()
}

/// One answer card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Submitted value
    pub value: String,
    /// Human-readable label shown in the summary
    pub label: String,
    /// Card image, shown in the summary only
    pub img: Option<String>,
}

impl QuizOption {
    /// Option whose label is its value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            img: None,
        }
    }

    /// Set the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the image.
    #[must_use]
    pub fn img(mut self, src: impl Into<String>) -> Self {
        self.img = Some(src.into());
        self
    }

    /// Read a `.quiz_option` card: `data-value` (or its text), the label
    /// from `.card_title span` or `.card_size span`, the image from
    /// `.card_img img`.
    pub fn from_markup<M: Markup>(el: &M) -> Self {
        let value = el
            .attr("data-value")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| el.text().trim().to_string());
        let nested = |outer: &str, inner: &str| {
            el.find_all(&Query::Class(outer))
                .iter()
                .find_map(|o| o.find(&Query::Tag(inner)))
        };
        let label = nested("card_title", "span")
            .or_else(|| nested("card_size", "span"))
            .map_or_else(|| value.clone(), |span| span.text().trim().to_string());
        let img = nested("card_img", "img").and_then(|img| img.attr("src"));
        Self { value, label, img }
    }
}

/// A named form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// `name` attribute
    pub name: String,
    /// Current value
    pub value: String,
    /// Value restored by a form reset
    pub default: String,
    /// `required` attribute
    pub required: bool,
    /// `error` class after the last validation
    pub error: bool,
}

impl FormField {
    /// Field holding `value`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            default: value.clone(),
            value,
            required: false,
            error: false,
        }
    }

    /// Mark as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The form on the form step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizForm {
    /// Named controls in document order
    pub fields: Vec<FormField>,
    /// Hidden value of the first custom select, `None` without one
    pub select_value: Option<String>,
    /// `error` class on the custom select
    pub select_error: bool,
}

impl QuizForm {
    /// Read named `input`, `textarea` and `select` controls. Buttons and
    /// unchecked boxes do not submit.
    pub fn from_markup<M: Markup>(form: &M) -> Self {
        let fields = form
            .find_all(&Query::Attr("name"))
            .iter()
            .filter(|el| matches!(el.tag().as_str(), "input" | "textarea" | "select"))
            .filter(|el| {
                let ty = el.attr("type").unwrap_or_default();
                match ty.as_str() {
                    "submit" | "button" | "reset" | "image" | "file" => false,
                    "checkbox" | "radio" => el.has_attr("checked"),
                    _ => true,
                }
            })
            .filter_map(|el| {
                let name = el.attr("name").filter(|n| !n.is_empty())?;
                let value = if el.tag() == "textarea" {
                    el.text()
                } else {
                    el.attr("value").unwrap_or_default()
                };
                let field = FormField::new(name, value);
                Some(if el.has_attr("required") {
                    field.required()
                } else {
                    field
                })
            })
            .collect();
        let select_value = form
            .find(&Query::AttrEq("data-component", "select"))
            .and_then(|s| s.find(&Query::TagAttrEq("input", "type", "hidden")))
            .map(|hidden| hidden.attr("value").unwrap_or_default());
        Self {
            fields,
            select_value,
            select_error: false,
        }
    }

    /// Update a control's value. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value.into();
        }
    }

    /// Required fields must be non-blank and the custom select must carry a
    /// value. Error flags are refreshed on every call.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;
        for field in &mut self.fields {
            field.error = field.required && field.value.trim().is_empty();
            valid &= !field.error;
        }
        self.select_error = self.select_value.as_deref() == Some("");
        valid && !self.select_error
    }

    fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clone_from(&field.default);
        }
    }
}

/// Submitted data: quiz answers first, then form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSubmission {
    /// Entries in submission order; names may repeat
    pub entries: Vec<(String, String)>,
}

impl QuizSubmission {
    /// JSON object of the entries; repeated names collect into arrays.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.entries {
            let value = serde_json::Value::String(value.clone());
            match map.get_mut(key) {
                Some(serde_json::Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = serde_json::Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(key.clone(), value);
                }
            }
        }
        serde_json::Value::Object(map)
    }
}

/// Quiz messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizMessage {
    /// The visible step changed
    StepChanged {
        /// New step number
        step: usize,
    },
    /// `quiz:submit` with the submitted data
    Submit(QuizSubmission),
}

/// Summary entry on the form step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    /// `data-summary` key
    pub key: &'static str,
    /// Answer label
    pub label: String,
    /// Answer image
    pub img: Option<String>,
}

/// Render snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    /// Current step number
    pub step: usize,
    /// Selected option per step
    pub selected: Vec<Option<usize>>,
    /// Prev button disabled
    pub prev_disabled: bool,
    /// Next button hidden
    pub next_hidden: bool,
    /// Next button text
    pub next_label: &'static str,
    /// Summary on the form step
    pub summary: Vec<SummaryEntry>,
    /// Names of fields flagged with `error`
    pub field_errors: Vec<String>,
    /// Custom select flagged with `error`
    pub select_error: bool,
    /// Progress bar
    pub progress: Option<QuizProgressView>,
}

/// Quiz controller.
#[derive(Debug)]
pub struct Quiz {
    inactive: Option<MarkupError>,
    steps: Vec<Vec<QuizOption>>,
    current: usize,
    answers: BTreeMap<usize, QuizOption>,
    selected: Vec<Option<usize>>,
    form: Option<QuizForm>,
    progress: Option<QuizProgress>,
    outbox: Outbox<QuizMessage>,
}

impl Quiz {
    /// Quiz over `steps` (options per step), starting on step 1.
    #[must_use]
    pub fn new(
        steps: Vec<Vec<QuizOption>>,
        form: Option<QuizForm>,
        progress: Option<QuizProgress>,
    ) -> Self {
        let inactive = steps.is_empty().then(|| {
            let err = MarkupError::MissingAnchor {
                widget: "quiz",
                anchor: "quiz_step",
            };
            tracing::warn!(%err, "quiz inactive");
            err
        });
        let mut quiz = Self {
            inactive,
            selected: vec![None; steps.len()],
            steps,
            current: 1,
            answers: BTreeMap::new(),
            form,
            progress,
            outbox: Outbox::new(),
        };
        quiz.set_step(1);
        quiz.outbox = Outbox::new();
        quiz
    }

    /// Build from the quiz root.
    pub fn from_markup<M: Markup>(root: Option<&M>, clock: Rc<dyn Clock>) -> Self {
        let Some(root) = root else {
            tracing::warn!("quiz root not found");
            let mut quiz = Self::new(Vec::new(), None, None);
            quiz.inactive = Some(MarkupError::MissingRoot { widget: "quiz" });
            return quiz;
        };
        let steps = root
            .find_all(&Query::Class("quiz_step"))
            .iter()
            .map(|step| {
                step.find_all(&Query::Class("quiz_option"))
                    .iter()
                    .map(QuizOption::from_markup)
                    .collect()
            })
            .collect();
        let progress = root
            .find(&Query::Class("quiz_progress"))
            .map(|el| QuizProgress::from_markup(Some(&el), clock));
        let form = root.find(&Query::Class("form")).map(|el| QuizForm::from_markup(&el));
        Self::new(steps, form, progress)
    }

    /// Number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Current step number.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current
    }

    /// Recorded answers by step number.
    #[must_use]
    pub const fn answers(&self) -> &BTreeMap<usize, QuizOption> {
        &self.answers
    }

    /// The form, when the quiz has one.
    pub fn form_mut(&mut self) -> Option<&mut QuizForm> {
        self.form.as_mut()
    }

    /// Record option `index` of `step` as that step's answer.
    pub fn select_option(&mut self, step: usize, index: usize) {
        let Some(option) = step
            .checked_sub(1)
            .and_then(|i| self.steps.get(i))
            .and_then(|options| options.get(index))
        else {
            return;
        };
        self.answers.insert(step, option.clone());
        self.selected[step - 1] = Some(index);
        tracing::trace!(step, value = %option.value, "quiz answer");
    }

    /// Show step `step`. Out-of-range steps are ignored.
    pub fn set_step(&mut self, step: usize) -> bool {
        let total = self.total_steps();
        if self.inactive.is_some() || step < 1 || step > total {
            return false;
        }
        self.current = step;
        if let Some(progress) = &mut self.progress {
            let shown = if step == SUCCESS_STEP { total - 1 } else { step };
            progress.update(shown as f64, total.saturating_sub(1) as f64);
        }
        self.outbox.push(QuizMessage::StepChanged { step });
        true
    }

    /// Back one step, never below step 1.
    pub fn prev(&mut self) {
        if self.current > 1 {
            self.set_step(self.current - 1);
        }
    }

    /// Forward one step. Option steps need an answer first; the form step
    /// submits instead.
    pub fn next(&mut self) {
        if self.current < FORM_STEP && !self.answers.contains_key(&self.current) {
            return;
        }
        if self.current == FORM_STEP {
            if self.form.is_some() {
                self.submit();
            }
            return;
        }
        if self.current < self.total_steps() {
            self.set_step(self.current + 1);
        }
    }

    /// `[data-action="change"]` link carrying `data-step`.
    pub fn change_link(&mut self, data_step: &str) {
        if let Some(step) = parse_leading_int(data_step)
            .filter(|&n| n != 0)
            .and_then(|n| usize::try_from(n).ok())
        {
            self.set_step(step);
        }
    }

    /// Validate and submit. On success moves to the success step and emits
    /// `quiz:submit`.
    pub fn submit(&mut self) -> bool {
        if self.inactive.is_some() {
            return false;
        }
        if let Some(form) = &mut self.form {
            if !form.validate() {
                tracing::debug!("quiz form invalid");
                return false;
            }
        }
        let mut entries = Vec::new();
        for (step, answer) in &self.answers {
            entries.push((format!("quiz_step_{step}_value"), answer.value.clone()));
            entries.push((format!("quiz_step_{step}_label"), answer.label.clone()));
        }
        if let Some(form) = &self.form {
            entries.extend(form.fields.iter().map(|f| (f.name.clone(), f.value.clone())));
        }
        self.set_step(SUCCESS_STEP);
        tracing::debug!(entries = entries.len(), "quiz submitted");
        self.outbox
            .push(QuizMessage::Submit(QuizSubmission { entries }));
        true
    }

    /// Clear answers and the form, back to step 1.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.selected.iter_mut().for_each(|s| *s = None);
        if let Some(form) = &mut self.form {
            form.reset();
        }
        self.current = 1;
        self.set_step(1);
    }

    fn summary(&self) -> Vec<SummaryEntry> {
        if self.total_steps() < FORM_STEP {
            return Vec::new();
        }
        self.answers
            .iter()
            .filter_map(|(&step, answer)| {
                Some(SummaryEntry {
                    key: summary_key(step)?,
                    label: answer.label.clone(),
                    img: answer.img.clone(),
                })
            })
            .collect()
    }
}

impl Widget for Quiz {
    type View = QuizView;
    type Message = QuizMessage;

    fn kind(&self) -> &'static str {
        "quiz"
    }

    fn is_active(&self) -> bool {
        self.inactive.is_none()
    }

    fn event(&mut self, event: &Event) -> Handled {
        if self.inactive.is_some() {
            return Handled::No;
        }
        match event {
            Event::Click {
                target: EventTarget::Item(index),
            } => {
                self.select_option(self.current, *index);
                Handled::No
            }
            Event::Click {
                target: EventTarget::Decrement,
            } => {
                self.prev();
                Handled::No
            }
            Event::Click {
                target: EventTarget::Increment,
            } => {
                self.next();
                Handled::No
            }
            _ => Handled::No,
        }
    }

    fn tick(&mut self) {
        if let Some(progress) = &mut self.progress {
            progress.tick();
        }
    }

    fn next_deadline(&self) -> Option<Deadline> {
        self.progress.as_ref().and_then(Widget::next_deadline)
    }

    fn view(&self) -> QuizView {
        let (field_errors, select_error) = self.form.as_ref().map_or_else(
            || (Vec::new(), false),
            |form| {
                let errors = form
                    .fields
                    .iter()
                    .filter(|f| f.error)
                    .map(|f| f.name.clone())
                    .collect();
                (errors, form.select_error)
            },
        );
        QuizView {
            step: self.current,
            selected: self.selected.clone(),
            prev_disabled: self.current == 1,
            next_hidden: self.current == self.total_steps(),
            next_label: if self.current == FORM_STEP {
                SUBMIT_LABEL
            } else {
                NEXT_LABEL
            },
            summary: self.summary(),
            field_errors,
            select_error,
            progress: self.progress.as_ref().map(Widget::view),
        }
    }

    fn take_messages(&mut self) -> Vec<QuizMessage> {
        self.outbox.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{Element, ManualClock};

    fn steps() -> Vec<Vec<QuizOption>> {
        vec![
            vec![QuizOption::new("home").label("Дом"), QuizOption::new("office")],
            vec![QuizOption::new("s"), QuizOption::new("m")],
            vec![QuizOption::new("loft").img("/loft.jpg")],
            vec![QuizOption::new("turnkey")],
            Vec::new(),
            Vec::new(),
        ]
    }

    fn form() -> QuizForm {
        QuizForm {
            fields: vec![
                FormField::new("name", "").required(),
                FormField::new("contact-value", "+7 (999) 123-45-67"),
            ],
            select_value: Some("phone".into()),
            select_error: false,
        }
    }

    fn quiz() -> (Rc<ManualClock>, Quiz) {
        let clock = ManualClock::shared();
        let quiz = Quiz::new(steps(), Some(form()), Some(QuizProgress::new(clock.clone())));
        (clock, quiz)
    }

    fn answer_all(quiz: &mut Quiz) {
        for step in 1..FORM_STEP {
            quiz.select_option(step, 0);
            quiz.next();
        }
    }

    // =========================================================================
    // Navigation Tests - TESTS FIRST
    // =========================================================================

    #[test]
    fn test_starts_on_step_one() {
        let (_, quiz) = quiz();
        let view = quiz.view();
        assert_eq!(view.step, 1);
        assert!(view.prev_disabled);
        assert!(!view.next_hidden);
        assert_eq!(view.next_label, NEXT_LABEL);
    }

    #[test]
    fn test_next_requires_answer() {
        let (_, mut quiz) = quiz();
        quiz.next();
        assert_eq!(quiz.current_step(), 1);
        quiz.select_option(1, 1);
        quiz.next();
        assert_eq!(quiz.current_step(), 2);
        quiz.prev();
        quiz.prev();
        assert_eq!(quiz.current_step(), 1);
    }

    #[test]
    fn test_form_step_label_and_summary() {
        let (_, mut quiz) = quiz();
        answer_all(&mut quiz);
        assert_eq!(quiz.current_step(), FORM_STEP);
        let view = quiz.view();
        assert_eq!(view.next_label, SUBMIT_LABEL);
        let keys: Vec<_> = view.summary.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["location", "size", "design", "type"]);
        assert_eq!(view.summary[0].label, "Дом");
        assert_eq!(view.summary[2].img.as_deref(), Some("/loft.jpg"));
    }

    #[test]
    fn test_set_step_bounds() {
        let (_, mut quiz) = quiz();
        assert!(!quiz.set_step(0));
        assert!(!quiz.set_step(7));
        assert!(quiz.set_step(3));
        quiz.change_link("abc");
        quiz.change_link("0");
        assert_eq!(quiz.current_step(), 3);
        quiz.change_link("2");
        assert_eq!(quiz.current_step(), 2);
    }

    #[test]
    fn test_option_clicks_on_current_step() {
        let (_, mut quiz) = quiz();
        quiz.event(&Event::Click {
            target: EventTarget::Item(1),
        });
        quiz.event(&Event::Click {
            target: EventTarget::Item(0),
        });
        assert_eq!(quiz.answers()[&1].value, "home");
        assert_eq!(quiz.view().selected[0], Some(0));
        quiz.event(&Event::Click {
            target: EventTarget::Item(9),
        });
        assert_eq!(quiz.view().selected[0], Some(0));
        quiz.event(&Event::Click {
            target: EventTarget::Increment,
        });
        assert_eq!(quiz.current_step(), 2);
    }

    // =========================================================================
    // Submit Tests
    // =========================================================================

    #[test]
    fn test_submit_validates_required() {
        let (_, mut quiz) = quiz();
        answer_all(&mut quiz);
        quiz.take_messages();
        quiz.next();
        assert_eq!(quiz.current_step(), FORM_STEP);
        assert_eq!(quiz.view().field_errors, vec!["name".to_string()]);
        assert!(quiz.take_messages().is_empty());
    }

    #[test]
    fn test_submit_rejects_empty_select() {
        let (_, mut quiz) = quiz();
        answer_all(&mut quiz);
        let form = quiz.form_mut().unwrap();
        form.set_field("name", "Иван");
        form.select_value = Some(String::new());
        assert!(!quiz.submit());
        assert!(quiz.view().select_error);
    }

    #[test]
    fn test_submit_builds_form_data() {
        let (_, mut quiz) = quiz();
        answer_all(&mut quiz);
        quiz.form_mut().unwrap().set_field("name", "Иван");
        quiz.take_messages();
        quiz.next();
        assert_eq!(quiz.current_step(), SUCCESS_STEP);
        let view = quiz.view();
        assert!(view.next_hidden);
        assert!(view.field_errors.is_empty());

        let messages = quiz.take_messages();
        assert_eq!(
            messages[0],
            QuizMessage::StepChanged { step: SUCCESS_STEP }
        );
        let QuizMessage::Submit(submission) = &messages[1] else {
            panic!("expected submit, got {messages:?}");
        };
        let keys: Vec<_> = submission.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "quiz_step_1_value",
                "quiz_step_1_label",
                "quiz_step_2_value",
                "quiz_step_2_label",
                "quiz_step_3_value",
                "quiz_step_3_label",
                "quiz_step_4_value",
                "quiz_step_4_label",
                "name",
                "contact-value",
            ]
        );
        assert_eq!(submission.to_json()["quiz_step_1_label"], "Дом");
    }

    #[test]
    fn test_submission_json_groups_repeats() {
        let submission = QuizSubmission {
            entries: vec![
                ("a".into(), "1".into()),
                ("b".into(), "2".into()),
                ("a".into(), "3".into()),
                ("a".into(), "4".into()),
            ],
        };
        assert_eq!(
            submission.to_json(),
            serde_json::json!({ "a": ["1", "3", "4"], "b": "2" })
        );
    }

    #[test]
    fn test_reset() {
        let (_, mut quiz) = quiz();
        answer_all(&mut quiz);
        quiz.form_mut().unwrap().set_field("name", "Иван");
        quiz.reset();
        assert_eq!(quiz.current_step(), 1);
        assert!(quiz.answers().is_empty());
        assert_eq!(quiz.view().selected, vec![None; 6]);
        assert_eq!(quiz.form_mut().unwrap().fields[0].value, "");
    }

    // =========================================================================
    // Progress Tests
    // =========================================================================

    #[test]
    fn test_progress_percentages() {
        let (clock, mut quiz) = quiz();
        clock.advance(500.0);
        quiz.tick();
        assert_eq!(quiz.view().progress.unwrap().percent, 20);

        answer_all(&mut quiz);
        clock.advance(500.0);
        quiz.tick();
        let progress = quiz.view().progress.unwrap();
        assert_eq!(progress.percent, 100);
        assert!(progress.completed);

        quiz.set_step(SUCCESS_STEP);
        clock.advance(500.0);
        quiz.tick();
        assert_eq!(quiz.view().progress.unwrap().percent, 100);
    }

    // =========================================================================
    // Markup Tests
    // =========================================================================

    #[test]
    fn test_option_from_markup() {
        let card = Element::new("div")
            .class("quiz_option")
            .attr("data-value", "flat")
            .child(Element::new("div").class("card_img").child(Element::new("img").attr("src", "/f.png")))
            .child(Element::new("div").class("card_title").child(Element::new("span").text(" Квартира ")));
        let option = QuizOption::from_markup(&&card);
        assert_eq!(option.value, "flat");
        assert_eq!(option.label, "Квартира");
        assert_eq!(option.img.as_deref(), Some("/f.png"));

        let plain = Element::new("div").class("quiz_option").text(" 50 м² ");
        let option = QuizOption::from_markup(&&plain);
        assert_eq!(option.value, "50 м²");
        assert_eq!(option.label, "50 м²");
        assert!(option.img.is_none());
    }

    #[test]
    fn test_form_from_markup() {
        let el = Element::new("form")
            .class("form")
            .child(Element::new("input").attr("name", "name").attr("required", ""))
            .child(Element::new("input").attr("type", "checkbox").attr("name", "agree"))
            .child(Element::new("button").attr("name", "go"))
            .child(
                Element::new("div")
                    .attr("data-component", "select")
                    .child(Element::new("input").attr("type", "hidden").attr("name", "channel")),
            )
            .child(Element::new("textarea").attr("name", "comment").text("hi"));
        let form = QuizForm::from_markup(&&el);
        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "channel", "comment"]);
        assert!(form.fields[0].required);
        assert_eq!(form.fields[2].value, "hi");
        assert_eq!(form.select_value.as_deref(), Some(""));
    }

    #[test]
    fn test_quiz_from_markup() {
        let clock: Rc<dyn Clock> = ManualClock::shared();
        let el = Element::new("div")
            .child(
                Element::new("div")
                    .class("quiz_progress")
                    .child(Element::new("div").class("quiz_progress__fill"))
                    .child(Element::new("span").class("quiz_progress__percentage")),
            )
            .child(
                Element::new("div")
                    .class("quiz_step")
                    .child(Element::new("div").class("quiz_option").attr("data-value", "a")),
            )
            .child(Element::new("div").class("quiz_step"));
        let quiz = Quiz::from_markup(Some(&&el), clock);
        assert!(quiz.is_active());
        assert_eq!(quiz.total_steps(), 2);
        assert!(quiz.view().progress.is_some());
    }

    #[test]
    fn test_without_steps_inactive() {
        let clock: Rc<dyn Clock> = ManualClock::shared();
        let el = Element::new("div");
        let mut quiz = Quiz::from_markup(Some(&&el), clock);
        assert!(!quiz.is_active());
        assert!(!quiz.submit());
    }
}
