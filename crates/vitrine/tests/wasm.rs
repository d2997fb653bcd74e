//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use std::cell::Cell;
use std::rc::Rc;
use vitrine::browser::{DomElement, ListenOptions, Listener};
use vitrine::{
    AccordionBinding, ContactFieldBinding, CounterBinding, ManualClock, Markup, ModalBinding,
    ModalConfig, PhoneMaskBinding, Query, QuizBinding, SelectBinding, TabsBinding,
};
use wasm_bindgen::JsCast;

fn mount_html(html: &str) -> web_sys::Element {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .expect("document");
    let container = document.create_element("div").expect("create div");
    container.set_inner_html(html);
    document
        .body()
        .expect("body")
        .append_child(&container)
        .expect("append");
    container
        .first_element_child()
        .expect("fixture root")
}

fn click(el: &web_sys::Element) {
    el.dyn_ref::<web_sys::HtmlElement>()
        .expect("html element")
        .click();
}

fn count_events(target: &web_sys::Element, event_type: &'static str) -> (Rc<Cell<u32>>, Listener) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let listener = Listener::new(target, event_type, ListenOptions::BUBBLE, move |_| {
        seen.set(seen.get() + 1);
    })
    .expect("listen");
    (count, listener)
}

const SELECT_HTML: &str = r#"
<div data-component="select" data-placeholder="Выберите">
  <button type="button" data-ref="toggle"></button>
  <span data-ref="value"></span>
  <input type="hidden" data-ref="input" name="fuel">
  <div data-ref="dropdown">
    <ul data-ref="list">
      <li class="c-select__option" data-value="petrol">Бензин</li>
      <li class="c-select__option" data-value="diesel">Дизель</li>
    </ul>
  </div>
</div>
"#;

// ============================================================================
// DomElement Markup Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_dom_element_reads_markup() {
    let root = DomElement(mount_html(SELECT_HTML));
    assert_eq!(root.tag(), "div");
    assert_eq!(root.attr("data-component").as_deref(), Some("select"));

    let options = root.find_all(&Query::Class("c-select__option"));
    assert_eq!(options.len(), 2);
    assert_eq!(options[1].attr("data-value").as_deref(), Some("diesel"));
    assert_eq!(options[0].text(), "Бензин");
}

#[wasm_bindgen_test]
fn test_dom_element_identity() {
    let root = DomElement(mount_html(SELECT_HTML));
    let a = root.find_ref("list").expect("list");
    let b = root.find(&Query::AttrEq("data-ref", "list")).expect("list");
    let toggle = root.find_ref("toggle").expect("toggle");
    assert!(a.is_same(&b));
    assert!(!a.is_same(&toggle));
}

#[wasm_bindgen_test]
fn test_dom_element_live_input_value() {
    let input = DomElement(mount_html(r#"<input type="text" value="a">"#));
    input.set_value("typed");
    assert_eq!(input.attr("value").as_deref(), Some("typed"));
}

// ============================================================================
// Listener Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_listener_detach_stops_delivery() {
    let el = mount_html("<div></div>");
    let (count, mut listener) = count_events(&el, "ping");
    let dom = DomElement(el);

    dom.dispatch::<()>("ping", None).expect("dispatch");
    assert_eq!(count.get(), 1);

    listener.detach();
    assert!(!listener.is_attached());
    dom.dispatch::<()>("ping", None).expect("dispatch");
    assert_eq!(count.get(), 1);
}

// ============================================================================
// SelectBinding Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_select_binding_open_close() {
    let root = mount_html(SELECT_HTML);
    let (opened, _listener) = count_events(&root, "select:open");
    let select = SelectBinding::new(root.clone()).expect("mount");

    select.open();
    assert!(root.class_list().contains("is-open"));
    assert_eq!(opened.get(), 1);

    select.close();
    assert!(!root.class_list().contains("is-open"));
}

#[wasm_bindgen_test]
fn test_select_binding_set_value_renders_and_emits() {
    let root = mount_html(SELECT_HTML);
    let (changed, _listener) = count_events(&root, "select:change");
    let select = SelectBinding::new(root.clone()).expect("mount");

    select.set_value("diesel".into(), false);
    assert_eq!(changed.get(), 1);
    assert_eq!(select.value().expect("value").as_string().as_deref(), Some("diesel"));

    let dom = DomElement(root);
    let label = dom.find_ref("value").expect("value");
    assert_eq!(label.text(), "Дизель");
    let input = dom.find_ref("input").expect("input");
    assert_eq!(input.attr("value").as_deref(), Some("diesel"));

    select.set_value("petrol".into(), true);
    assert_eq!(changed.get(), 1);
}

#[wasm_bindgen_test]
fn test_select_binding_disable() {
    let root = mount_html(SELECT_HTML);
    let select = SelectBinding::new(root.clone()).expect("mount");
    select.disable();
    assert!(select.is_disabled());
    assert!(root.class_list().contains("is-disabled"));
    select.open();
    assert!(!root.class_list().contains("is-open"));
}

#[wasm_bindgen_test]
fn test_select_binding_destroy_while_open() {
    let root = mount_html(SELECT_HTML);
    let (closed, _listener) = count_events(&root, "select:close");
    let mut select = SelectBinding::new(root.clone()).expect("mount");
    select.open();
    assert!(root.class_list().contains("is-open"));

    select.destroy();
    assert!(!root.class_list().contains("is-open"));
    assert_eq!(closed.get(), 1);
    let dropdown = DomElement(root.clone()).find_ref("dropdown").expect("dropdown");
    assert!(dropdown.has_attr("hidden"));

    select.open();
    select.destroy();
    assert!(!root.class_list().contains("is-open"));
    assert_eq!(closed.get(), 1);
}

#[wasm_bindgen_test]
fn test_select_binding_select_and_deselect() {
    let html = SELECT_HTML.replacen(
        "data-component=\"select\"",
        "data-component=\"select\" data-multiple=\"\"",
        1,
    );
    let root = mount_html(&html);
    let (changed, _listener) = count_events(&root, "select:change");
    let select = SelectBinding::new(root.clone()).expect("mount");
    let input = DomElement(root).find_ref("input").expect("input");

    select.select("petrol", false);
    select.select("diesel", true);
    assert_eq!(input.attr("value").as_deref(), Some("petrol,diesel"));
    assert_eq!(changed.get(), 1);

    select.deselect("petrol", false);
    assert_eq!(input.attr("value").as_deref(), Some("diesel"));
    assert_eq!(changed.get(), 2);
}

#[wasm_bindgen_test]
fn test_select_binding_incomplete_markup_is_inert() {
    let root = mount_html(r#"<div data-component="select"><button data-ref="toggle"></button></div>"#);
    let select = SelectBinding::new(root.clone()).expect("mount");
    select.open();
    assert!(!root.class_list().contains("is-open"));
}

// ============================================================================
// PhoneMaskBinding Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_phone_mask_formats_initial_value() {
    let input = mount_html(r#"<input type="text" name="phone" value="9001234567">"#);
    let mask = PhoneMaskBinding::new(input.clone()).expect("mount");

    assert_eq!(input.get_attribute("type").as_deref(), Some("tel"));
    assert_eq!(input.get_attribute("inputmode").as_deref(), Some("numeric"));
    assert_eq!(mask.formatted_value(), "+7 (900) 123-45-67");
    assert_eq!(mask.clean_value(), "79001234567");
    assert!(mask.is_valid());
}

#[wasm_bindgen_test]
fn test_phone_mask_requires_input() {
    let el = mount_html("<div></div>");
    let mask = PhoneMaskBinding::new(el).expect("mount");
    assert!(!mask.is_valid());
}

// ============================================================================
// CounterBinding Tests
// ============================================================================

const COUNTER_HTML: &str = r#"
<div data-component="counter" data-min="1" data-max="3">
  <button type="button" class="counter__btn--minus"></button>
  <span data-ref="value">1</span>
  <button type="button" class="counter__btn--plus"></button>
  <input type="hidden" data-ref="hidden" value="1">
</div>
"#;

#[wasm_bindgen_test]
fn test_counter_binding_steps_and_renders() {
    let root = mount_html(COUNTER_HTML);
    let (changed, _listener) = count_events(&root, "counter:change");
    let counter = CounterBinding::new(root.clone()).expect("mount");
    let dom = DomElement(root);
    let minus = dom.find(&Query::Class("counter__btn--minus")).expect("minus");

    assert!(minus.has_attr("disabled"));
    counter.inc();
    counter.inc();
    counter.inc();
    assert_eq!(counter.get(), 3.0);
    assert_eq!(changed.get(), 2);
    assert_eq!(dom.find_ref("value").expect("span").text(), "3");
    assert_eq!(dom.find_ref("hidden").expect("hidden").attr("value").as_deref(), Some("3"));
    assert!(!minus.has_attr("disabled"));
}

#[wasm_bindgen_test]
fn test_counter_binding_destroy_ignores_updates() {
    let root = mount_html(COUNTER_HTML);
    let mut counter = CounterBinding::new(root).expect("mount");
    counter.destroy();
    counter.inc();
    assert_eq!(counter.get(), 1.0);
}

// ============================================================================
// ContactFieldBinding Tests
// ============================================================================

const CONTACT_FORM_HTML: &str = r#"
<form>
  <div data-component="select" data-name="contact-channel">
    <button type="button" data-ref="toggle"></button>
    <span data-ref="value"></span>
    <input type="hidden" data-ref="input" name="contact-channel">
    <div data-ref="dropdown">
      <ul data-ref="list">
        <li class="c-select__option" data-value="phone">Телефон</li>
        <li class="c-select__option" data-value="email">Email</li>
      </ul>
    </div>
  </div>
  <input type="text" name="contact-value" data-quiz-contact-field>
</form>
"#;

#[wasm_bindgen_test]
fn test_contact_field_follows_channel_select() {
    let form = mount_html(CONTACT_FORM_HTML);
    let dom = DomElement(form.clone());
    let select_root = dom
        .find(&Query::AttrEq("data-name", "contact-channel"))
        .expect("select");
    let select = SelectBinding::new(select_root.element().clone()).expect("mount select");
    let contact = ContactFieldBinding::new(form).expect("mount contact");
    let input = dom
        .find(&Query::AttrEq("name", "contact-value"))
        .expect("input");
    assert!(!contact.is_masked());

    select.set_value("phone".into(), false);
    assert!(contact.is_masked());
    assert_eq!(input.attr("type").as_deref(), Some("tel"));
    assert_eq!(input.attr("inputmode").as_deref(), Some("numeric"));
    assert_eq!(input.attr("placeholder").as_deref(), Some("Номер телефона"));

    input.set_value("9001234567");
    input.dispatch::<()>("input", None).expect("dispatch");
    assert_eq!(contact.value(), "+7 (900) 123-45-67");

    select.set_value("email".into(), false);
    assert!(!contact.is_masked());
    assert_eq!(input.attr("type").as_deref(), Some("email"));
    assert!(!input.has_attr("inputmode"));
    assert_eq!(input.attr("placeholder").as_deref(), Some("Email адрес"));
    assert_eq!(input.attr("value").as_deref(), Some(""));

    // The detached mask leaves typed text alone.
    input.set_value("me@example.com");
    input.dispatch::<()>("input", None).expect("dispatch");
    assert_eq!(input.attr("value").as_deref(), Some("me@example.com"));
    assert_eq!(contact.value(), "me@example.com");
}

#[wasm_bindgen_test]
fn test_contact_field_without_anchors_is_inert() {
    let form = mount_html(r#"<form><input name="contact-value"></form>"#);
    let contact = ContactFieldBinding::new(form).expect("mount");
    assert!(!contact.is_masked());
    assert_eq!(contact.value(), "");
}

// ============================================================================
// TabsBinding Tests
// ============================================================================

const TABS_HTML: &str = r#"
<div data-component="tabs">
  <button data-tab-button data-tab-index="0" data-tab-active="true"></button>
  <button data-tab-button data-tab-index="1" data-tab-inactive-variant="third"></button>
  <div data-tab-content data-tab-active="true"></div>
  <div data-tab-content></div>
</div>
"#;

#[wasm_bindgen_test]
fn test_tabs_binding_click_switches_panel() {
    let root = mount_html(TABS_HTML);
    let (changed, _listener) = count_events(&root, "tabs:change");
    let tabs = TabsBinding::new(root.clone()).expect("mount");
    let dom = DomElement(root);
    let buttons = dom.find_all(&Query::Attr("data-tab-button"));
    let panels = dom.find_all(&Query::Attr("data-tab-content"));

    click(buttons[1].element());
    assert_eq!(tabs.active_panel(), Some(1));
    assert_eq!(changed.get(), 1);
    assert_eq!(buttons[1].attr("data-tab-active").as_deref(), Some("true"));
    assert!(buttons[1].has_class("button--secondary"));
    assert!(!buttons[0].has_attr("data-tab-active"));
    assert!(buttons[0].has_class("button--primary"));
    assert!(panels[1].has_class("tabs_item--active"));
    assert!(!panels[0].has_class("tabs_item--active"));

    tabs.activate(0);
    assert!(buttons[1].has_class("button--third"));
    assert!(!buttons[1].has_class("button--secondary"));
}

// ============================================================================
// AccordionBinding Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_accordion_binding_toggles_open() {
    let root = mount_html(
        r#"<div data-accordion><button data-accordion-trigger class="ad_accordion_toggle"></button></div>"#,
    );
    let accordion = AccordionBinding::new(root.clone()).expect("mount");
    let trigger = root.first_element_child().expect("trigger");

    click(&trigger);
    assert!(accordion.is_open());
    assert!(root.class_list().contains("open"));
    click(&trigger);
    assert!(!root.class_list().contains("open"));
}

// ============================================================================
// ModalBinding Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_modal_binding_open_and_close_button() {
    let modal = mount_html(
        r#"<div id="test-modal" style="display: none"><button data-close></button></div>"#,
    );
    let (opened, _open) = count_events(&modal, "modal:open");
    let (closed, _close) = count_events(&modal, "modal:close");
    let mut binding = ModalBinding::mount(ManualClock::shared()).expect("mount");
    assert!(binding
        .register_element(modal.clone(), ModalConfig::default())
        .expect("register"));
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .expect("body");

    binding.open("test-modal");
    assert!(binding.is_open("test-modal"));
    assert_eq!(opened.get(), 1);
    assert!(modal.class_list().contains("open"));
    assert_eq!(modal.get_attribute("aria-hidden").as_deref(), Some("false"));
    assert_eq!(body.style().get_property_value("overflow").ok().as_deref(), Some("hidden"));

    click(&modal.first_element_child().expect("close button"));
    assert!(!binding.is_open("test-modal"));
    assert_eq!(closed.get(), 1);
    assert!(!modal.class_list().contains("open"));
    assert_eq!(body.style().get_property_value("overflow").ok().as_deref(), Some(""));
    binding.destroy();
}

// ============================================================================
// QuizBinding Tests
// ============================================================================

const QUIZ_HTML: &str = r#"
<div data-component="quiz">
  <div class="quiz_step">
    <div class="quiz_option" data-value="home">Дом</div>
    <div class="quiz_option" data-value="office">Офис</div>
  </div>
  <div class="quiz_step">
    <div class="quiz_option" data-value="s">S</div>
  </div>
  <button class="quiz_btn--prev"></button>
  <button class="quiz_btn--next"><span class="btn__quiz-text"></span></button>
</div>
"#;

#[wasm_bindgen_test]
fn test_quiz_binding_needs_answer_to_advance() {
    let root = mount_html(QUIZ_HTML);
    let quiz = QuizBinding::mount(root.clone(), ManualClock::shared()).expect("mount");
    let dom = DomElement(root);
    let steps = dom.find_all(&Query::Class("quiz_step"));
    let prev = dom.find(&Query::Class("quiz_btn--prev")).expect("prev");
    let next = dom.find(&Query::Class("quiz_btn--next")).expect("next");
    assert!(steps[0].has_class("quiz_step--active"));
    assert!(prev.has_attr("disabled"));
    assert_eq!(dom.find(&Query::Class("btn__quiz-text")).expect("label").text(), "ДАЛЕЕ");

    click(next.element());
    assert_eq!(quiz.current_step(), 1);

    let option = dom.find_all(&Query::Class("quiz_option"))[1].clone();
    click(option.element());
    assert!(option.has_class("quiz_option--selected"));
    click(next.element());
    assert_eq!(quiz.current_step(), 2);
    assert!(steps[1].has_class("quiz_step--active"));
    assert!(!steps[0].has_class("quiz_step--active"));
    assert!(!prev.has_attr("disabled"));
}
