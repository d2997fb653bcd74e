//! Integration tests for vitrine-widgets.
//!
//! These wire widgets together the way a page does: select and counter
//! changes feed the summary line and the contact field, selects share one
//! open cooldown, and every timer runs on a manual clock.

use std::rc::Rc;
use vitrine_core::{
    Clock, Element, Event, EventTarget, ManualClock, OpenCooldown, Point, Silent, Widget,
};
use vitrine_widgets::{
    ContactChannel, ContactField, Counter, CounterConfig, CounterMessage, GeneratorTotal,
    ModalConfig, ModalRegistry, Select, SelectConfig, SelectContext, SelectEvent, SelectMessage,
    SelectOption, TotalConfig,
};

fn changes(select: &mut Select) -> Vec<SelectEvent> {
    select
        .take_messages()
        .into_iter()
        .filter_map(|m| match m {
            SelectMessage::Emit(e @ SelectEvent::Change(_)) => Some(e),
            _ => None,
        })
        .collect()
}

fn fuel_select(ctx: SelectContext) -> Select {
    Select::new(
        vec![
            SelectOption::new("petrol", "Бензин").selected(true),
            SelectOption::new("diesel", "Дизель"),
            SelectOption::new("gas", "Газ"),
        ],
        SelectConfig::default(),
        ctx,
    )
}

// =============================================================================
// Generator Summary Tests
// =============================================================================

#[test]
fn test_select_and_counter_drive_summary() {
    let clock = ManualClock::shared();
    let mut select = fuel_select(SelectContext::isolated(clock.clone()));
    let mut counter = Counter::new(
        2.0,
        CounterConfig {
            min: 1.0,
            max: 5.0,
            ..CounterConfig::default()
        },
        clock,
    );
    let mut total = GeneratorTotal::new(
        Some(counter.get()),
        select.selected_labels().join(", "),
        TotalConfig::default(),
    );
    assert_eq!(total.view(), "2 – БЕНЗИН");

    select.select("diesel", Silent::NO);
    for event in changes(&mut select) {
        if let Some(detail) = event.detail() {
            total.on_select_change(detail);
        }
    }
    counter.inc();
    for CounterMessage::Change { value } in counter.take_messages() {
        total.on_counter_change(value);
    }
    assert_eq!(total.view(), "3 – ДИЗЕЛЬ");
}

#[test]
fn test_summary_from_page_markup() {
    let select = Element::new("div")
        .attr("data-component", "select")
        .child(Element::new("span").data_ref("value").text("Газ"));
    let counter = Element::new("div")
        .child(Element::new("button").class("counter__btn--minus"))
        .child(Element::new("input").data_ref("value-input").attr("value", "4"))
        .child(Element::new("button").class("counter__btn--plus"));
    let out = Element::new("span").class("generator-form__total-count");
    let total = GeneratorTotal::from_markup(
        Some(&&select),
        Some(&&counter),
        Some(&&out),
        TotalConfig::default(),
    );
    assert_eq!(total.view(), "4 – ГАЗ");
}

// =============================================================================
// Contact Field Tests
// =============================================================================

#[test]
fn test_channel_select_switches_contact_field() {
    let clock = ManualClock::shared();
    let mut channel = Select::new(
        vec![
            SelectOption::new("phone", "Телефон"),
            SelectOption::new("email", "Email"),
        ],
        SelectConfig {
            name: "contact-channel".into(),
            ..SelectConfig::default()
        },
        SelectContext::isolated(clock),
    );
    let mut field = ContactField::new(ContactChannel::Other);

    channel.select("phone", Silent::NO);
    for event in changes(&mut channel) {
        field.on_channel_change(event.detail().expect("change detail"));
    }
    assert!(field.is_masked());
    field.event(&Event::TextInput {
        value: "89991234567".into(),
        caret: 11,
    });
    assert_eq!(field.value(), "+7 (999) 123-45-67");

    channel.select("email", Silent::NO);
    for event in changes(&mut channel) {
        field.on_channel_change(event.detail().expect("change detail"));
    }
    assert_eq!(field.channel(), ContactChannel::Email);
    assert_eq!(field.value(), "");
    assert_eq!(field.view().input_type, "email");
}

// =============================================================================
// Cooldown Tests
// =============================================================================

#[test]
fn test_tap_in_one_select_blocks_opening_another() {
    let clock = ManualClock::shared();
    let cooldown = Rc::new(OpenCooldown::new(clock.clone()));
    let ctx = SelectContext::new(clock.clone(), cooldown);
    let mut first = fuel_select(ctx.clone());
    let mut second = fuel_select(ctx);

    first.open();
    let at = Point::new(20.0, 40.0);
    first.event(&Event::PointerDown {
        position: at,
        target: EventTarget::Item(2),
    });
    first.event(&Event::PointerUp {
        position: at,
        target: EventTarget::Item(2),
    });
    assert_eq!(first.value().first(), Some("gas"));

    second.open();
    assert!(!second.is_open());
    clock.advance(100.0);
    second.open();
    assert!(second.is_open());
}

// =============================================================================
// Timer Tests
// =============================================================================

#[test]
fn test_widgets_report_their_next_deadline() {
    let clock = ManualClock::shared();
    let mut select = fuel_select(SelectContext::isolated(clock.clone()));
    let mut modals = ModalRegistry::new(clock.clone());
    modals.register("callback", ModalConfig::default());

    select.open();
    select.close();
    modals.open("callback");
    modals.close("callback");

    let select_due = select.next_deadline().expect("hide fallback");
    let modal_due = modals.next_deadline().expect("modal hide");
    assert_eq!(select_due.at_ms(), 350.0);
    assert_eq!(modal_due.at_ms(), 300.0);

    clock.set(modal_due.at_ms());
    select.tick();
    modals.tick();
    assert!(!select.view().dropdown_hidden);
    assert!(!modals.view().modals[0].displayed);

    clock.set(select_due.at_ms());
    select.tick();
    assert!(select.view().dropdown_hidden);
    assert_eq!(clock.now_ms(), 350.0);
}
