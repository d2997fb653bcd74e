//! Integration tests for vitrine-core.
//!
//! These tests verify the public API works correctly end-to-end.

use std::rc::Rc;
use vitrine_core::attrs::{read_flag, read_number, read_string};
use vitrine_core::{
    Clock, Deadline, Easing, Element, Event, EventTarget, Key, ManualClock, Markup, OpenCooldown,
    Point, Query, Tween,
};

// =============================================================================
// Markup Integration Tests
// =============================================================================

fn select_markup() -> Element {
    Element::new("div")
        .attr("data-component", "select")
        .attr("data-multiple", "true")
        .attr("data-placeholder", "Город")
        .attr("data-name", "city")
        .child(Element::new("button").data_ref("toggle"))
        .child(
            Element::new("div").data_ref("dropdown").child(
                Element::new("ul")
                    .data_ref("list")
                    .child(
                        Element::new("li")
                            .class("c-select__option")
                            .attr("data-value", "msk")
                            .text("Москва"),
                    )
                    .child(
                        Element::new("li")
                            .class("c-select__option")
                            .attr("data-value", "spb")
                            .attr("aria-selected", "true")
                            .text("Санкт-Петербург"),
                    ),
            ),
        )
}

#[test]
fn test_config_and_anchors_from_markup() {
    let el = select_markup();
    let root = &el;

    assert!(read_flag(Some(&root), "data-multiple", false));
    assert!(!read_flag(Some(&root), "data-multi-input", false));
    assert_eq!(read_string(Some(&root), "data-name").as_deref(), Some("city"));
    assert_eq!(read_number(Some(&root), "data-min"), None);

    let list = root.find_ref("list").expect("list anchor");
    let options = list.find_all(&Query::Class("c-select__option"));
    let values: Vec<_> = options.iter().filter_map(|o| o.attr("data-value")).collect();
    assert_eq!(values, vec!["msk", "spb"]);
    assert_eq!(options[1].attr("aria-selected").as_deref(), Some("true"));
}

// =============================================================================
// Timing Integration Tests
// =============================================================================

#[test]
fn test_cooldown_shared_between_holders() {
    let clock = ManualClock::shared();
    let cooldown = Rc::new(OpenCooldown::new(clock.clone()));
    let first = Rc::clone(&cooldown);
    let second = Rc::clone(&cooldown);

    assert!(first.try_acquire(100.0));
    assert!(second.is_blocked());
    clock.advance(100.0);
    assert!(!second.is_blocked());
}

#[test]
fn test_deadline_and_tween_share_a_clock() {
    let clock = ManualClock::new();
    clock.set(1_000.0);
    let hide = Deadline::after(clock.now_ms(), 350.0);
    let tween = Tween::new(0.0, 50.0, clock.now_ms(), 500.0).with_easing(Easing::CubicOut);

    clock.advance(350.0);
    assert!(hide.is_due(clock.now_ms()));
    assert!(!tween.is_complete(clock.now_ms()));
    clock.advance(150.0);
    assert_eq!(tween.value_at(clock.now_ms()), 50.0);
}

// =============================================================================
// Event Integration Tests
// =============================================================================

#[test]
fn test_events_from_dom_keys() {
    let event = Event::KeyDown {
        key: Key::from_dom("ArrowDown"),
        modifiers: Default::default(),
        target: EventTarget::Toggle,
    };
    match event {
        Event::KeyDown { key, target, .. } => {
            assert_eq!(key, Key::Down);
            assert!(target.is_inside());
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_tap_vs_drag_geometry() {
    let start = Point::new(10.0, 10.0);
    assert!(!start.axis_delta_exceeds(&Point::new(15.0, 15.0), 5.0));
    assert!(start.axis_delta_exceeds(&Point::new(10.0, 15.5), 5.0));
}
