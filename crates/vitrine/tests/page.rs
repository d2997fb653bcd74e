//! Page discovery and message routing over an in-memory document.

use vitrine::{
    Element, Event, EventTarget, ManualClock, Page, PageMessage, PageOptions, Silent, Widget,
};

fn option(value: &str, label: &str) -> Element {
    Element::new("li")
        .class("c-select__option")
        .attr("data-value", value)
        .text(label)
}

fn fuel_select() -> Element {
    Element::new("div")
        .attr("id", "fuel")
        .attr("data-component", "select")
        .child(Element::new("button").data_ref("toggle"))
        .child(Element::new("span").data_ref("value"))
        .child(
            Element::new("div").data_ref("dropdown").child(
                Element::new("ul")
                    .data_ref("list")
                    .child(option("petrol", "Бензин"))
                    .child(option("diesel", "Дизель")),
            ),
        )
}

fn tabs() -> Element {
    Element::new("div")
        .attr("data-component", "tabs")
        .child(
            Element::new("button")
                .attr("data-tab-button", "")
                .attr("data-tab-index", "0")
                .attr("data-tab-active", "true"),
        )
        .child(
            Element::new("button")
                .attr("data-tab-button", "")
                .attr("data-tab-index", "1"),
        )
        .child(Element::new("div").attr("data-tab-content", ""))
        .child(Element::new("div").attr("data-tab-content", ""))
}

fn document() -> Element {
    Element::new("body")
        .child(fuel_select())
        .child(tabs())
        .child(Element::new("span").class("generator-form__total-count"))
}

// =============================================================================
// Options Tests - TESTS FIRST
// =============================================================================

#[test]
fn test_options_from_partial_json() {
    let options: PageOptions =
        serde_json::from_str(r#"{"total_select_id": "fuel", "total": {"uppercase": false}}"#)
            .expect("options");
    assert_eq!(options.total_select_id, "fuel");
    assert_eq!(options.total_counter_id, "cert-counter");
    assert!(!options.total.uppercase);
    assert_eq!(options.modals.len(), 3);
}

// =============================================================================
// Routing Tests
// =============================================================================

#[test]
fn test_summary_tracks_configured_select() {
    let options = PageOptions {
        total_select_id: "fuel".to_string(),
        ..PageOptions::default()
    };
    let doc = document();
    let mut page = Page::discover(&&doc, ManualClock::shared(), &options);
    assert!(page.counters.is_empty());

    page.selects[0].select("diesel", Silent::NO);
    let messages = page.pump();
    assert!(messages
        .iter()
        .any(|m| matches!(m, PageMessage::Select { index: 0, .. })));
    assert_eq!(
        page.total.as_ref().map(Widget::view).as_deref(),
        Some("1 – ДИЗЕЛЬ")
    );
}

#[test]
fn test_tab_clicks_are_reported() {
    let doc = document();
    let mut page = Page::discover(&&doc, ManualClock::shared(), &PageOptions::default());
    assert_eq!(page.tabs.len(), 1);

    page.tabs[0].event(&Event::Click {
        target: EventTarget::Item(1),
    });
    let messages = page.pump();
    assert!(matches!(
        messages.as_slice(),
        [PageMessage::Tabs { index: 0, message }] if message.panel == Some(1)
    ));
    assert!(page.pump().is_empty());
}

#[test]
fn test_empty_document() {
    let doc = Element::new("body");
    let mut page = Page::discover(&&doc, ManualClock::shared(), &PageOptions::default());
    assert!(page.selects.is_empty());
    assert!(page.total.is_none());
    assert!(page.quiz.is_none());
    assert!(page.next_deadline().is_none());
    assert!(page.pump().is_empty());
}
