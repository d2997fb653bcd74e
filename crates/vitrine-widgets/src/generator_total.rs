//! Summary line tying a select and a counter together: `"3 – ДИЗЕЛЬ"`.

use crate::counter::format_count;
use crate::select::ChangeDetail;
use serde::{Deserialize, Serialize};
use vitrine_core::attrs::parse_number;
use vitrine_core::{Event, Handled, Markup, MarkupError, Query, Widget};

/// Summary formatting options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalConfig {
    /// Upper-case the label
    pub uppercase: bool,
    /// Separator between count and label
    pub dash: String,
    /// Count shown when there is no counter
    pub default_count: f64,
}

impl Default for TotalConfig {
    fn default() -> Self {
        Self {
            uppercase: true,
            dash: " – ".to_string(),
            default_count: 1.0,
        }
    }
}

/// `"{count}{dash}{label}"` with surrounding whitespace trimmed.
#[must_use]
pub fn format_total(count: f64, label: &str, config: &TotalConfig) -> String {
    let label = if config.uppercase {
        label.to_uppercase()
    } else {
        label.to_string()
    };
    format!("{}{}{label}", format_count(count), config.dash)
        .trim()
        .to_string()
}

/// Read the count the way a counter root displays it: value input, then
/// hidden input, then span text. Unparsable text counts as zero.
pub fn read_count<M: Markup>(counter: &M) -> Option<f64> {
    let number = |raw: String| parse_number(raw.trim()).unwrap_or(0.0);
    if let Some(input) = counter.find_ref("value-input") {
        return Some(number(input.attr("value").unwrap_or_default()));
    }
    if let Some(hidden) = counter.find_ref("hidden") {
        return Some(number(hidden.attr("value").unwrap_or_default()));
    }
    counter.find_ref("value").map(|span| number(span.text()))
}

/// Read the label a select root currently displays.
pub fn read_label<M: Markup>(select: &M) -> String {
    select
        .find(&Query::AttrEq("data-ref", "value"))
        .map(|el| el.text().trim().to_string())
        .unwrap_or_default()
}

/// Generator summary line.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorTotal {
    config: TotalConfig,
    inactive: Option<MarkupError>,
    count: Option<f64>,
    label: String,
}

impl GeneratorTotal {
    /// Summary with known starting values.
    #[must_use]
    pub fn new(count: Option<f64>, label: impl Into<String>, config: TotalConfig) -> Self {
        Self {
            config,
            inactive: None,
            count,
            label: label.into(),
        }
    }

    /// Build from the select root, the counter root and the output element.
    /// Without an output element the summary is inactive.
    pub fn from_markup<M: Markup>(
        select: Option<&M>,
        counter: Option<&M>,
        output: Option<&M>,
        config: TotalConfig,
    ) -> Self {
        let label = select.map(read_label).unwrap_or_default();
        let count = counter.and_then(read_count);
        let mut total = Self::new(count, label, config);
        if output.is_none() {
            let err = MarkupError::MissingAnchor {
                widget: "generator-total",
                anchor: "output",
            };
            tracing::debug!(%err, "generator total inactive");
            total.inactive = Some(err);
        }
        total
    }

    /// Rendered text.
    #[must_use]
    pub fn text(&self) -> String {
        format_total(
            self.count.unwrap_or(self.config.default_count),
            &self.label,
            &self.config,
        )
    }

    /// `select:change`: take the first label, keeping the current one when
    /// nothing is selected.
    pub fn on_select_change(&mut self, detail: &ChangeDetail) {
        if let Some(label) = detail.labels.first().filter(|l| !l.is_empty()) {
            self.label.clone_from(label);
        }
    }

    /// `counter:change`: non-finite values keep the current count.
    pub fn on_counter_change(&mut self, value: f64) {
        if value.is_finite() {
            self.count = Some(value);
        }
    }
}

impl Widget for GeneratorTotal {
    type View = String;
    type Message = std::convert::Infallible;

    fn kind(&self) -> &'static str {
        "generator-total"
    }

    fn is_active(&self) -> bool {
        self.inactive.is_none()
    }

    fn event(&mut self, _event: &Event) -> Handled {
        Handled::No
    }

    fn view(&self) -> String {
        self.text()
    }

    fn take_messages(&mut self) -> Vec<Self::Message> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::Element;

    fn detail(labels: &[&str]) -> ChangeDetail {
        ChangeDetail {
            value: labels.first().map(|l| l.to_lowercase()),
            values: labels.iter().map(|l| l.to_lowercase()).collect(),
            labels: labels.iter().map(ToString::to_string).collect(),
        }
    }

    // =========================================================================
    // Formatting Tests - TESTS FIRST
    // =========================================================================

    #[test]
    fn test_format_total() {
        let config = TotalConfig::default();
        assert_eq!(format_total(3.0, "Дизель", &config), "3 – ДИЗЕЛЬ");
        assert_eq!(format_total(2.5, "", &config), "2.5 –");
    }

    #[test]
    fn test_format_total_lowercase_custom_dash() {
        let config = TotalConfig {
            uppercase: false,
            dash: "x ".to_string(),
            ..TotalConfig::default()
        };
        assert_eq!(format_total(2.0, "Газ", &config), "2x Газ");
    }

    // =========================================================================
    // Update Tests
    // =========================================================================

    #[test]
    fn test_default_count_without_counter() {
        let total = GeneratorTotal::new(None, "Бензин", TotalConfig::default());
        assert_eq!(total.view(), "1 – БЕНЗИН");
    }

    #[test]
    fn test_select_change_uses_first_label() {
        let mut total = GeneratorTotal::new(Some(2.0), "Бензин", TotalConfig::default());
        total.on_select_change(&detail(&["Газ", "Дизель"]));
        assert_eq!(total.text(), "2 – ГАЗ");
        total.on_select_change(&detail(&[]));
        assert_eq!(total.text(), "2 – ГАЗ");
    }

    #[test]
    fn test_counter_change() {
        let mut total = GeneratorTotal::new(Some(2.0), "Газ", TotalConfig::default());
        total.on_counter_change(5.0);
        assert_eq!(total.text(), "5 – ГАЗ");
        total.on_counter_change(f64::NAN);
        assert_eq!(total.text(), "5 – ГАЗ");
    }

    // =========================================================================
    // Markup Tests
    // =========================================================================

    #[test]
    fn test_from_markup() {
        let select = Element::new("div").child(Element::new("span").data_ref("value").text(" Газ "));
        let counter = Element::new("div")
            .child(Element::new("input").data_ref("hidden").attr("value", "4"))
            .child(Element::new("span").data_ref("value").text("9"));
        let output = Element::new("span");
        let total = GeneratorTotal::from_markup(
            Some(&&select),
            Some(&&counter),
            Some(&&output),
            TotalConfig::default(),
        );
        assert!(total.is_active());
        assert_eq!(total.text(), "4 – ГАЗ");
    }

    #[test]
    fn test_read_count_garbage_is_zero() {
        let counter = Element::new("div").child(Element::new("span").data_ref("value").text("abc"));
        assert_eq!(read_count(&&counter), Some(0.0));
        assert_eq!(read_count(&&Element::new("div")), None);
    }

    #[test]
    fn test_missing_output_is_inactive() {
        let total = GeneratorTotal::from_markup::<&Element>(None, None, None, TotalConfig::default());
        assert!(!total.is_active());
        assert_eq!(total.text(), "1 –");
    }
}
