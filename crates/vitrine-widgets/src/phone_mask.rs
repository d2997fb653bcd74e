//! Russian phone number mask: `+7 (___) ___-__-__`.
//!
//! The mask keeps the field value formatted on every edit, restricts key
//! presses to digits plus editing and navigation keys, and clears a field
//! left holding only the prefix.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use vitrine_core::{Event, Handled, Key, Markup, Modifiers, Widget};

/// Mask shown as placeholder.
pub const PHONE_MASK: &str = "+7 (___) ___-__-__";

/// What an empty field shows once focused.
pub const PHONE_PREFIX: &str = "+7 (";

/// Digits in a complete number, country code included.
pub const PHONE_DIGITS: usize = 11;

/// CSS selector for fields masked automatically.
pub const PHONE_FIELD_SELECTOR: &str =
    "input.form_input-tel, input[name=\"tel\"], input[name=\"phone\"], input[type=\"tel\"]";

/// Keep only ASCII digits.
#[must_use]
pub fn clean_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Format arbitrary input as `+7 (XXX) XXX-XX-XX`, filling groups as far as
/// digits allow.
///
/// A leading `8` becomes `7`, a missing country code is added and extra
/// digits are dropped. Input without digits yields [`PHONE_PREFIX`] when it
/// already started with `+7`, otherwise an empty string.
///
/// ```
/// use vitrine_widgets::phone_mask::format_phone;
///
/// assert_eq!(format_phone("89991234567"), "+7 (999) 123-45-67");
/// assert_eq!(format_phone("999"), "+7 (999");
/// assert_eq!(format_phone("+7"), "+7 (");
/// ```
#[must_use]
pub fn format_phone(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let has_prefix = raw.trim().starts_with("+7");
    let mut digits = clean_phone(raw);
    if digits.is_empty() {
        return if has_prefix {
            PHONE_PREFIX.to_string()
        } else {
            String::new()
        };
    }
    if digits.starts_with('8') {
        digits.replace_range(..1, "7");
    } else if !digits.starts_with('7') {
        digits.insert(0, '7');
    }
    digits.truncate(PHONE_DIGITS);

    let group = |from: usize, to: usize| digits.get(from..to.min(digits.len())).unwrap_or("");
    let mut out = String::from(PHONE_PREFIX);
    out.push_str(group(1, 4));
    if digits.len() > 4 {
        out.push_str(") ");
        out.push_str(group(4, 7));
    }
    if digits.len() > 7 {
        out.push('-');
        out.push_str(group(7, 9));
    }
    if digits.len() > 9 {
        out.push('-');
        out.push_str(group(9, 11));
    }
    out
}

/// Whether an input element should get a mask during page-wide discovery.
///
/// Fields owned by a contact-channel switcher are skipped; that widget
/// attaches masks itself.
pub fn is_phone_field<M: Markup>(el: &M) -> bool {
    if el.tag() != "input" || el.has_attr("data-quiz-contact-field") {
        return false;
    }
    el.has_class("form_input-tel")
        || matches!(el.attr("name").as_deref(), Some("tel" | "phone"))
        || el.attr("type").as_deref() == Some("tel")
}

/// Attribute writes a masked field needs: `type=tel`, `inputmode=numeric`
/// when absent, and the mask as placeholder when absent.
pub fn field_attributes<M: Markup>(input: &M) -> Vec<(&'static str, String)> {
    let mut attrs = Vec::new();
    if input.attr("type").as_deref() != Some("tel") {
        attrs.push(("type", "tel".to_string()));
    }
    if !input.has_attr("inputmode") {
        attrs.push(("inputmode", "numeric".to_string()));
    }
    if input.attr("placeholder").map_or(true, |p| p.is_empty()) {
        attrs.push(("placeholder", PHONE_MASK.to_string()));
    }
    attrs
}

fn digits_before(value: &str, caret: usize) -> usize {
    value
        .chars()
        .take(caret)
        .filter(char::is_ascii_digit)
        .count()
}

/// Char position right after the `n`-th digit, end of string when there
/// are fewer digits.
fn after_nth_digit(value: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut seen = 0;
    for (i, c) in value.chars().enumerate() {
        if c.is_ascii_digit() {
            seen += 1;
            if seen == n {
                return i + 1;
            }
        }
    }
    value.chars().count()
}

/// Render snapshot: field value and caret (in chars).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneMaskView {
    /// Field value
    pub value: String,
    /// Caret position
    pub caret: usize,
}

/// Phone mask bound to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneMask {
    value: String,
    caret: usize,
    active: bool,
}

impl PhoneMask {
    /// Mask a field currently holding `initial`.
    #[must_use]
    pub fn new(initial: &str) -> Self {
        let value = format_phone(initial);
        let caret = value.chars().count();
        Self {
            value,
            caret,
            active: true,
        }
    }

    /// Mask an input element, reading its `value` attribute.
    ///
    /// Anything other than an `<input>` yields an inactive mask.
    pub fn from_markup<M: Markup>(input: Option<&M>) -> Self {
        match input {
            Some(el) if el.tag() == "input" => Self::new(&el.attr("value").unwrap_or_default()),
            _ => {
                tracing::warn!("phone mask needs an <input> element");
                Self {
                    value: String::new(),
                    caret: 0,
                    active: false,
                }
            }
        }
    }

    /// Sync with the live field before forwarding a key press.
    pub fn sync(&mut self, value: &str, caret: usize) {
        self.value = value.to_string();
        self.caret = caret.min(self.value.chars().count());
    }

    /// Digits only.
    #[must_use]
    pub fn clean_value(&self) -> String {
        clean_phone(&self.value)
    }

    /// Value as displayed.
    #[must_use]
    pub fn formatted_value(&self) -> &str {
        &self.value
    }

    /// Complete number: 11 digits starting with 7.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let clean = self.clean_value();
        clean.len() == PHONE_DIGITS && clean.starts_with('7')
    }

    fn on_input(&mut self, raw: &str, caret: usize) {
        let formatted = format_phone(raw);
        let mut digits = digits_before(raw, caret);
        // A country code the user did not type shifts every digit right.
        if clean_phone(raw)
            .chars()
            .next()
            .is_some_and(|first| first != '7' && first != '8')
        {
            digits += 1;
        }
        self.caret = after_nth_digit(&formatted, digits);
        self.value = formatted;
    }

    fn on_key(&mut self, key: Key, modifiers: Modifiers) -> Handled {
        match key {
            Key::Backspace => self.backspace_over_separator(),
            Key::Delete
            | Key::Tab
            | Key::Escape
            | Key::Enter
            | Key::Left
            | Key::Right
            | Key::Up
            | Key::Down
            | Key::Home
            | Key::End => Handled::No,
            Key::Char(c)
                if modifiers.shortcut() && matches!(c.to_ascii_lowercase(), 'a' | 'c' | 'v' | 'x') =>
            {
                Handled::No
            }
            key if key.is_digit() => Handled::No,
            _ => Handled::Yes,
        }
    }

    /// Backspace right after `)`, space or `-` removes the digit in front of
    /// the separator instead of the separator itself.
    fn backspace_over_separator(&mut self) -> Handled {
        let chars: Vec<char> = self.value.chars().collect();
        let caret = self.caret.min(chars.len());
        if caret == 0 || !matches!(chars[caret - 1], ')' | '-' | ' ') {
            return Handled::No;
        }
        let before: String = chars[..caret.saturating_sub(2)].iter().collect();
        let after: String = chars[caret..].iter().collect();
        self.value = format_phone(&(before + &after));
        self.caret = caret.saturating_sub(2).min(self.value.chars().count());
        Handled::Yes
    }
}

impl Widget for PhoneMask {
    type View = PhoneMaskView;
    type Message = Infallible;

    fn kind(&self) -> &'static str {
        "phone-mask"
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn event(&mut self, event: &Event) -> Handled {
        if !self.active {
            return Handled::No;
        }
        match event {
            Event::TextInput { value, caret } => {
                self.on_input(value, *caret);
                Handled::No
            }
            Event::KeyDown { key, modifiers, .. } => self.on_key(*key, *modifiers),
            Event::Paste { text } => {
                self.value = format_phone(&clean_phone(text));
                self.caret = self.value.chars().count();
                Handled::Yes
            }
            Event::FocusIn => {
                if self.value.is_empty() {
                    self.value = PHONE_PREFIX.to_string();
                    self.caret = self.value.chars().count();
                }
                Handled::No
            }
            Event::FocusOut => {
                if self.value == PHONE_PREFIX || self.value.chars().count() < 4 {
                    self.value.clear();
                } else {
                    self.value = format_phone(&self.value);
                }
                self.caret = self.caret.min(self.value.chars().count());
                Handled::No
            }
            _ => Handled::No,
        }
    }

    fn view(&self) -> PhoneMaskView {
        PhoneMaskView {
            value: self.value.clone(),
            caret: self.caret,
        }
    }

    fn take_messages(&mut self) -> Vec<Infallible> {
        Vec::new()
    }
}
