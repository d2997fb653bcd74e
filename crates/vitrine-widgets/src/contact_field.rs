//! Contact value field that follows a "contact channel" select.
//!
//! Phone and WhatsApp switch the field to a masked `tel` input; email and
//! Telegram switch it to plain inputs with channel-specific placeholders.

use crate::phone_mask::PhoneMask;
use crate::select::ChangeDetail;
use serde::{Deserialize, Serialize};
use vitrine_core::{Event, Handled, Markup, MarkupError, Query, Widget};

/// `data-name` of the channel select.
pub const CHANNEL_SELECT_NAME: &str = "contact-channel";

/// `name` of the contact value input.
pub const CONTACT_VALUE_NAME: &str = "contact-value";

/// Contact channel picked in the select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    /// Phone call
    Phone,
    /// WhatsApp
    Whatsapp,
    /// E-mail
    Email,
    /// Telegram
    Telegram,
    /// Unknown or not picked yet
    #[default]
    Other,
}

impl ContactChannel {
    /// Parse a select value; unknown values map to [`ContactChannel::Other`].
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value {
            "phone" => Self::Phone,
            "whatsapp" => Self::Whatsapp,
            "email" => Self::Email,
            "telegram" => Self::Telegram,
            _ => Self::Other,
        }
    }

    /// `type` attribute for the value input.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Phone | Self::Whatsapp => "tel",
            Self::Email => "email",
            Self::Telegram | Self::Other => "text",
        }
    }

    /// `placeholder` attribute for the value input.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Phone => "Номер телефона",
            Self::Whatsapp => "Номер WhatsApp",
            Self::Email => "Email адрес",
            Self::Telegram => "Telegram username",
            Self::Other => "Переменная",
        }
    }

    /// Whether the channel takes a masked phone number.
    #[must_use]
    pub const fn masked(self) -> bool {
        matches!(self, Self::Phone | Self::Whatsapp)
    }
}

/// Render snapshot of the value input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactFieldView {
    /// Current channel
    pub channel: ContactChannel,
    /// `type` attribute
    pub input_type: &'static str,
    /// `placeholder` attribute
    pub placeholder: &'static str,
    /// `inputmode` attribute, removed when `None`
    pub inputmode: Option<&'static str>,
    /// Field value
    pub value: String,
    /// Caret to restore, when the mask moved it
    pub caret: Option<usize>,
}

/// Contact value field bound to a channel select.
#[derive(Debug, Clone)]
pub struct ContactField {
    inactive: Option<MarkupError>,
    channel: ContactChannel,
    mask: Option<PhoneMask>,
    value: String,
}

impl ContactField {
    /// Field starting on `channel`.
    #[must_use]
    pub fn new(channel: ContactChannel) -> Self {
        let mut field = Self {
            inactive: None,
            channel: ContactChannel::Other,
            mask: None,
            value: String::new(),
        };
        field.set_channel(channel);
        field
    }

    /// Build from a form holding both the channel select and the value input.
    ///
    /// The starting channel is read from the select's hidden input.
    pub fn from_markup<M: Markup>(form: Option<&M>) -> Self {
        let select = form.and_then(|f| {
            f.find_all(&Query::AttrEq("data-name", CHANNEL_SELECT_NAME))
                .into_iter()
                .find(|s| s.attr("data-component").as_deref() == Some("select"))
        });
        let input = form.and_then(|f| {
            f.find_all(&Query::TagAttrEq("input", "name", CONTACT_VALUE_NAME))
                .into_iter()
                .find(|el| el.has_attr("data-quiz-contact-field"))
        });

        let inactive = match (&select, &input) {
            _ if form.is_none() => Some(MarkupError::MissingRoot {
                widget: "contact-field",
            }),
            (None, _) => Some(MarkupError::MissingAnchor {
                widget: "contact-field",
                anchor: CHANNEL_SELECT_NAME,
            }),
            (_, None) => Some(MarkupError::MissingAnchor {
                widget: "contact-field",
                anchor: CONTACT_VALUE_NAME,
            }),
            _ => None,
        };
        if let Some(err) = inactive {
            tracing::debug!(%err, "contact field inactive");
            return Self {
                inactive: Some(err),
                channel: ContactChannel::Other,
                mask: None,
                value: String::new(),
            };
        }

        let initial = select
            .and_then(|s| s.find(&Query::TagAttrEq("input", "type", "hidden")))
            .and_then(|hidden| hidden.attr("value"))
            .filter(|v| !v.is_empty());
        match initial {
            Some(value) => Self::new(ContactChannel::from_value(&value)),
            None => Self {
                inactive: None,
                channel: ContactChannel::Other,
                mask: None,
                value: input.and_then(|i| i.attr("value")).unwrap_or_default(),
            },
        }
    }

    /// Current channel.
    #[must_use]
    pub const fn channel(&self) -> ContactChannel {
        self.channel
    }

    /// Whether the phone mask is attached.
    #[must_use]
    pub const fn is_masked(&self) -> bool {
        self.mask.is_some()
    }

    /// Field value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.mask
            .as_ref()
            .map_or(self.value.as_str(), PhoneMask::formatted_value)
    }

    /// Switch channel: the field is cleared and the mask detached or
    /// attached.
    pub fn set_channel(&mut self, channel: ContactChannel) {
        if self.inactive.is_some() {
            return;
        }
        self.channel = channel;
        self.value.clear();
        self.mask = channel.masked().then(|| PhoneMask::new(""));
        tracing::trace!(?channel, "contact channel switched");
    }

    /// React to `select:change` from the channel select.
    pub fn on_channel_change(&mut self, detail: &ChangeDetail) {
        let value = detail.value.as_deref().unwrap_or_default();
        self.set_channel(ContactChannel::from_value(value));
    }
}

impl Widget for ContactField {
    type View = ContactFieldView;
    type Message = std::convert::Infallible;

    fn kind(&self) -> &'static str {
        "contact-field"
    }

    fn is_active(&self) -> bool {
        self.inactive.is_none()
    }

    fn event(&mut self, event: &Event) -> Handled {
        if self.inactive.is_some() {
            return Handled::No;
        }
        if let Some(mask) = &mut self.mask {
            return mask.event(event);
        }
        if let Event::TextInput { value, .. } = event {
            self.value.clone_from(value);
        }
        Handled::No
    }

    fn view(&self) -> ContactFieldView {
        let (value, caret) = match &self.mask {
            Some(mask) => {
                let view = mask.view();
                (view.value, Some(view.caret))
            }
            None => (self.value.clone(), None),
        };
        ContactFieldView {
            channel: self.channel,
            input_type: self.channel.input_type(),
            placeholder: self.channel.placeholder(),
            inputmode: self.mask.is_some().then_some("numeric"),
            value,
            caret,
        }
    }

    fn take_messages(&mut self) -> Vec<Self::Message> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{Element, EventTarget, Key, Modifiers};

    fn form(hidden: Option<&str>) -> Element {
        let mut select = Element::new("div")
            .attr("data-component", "select")
            .attr("data-name", CHANNEL_SELECT_NAME);
        if let Some(value) = hidden {
            select = select.child(
                Element::new("input")
                    .attr("type", "hidden")
                    .attr("value", value),
            );
        }
        Element::new("form").child(select).child(
            Element::new("input")
                .attr("name", CONTACT_VALUE_NAME)
                .attr("data-quiz-contact-field", ""),
        )
    }

    fn detail(value: &str) -> ChangeDetail {
        ChangeDetail {
            value: Some(value.to_string()),
            values: vec![value.to_string()],
            labels: vec![value.to_string()],
        }
    }

    // =========================================================================
    // Channel Tests - TESTS FIRST
    // =========================================================================

    #[test]
    fn test_channel_settings() {
        let cases = [
            ("phone", "tel", "Номер телефона", true),
            ("whatsapp", "tel", "Номер WhatsApp", true),
            ("email", "email", "Email адрес", false),
            ("telegram", "text", "Telegram username", false),
            ("viber", "text", "Переменная", false),
        ];
        for (value, ty, placeholder, masked) in cases {
            let channel = ContactChannel::from_value(value);
            assert_eq!(channel.input_type(), ty, "{value}");
            assert_eq!(channel.placeholder(), placeholder, "{value}");
            assert_eq!(channel.masked(), masked, "{value}");
        }
    }

    #[test]
    fn test_switch_clears_and_attaches_mask() {
        let mut field = ContactField::new(ContactChannel::Email);
        field.event(&Event::TextInput {
            value: "a@b.c".into(),
            caret: 5,
        });
        assert_eq!(field.value(), "a@b.c");
        assert!(field.view().inputmode.is_none());

        field.on_channel_change(&detail("phone"));
        assert!(field.is_masked());
        assert_eq!(field.value(), "");
        let view = field.view();
        assert_eq!(view.input_type, "tel");
        assert_eq!(view.inputmode, Some("numeric"));

        field.event(&Event::TextInput {
            value: "9991234567".into(),
            caret: 10,
        });
        assert_eq!(field.value(), "+7 (999) 123-45-67");

        field.on_channel_change(&detail("telegram"));
        assert!(!field.is_masked());
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_masked_field_blocks_letters() {
        let mut field = ContactField::new(ContactChannel::Whatsapp);
        let letter = Event::KeyDown {
            key: Key::Char('q'),
            modifiers: Modifiers::NONE,
            target: EventTarget::Input,
        };
        assert_eq!(field.event(&letter), Handled::Yes);
        field.on_channel_change(&detail("email"));
        assert_eq!(field.event(&letter), Handled::No);
    }

    // =========================================================================
    // Markup Tests
    // =========================================================================

    #[test]
    fn test_initial_channel_from_hidden_input() {
        let el = form(Some("whatsapp"));
        let field = ContactField::from_markup(Some(&&el));
        assert!(field.is_active());
        assert_eq!(field.channel(), ContactChannel::Whatsapp);
        assert!(field.is_masked());
    }

    #[test]
    fn test_no_hidden_value_leaves_field_alone() {
        let el = form(None);
        let field = ContactField::from_markup(Some(&&el));
        assert!(field.is_active());
        assert_eq!(field.channel(), ContactChannel::Other);
        assert!(!field.is_masked());
    }

    #[test]
    fn test_missing_value_input_is_inactive() {
        let el = Element::new("form").child(
            Element::new("div")
                .attr("data-component", "select")
                .attr("data-name", CHANNEL_SELECT_NAME),
        );
        let mut field = ContactField::from_markup(Some(&&el));
        assert!(!field.is_active());
        field.set_channel(ContactChannel::Phone);
        assert!(!field.is_masked());
    }
}
