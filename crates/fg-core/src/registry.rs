//! Field registry: the canonical list of field types and what they carry.
//!
//! Stateless. Every place that needs to know whether a field has an
//! options list, or what a freshly created field looks like, asks here.

use crate::model::{FieldOption, Options};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

/// The field primitives a form can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Phone,
    Url,
    Password,
    Textarea,
    Date,
    Time,
    File,
    Select,
    Radio,
    Checkbox,
    ButtonGroup,
}

impl FieldType {
    /// Every registered type, in palette order.
    pub const ALL: [FieldType; 14] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Number,
        FieldType::Phone,
        FieldType::Url,
        FieldType::Password,
        FieldType::Textarea,
        FieldType::Date,
        FieldType::Time,
        FieldType::File,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::ButtonGroup,
    ];

    /// The wire identifier (`"text"`, `"button-group"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Password => "password",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::File => "file",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::ButtonGroup => "button-group",
        }
    }

    /// Look up a type by identifier. Accepts the wire form plus the
    /// spellings palettes commonly use (`tel`, `button_group`, `buttonGroup`).
    pub fn from_identifier(s: &str) -> Option<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let ty = match lowered.as_str() {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "number" => FieldType::Number,
            "phone" | "tel" => FieldType::Phone,
            "url" => FieldType::Url,
            "password" => FieldType::Password,
            "textarea" => FieldType::Textarea,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "file" => FieldType::File,
            "select" | "dropdown" => FieldType::Select,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            "button-group" | "button_group" | "buttongroup" => FieldType::ButtonGroup,
            _ => return None,
        };
        Some(ty)
    }

    /// Whether fields of this type carry an `options` list.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox | FieldType::ButtonGroup
        )
    }

    pub fn default_label(self) -> &'static str {
        match self {
            FieldType::Text => "Text Field",
            FieldType::Email => "Email",
            FieldType::Number => "Number",
            FieldType::Phone => "Phone Number",
            FieldType::Url => "Website",
            FieldType::Password => "Password",
            FieldType::Textarea => "Long Answer",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::File => "File Upload",
            FieldType::Select => "Dropdown",
            FieldType::Radio => "Single Choice",
            FieldType::Checkbox => "Multiple Choice",
            FieldType::ButtonGroup => "Button Group",
        }
    }

    pub fn default_placeholder(self) -> &'static str {
        match self {
            FieldType::Email => "name@example.com",
            FieldType::Phone => "+1 555 000 0000",
            FieldType::Url => "https://",
            FieldType::Select => "Select an option",
            FieldType::Textarea => "Type your answer here",
            _ => "",
        }
    }

    /// Default options for a freshly created field, `None` for non-choice types.
    pub fn default_options(self) -> Option<Options> {
        if !self.has_options() {
            return None;
        }
        Some(smallvec![
            FieldOption::plain("Option 1"),
            FieldOption::plain("Option 2"),
            FieldOption::plain("Option 3"),
        ])
    }

    /// Bring an options list in line with this type's capability.
    ///
    /// Non-choice types never carry options. Choice types keep what they
    /// were given, or get the defaults when nothing was supplied.
    pub fn normalize_options(self, options: Option<Options>) -> Option<Options> {
        if !self.has_options() {
            return None;
        }
        match options {
            Some(opts) => Some(opts),
            None => self.default_options(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_roundtrip() {
        for ty in FieldType::ALL {
            assert_eq!(FieldType::from_identifier(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(FieldType::from_identifier("tel"), Some(FieldType::Phone));
        assert_eq!(
            FieldType::from_identifier("buttonGroup"),
            Some(FieldType::ButtonGroup)
        );
        assert_eq!(FieldType::from_identifier(" Select "), Some(FieldType::Select));
        assert_eq!(FieldType::from_identifier("signature"), None);
    }

    #[test]
    fn only_choice_types_have_options() {
        let choice: Vec<_> = FieldType::ALL
            .into_iter()
            .filter(|t| t.has_options())
            .collect();
        assert_eq!(
            choice,
            vec![
                FieldType::Select,
                FieldType::Radio,
                FieldType::Checkbox,
                FieldType::ButtonGroup
            ]
        );
        assert!(FieldType::Text.default_options().is_none());
        assert_eq!(FieldType::Radio.default_options().unwrap().len(), 3);
    }

    #[test]
    fn normalize_drops_or_fills_options() {
        let given: Options = smallvec![FieldOption::plain("Yes")];
        assert_eq!(FieldType::Email.normalize_options(Some(given.clone())), None);
        assert_eq!(
            FieldType::Select.normalize_options(Some(given.clone())),
            Some(given)
        );
        assert_eq!(
            FieldType::Checkbox.normalize_options(None),
            FieldType::Checkbox.default_options()
        );
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&FieldType::ButtonGroup).unwrap();
        assert_eq!(json, "\"button-group\"");
    }
}
