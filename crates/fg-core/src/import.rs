//! Appending externally produced fields (e.g. from an extraction service).
//!
//! Imported fields arrive without placement. They always land at the end
//! of the current page's main area, never in a row.

use crate::id::FieldId;
use crate::model::{Field, FormState, Options};
use crate::registry::FieldType;
use serde::{Deserialize, Serialize};

/// A field description without identity or placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedField {
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<Options>,
}

impl ImportedField {
    /// Build a placed field with a fresh id; placement is filled in by the caller.
    pub fn into_field(self) -> Field {
        let mut field = Field::new(FieldId::fresh(), self.field_type);
        field.label = self.label;
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        field.required = self.required;
        field.options = self.field_type.normalize_options(self.options);
        field
    }
}

impl FormState {
    /// Append `imported` to the current page's main area, in order.
    /// Returns the ids assigned to the new fields.
    pub fn import_fields(&mut self, imported: Vec<ImportedField>) -> Vec<FieldId> {
        let page = self.current_page();
        imported
            .into_iter()
            .filter_map(|partial| {
                let field = partial.into_field();
                let id = field.id;
                self.append_field(field, page).then_some(id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainerKey;
    use pretty_assertions::assert_eq;

    #[test]
    fn imports_append_to_current_page_main_area() {
        let mut state = FormState::new();
        state.add_page();
        state.add_row(1, 2);
        let existing = state.append_new_field(FieldType::Text, 1).unwrap();

        let json = r#"[
            {"fieldType": "email", "label": "Work email", "required": true},
            {"fieldType": "select", "label": "Team size", "options": ["1-10", "11-50"]},
            {"fieldType": "date", "label": "Start", "placeholder": "YYYY-MM-DD", "options": ["x"]}
        ]"#;
        let imported: Vec<ImportedField> = serde_json::from_str(json).unwrap();
        let ids = state.import_fields(imported);

        assert_eq!(ids.len(), 3);
        let main: Vec<FieldId> = state
            .fields_for_container(ContainerKey::Main { page: 1 })
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(main, [vec![existing], ids.clone()].concat());

        let positions: Vec<usize> = ids
            .iter()
            .map(|id| state.field(*id).unwrap().position)
            .collect();
        assert_eq!(positions, vec![1, 2, 3]);

        let email = state.field(ids[0]).unwrap();
        assert!(email.required);
        assert_eq!(email.placeholder, "name@example.com");

        let team = state.field(ids[1]).unwrap();
        assert_eq!(team.options.as_ref().unwrap()[1].label(), "11-50");

        let start = state.field(ids[2]).unwrap();
        assert_eq!(start.placeholder, "YYYY-MM-DD");
        assert!(start.options.is_none());
    }
}
