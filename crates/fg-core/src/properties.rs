//! Field property editor: single-field attribute mutations.
//!
//! Edits never touch placement (`page`, `row`, `position`). Option-list
//! edits are ignored on fields whose type carries no options.

use crate::id::FieldId;
use crate::model::{Field, FieldOption, FormState, Options};
use crate::registry::FieldType;
use serde::{Deserialize, Serialize};

/// One attribute change on a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FieldEdit {
    SetLabel { label: String },
    SetPlaceholder { placeholder: String },
    SetRequired { required: bool },
    /// Switch type; options are re-normalized through the registry.
    SetFieldType { field_type: FieldType },
    SetOptions { options: Options },
    AddOption { option: FieldOption },
    UpdateOption { index: usize, option: FieldOption },
    RemoveOption { index: usize },
    MoveOption { from: usize, to: usize },
}

impl FormState {
    /// Apply an attribute edit to one field. Returns `true` if it changed.
    pub fn edit_field(&mut self, id: FieldId, edit: FieldEdit) -> bool {
        let Some(field) = self.field_mut(id) else {
            log::debug!("edit_field: unknown field {id:?}");
            return false;
        };
        apply_edit(field, edit)
    }
}

fn apply_edit(field: &mut Field, edit: FieldEdit) -> bool {
    match edit {
        FieldEdit::SetLabel { label } => replace(&mut field.label, label),
        FieldEdit::SetPlaceholder { placeholder } => replace(&mut field.placeholder, placeholder),
        FieldEdit::SetRequired { required } => replace(&mut field.required, required),
        FieldEdit::SetFieldType { field_type } => {
            if field.field_type == field_type {
                return false;
            }
            field.field_type = field_type;
            field.options = field_type.normalize_options(field.options.take());
            true
        }
        FieldEdit::SetOptions { options } => match choice_options(field) {
            Some(current) => replace(current, options),
            None => false,
        },
        FieldEdit::AddOption { option } => match choice_options(field) {
            Some(current) => {
                current.push(option);
                true
            }
            None => false,
        },
        FieldEdit::UpdateOption { index, option } => {
            match choice_options(field).and_then(|opts| opts.get_mut(index)) {
                Some(slot) => replace(slot, option),
                None => false,
            }
        }
        FieldEdit::RemoveOption { index } => match choice_options(field) {
            Some(current) if index < current.len() => {
                current.remove(index);
                true
            }
            _ => false,
        },
        FieldEdit::MoveOption { from, to } => match choice_options(field) {
            Some(current) if from < current.len() && to < current.len() && from != to => {
                let option = current.remove(from);
                current.insert(to, option);
                true
            }
            _ => false,
        },
    }
}

/// The field's options list, created empty if a choice field lost it.
fn choice_options(field: &mut Field) -> Option<&mut Options> {
    if !field.field_type.has_options() {
        return None;
    }
    Some(field.options.get_or_insert_with(Options::new))
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
