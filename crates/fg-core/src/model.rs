//! Core placement data model for FG forms.
//!
//! A form is a flat list of `Field`s plus `LayoutSettings` describing its
//! pages and rows. Fields do not live *inside* rows: each field carries its
//! own placement `(page, row, position)` and rows are pure descriptors.
//! Column membership is never stored; the grid materializer derives it.

use crate::id::{FieldId, PageId, RowId};
use crate::registry::FieldType;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Options ─────────────────────────────────────────────────────────────

/// A choice option with extra presentation data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One entry in a choice field's options list.
///
/// Deserializes from either a bare string or an object, so both shapes
/// found in stored forms load into the same type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Plain(String),
    Rich(RichOption),
}

impl FieldOption {
    pub fn plain(label: impl Into<String>) -> Self {
        FieldOption::Plain(label.into())
    }

    /// The text shown to the person filling in the form.
    pub fn label(&self) -> &str {
        match self {
            FieldOption::Plain(s) => s,
            FieldOption::Rich(r) => &r.name,
        }
    }
}

/// Options are short in practice; keep them inline.
pub type Options = SmallVec<[FieldOption; 4]>;

// ─── Fields ──────────────────────────────────────────────────────────────

/// A placed form element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    /// Present only for choice types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,

    /// Index of the owning page.
    #[serde(default)]
    pub page: usize,
    /// Index into the page's row list; `None` means the page's main area.
    #[serde(default)]
    pub row: Option<usize>,
    /// Order within the container. Ties fall back to array order.
    #[serde(default)]
    pub position: usize,
}

impl Field {
    /// A field with registry defaults, placed at the start of page 0's main area.
    pub fn new(id: FieldId, field_type: FieldType) -> Self {
        Self {
            id,
            field_type,
            label: field_type.default_label().to_string(),
            placeholder: field_type.default_placeholder().to_string(),
            required: false,
            options: field_type.default_options(),
            page: 0,
            row: None,
            position: 0,
        }
    }

    /// The container this field currently lives in.
    pub fn container(&self) -> ContainerKey {
        match self.row {
            Some(row) => ContainerKey::Row {
                page: self.page,
                row,
            },
            None => ContainerKey::Main { page: self.page },
        }
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────

/// A layout slot descriptor: N equal-width columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub columns: usize,
}

impl Row {
    pub fn new(columns: usize) -> Self {
        Self {
            id: RowId::fresh(),
            columns: columns.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: PageId::fresh(),
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Index of the row with `id`, if it belongs to this page.
    pub fn row_index(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }
}

/// Pages plus the active page index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    pub pages: Vec<Page>,
    #[serde(default)]
    pub current_page: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            pages: vec![Page::new("Page 1")],
            current_page: 0,
        }
    }
}

/// An addressable drop target: a page's main area or one of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContainerKey {
    Main { page: usize },
    Row { page: usize, row: usize },
}

impl ContainerKey {
    pub fn page(self) -> usize {
        match self {
            ContainerKey::Main { page } | ContainerKey::Row { page, .. } => page,
        }
    }

    pub fn contains(self, field: &Field) -> bool {
        field.container() == self
    }
}

// ─── Form state ──────────────────────────────────────────────────────────

/// The complete placement state of one form.
///
/// This is a plain value: the editor owns exactly one, collaborators get
/// clones. Serialized, it is the persistence snapshot
/// `{ fields, layoutSettings }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub layout_settings: LayoutSettings,
}

impl FormState {
    /// A form with a single empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
