//! WASM bridge for FG: exposes the form editor to the builder webview.
//!
//! Compiled via `wasm-pack build --target web`. Everything crossing the
//! boundary is a JSON string, a number, or a bool; the host never sees
//! Rust types.

use fg_core::id::FieldId;
use fg_core::import::ImportedField;
use fg_core::model::FormState;
use fg_core::properties::FieldEdit;
use fg_core::registry::FieldType;
use fg_core::snapshot;
use fg_core::store::PlacementCommand;
use fg_editor::config::EditorConfig;
use fg_editor::drag::DragGesture;
use fg_editor::editor::FormEditor;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The WASM-facing editor handle.
///
/// Owns the `FormEditor`. Canvas and preview in the webview both render
/// from `current_grid_json()`, so they can never disagree.
#[wasm_bindgen]
pub struct FormCanvas {
    editor: FormEditor,
}

#[wasm_bindgen]
impl FormCanvas {
    /// Create an editor. `config_json` may be empty; unknown or malformed
    /// settings fall back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("{e}; using default editor config");
                EditorConfig::default()
            })
        };
        Self {
            editor: FormEditor::new(config),
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Replace the form with a stored `{ fields, layoutSettings }` snapshot.
    /// Returns `false` (and keeps the current form) on malformed JSON.
    pub fn load_snapshot(&mut self, json: &str) -> bool {
        match self.editor.load_json(json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    /// The current form as a snapshot, for the persistence collaborator.
    pub fn snapshot(&self) -> String {
        self.editor.to_json().unwrap_or_default()
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    /// Feed one completed drag gesture (`DragGesture` JSON).
    /// Returns `true` if the form changed.
    pub fn handle_drag(&mut self, gesture_json: &str) -> bool {
        match serde_json::from_str::<DragGesture>(gesture_json) {
            Ok(gesture) => self.editor.handle_drag(&gesture),
            Err(e) => {
                log::warn!("bad drag gesture: {e}");
                false
            }
        }
    }

    /// Apply a raw placement command (`PlacementCommand` JSON).
    pub fn apply_command(&mut self, command_json: &str) -> bool {
        match serde_json::from_str::<PlacementCommand>(command_json) {
            Ok(command) => self.editor.apply(command, "Command"),
            Err(e) => {
                log::warn!("bad placement command: {e}");
                false
            }
        }
    }

    /// "Add field" button. Returns the new id, or empty string for an
    /// unknown type.
    pub fn add_field(&mut self, field_type: &str) -> String {
        FieldType::from_identifier(field_type)
            .and_then(|ty| self.editor.add_field(ty))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Apply a `FieldEdit` JSON to the selected field.
    pub fn edit_selected(&mut self, edit_json: &str) -> bool {
        match serde_json::from_str::<FieldEdit>(edit_json) {
            Ok(edit) => self.editor.edit_selected(edit),
            Err(e) => {
                log::warn!("bad field edit: {e}");
                false
            }
        }
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.editor.selected() {
            Some(id) => self.editor.delete_field(id),
            None => false,
        }
    }

    /// Duplicate the selected field and select the copy.
    pub fn duplicate_selected(&mut self) -> bool {
        let Some(id) = self.editor.selected() else {
            return false;
        };
        match self.editor.duplicate_field(id) {
            Some(copy) => self.editor.select(copy),
            None => false,
        }
    }

    /// Append extracted fields (JSON array of `ImportedField`) to the
    /// current page. Returns the new ids as a JSON array.
    pub fn import_fields(&mut self, fields_json: &str) -> String {
        let imported: Vec<ImportedField> = match serde_json::from_str(fields_json) {
            Ok(fields) => fields,
            Err(e) => {
                log::warn!("bad imported fields: {e}");
                return "[]".to_string();
            }
        };
        let ids = self.editor.import_fields(imported);
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Rows & pages ────────────────────────────────────────────────────

    /// Add a row to `page`. `columns == 0` uses the configured default.
    pub fn add_row(&mut self, page: usize, columns: usize) -> bool {
        let columns = (columns > 0).then_some(columns);
        self.editor.add_row(page, columns).is_some()
    }

    /// Returns the index of the new (now current) page.
    pub fn add_page(&mut self) -> usize {
        self.editor.add_page()
    }

    pub fn remove_page(&mut self, index: usize) -> bool {
        self.editor.remove_page(index)
    }

    pub fn set_current_page(&mut self, index: usize) -> bool {
        self.editor.set_current_page(index)
    }

    pub fn current_page(&self) -> usize {
        self.editor.state().current_page()
    }

    pub fn page_count(&self) -> usize {
        self.editor.state().page_count()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select a field by id. An empty id clears the selection.
    pub fn select_by_id(&mut self, field_id: &str) -> bool {
        if field_id.is_empty() {
            self.editor.clear_selection();
            return true;
        }
        self.editor.select(FieldId::intern(field_id))
    }

    /// The selected field id, or empty string if none.
    pub fn get_selected_id(&self) -> String {
        self.editor
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// The selected field for the properties panel, or `null`.
    pub fn get_selected_field_json(&self) -> String {
        to_json_or(&self.editor.selected_field(), "null")
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// The materialized grid of `page`.
    pub fn grid_json(&self, page: usize) -> String {
        to_json_or(&self.editor.grid(page), "{}")
    }

    pub fn current_grid_json(&self) -> String {
        to_json_or(&self.editor.current_grid(), "{}")
    }

    /// Placement diagnostics as a JSON array.
    pub fn lint_json(&self) -> String {
        to_json_or(&self.editor.lint(), "[]")
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo().is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo().is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }
}

fn to_json_or<T: Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("serialization error: {e}");
        fallback.to_string()
    })
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FG WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no editor needed) ─────────────────────────────

/// Check a stored snapshot. Returns JSON
/// `{"ok":true,"repaired":N}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_snapshot(json: &str) -> String {
    let result = serde_json::from_str::<FormState>(json)
        .map_err(|e| format!("snapshot decode error: {e}"))
        .map(|mut state| snapshot::repair(&mut state));
    let value = match result {
        Ok(repaired) => serde_json::json!({ "ok": true, "repaired": repaired }),
        Err(error) => serde_json::json!({ "ok": false, "error": error }),
    };
    value.to_string()
}

/// The field palette: every type with its default label, for the sidebar.
#[wasm_bindgen]
pub fn field_palette_json() -> String {
    let items: Vec<serde_json::Value> = FieldType::ALL
        .iter()
        .map(|ty| {
            serde_json::json!({
                "type": ty.as_str(),
                "label": ty.default_label(),
                "hasOptions": ty.has_options(),
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}
