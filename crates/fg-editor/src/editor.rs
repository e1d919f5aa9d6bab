//! Editor controller.
//!
//! `FormEditor` owns the single `FormState` value, the selection, and the
//! undo history. Every change funnels through `apply`, which runs the
//! command against the state and records it; canvas and preview then ask
//! for `current_grid()` and render the same derived structure.

use crate::commands::CommandStack;
use crate::config::EditorConfig;
use crate::drag::{DragGesture, resolve_drag};
use fg_core::id::{FieldId, RowId};
use fg_core::import::ImportedField;
use fg_core::lint::{LintDiagnostic, lint_placement};
use fg_core::materialize::{PageGrid, materialize};
use fg_core::model::{Field, FormState};
use fg_core::properties::FieldEdit;
use fg_core::registry::FieldType;
use fg_core::snapshot;
use fg_core::store::PlacementCommand;

pub struct FormEditor {
    state: FormState,
    selected: Option<FieldId>,
    commands: CommandStack,
    config: EditorConfig,
}

impl Default for FormEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FormEditor {
    /// An editor over a fresh single-page form.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_state(FormState::new(), config)
    }

    pub fn with_state(state: FormState, config: EditorConfig) -> Self {
        Self {
            state,
            selected: None,
            commands: CommandStack::new(config.undo_depth),
            config,
        }
    }

    /// Load a JSON snapshot produced by the persistence collaborator.
    pub fn from_json(text: &str, config: EditorConfig) -> Result<Self, String> {
        Ok(Self::with_state(snapshot::from_json(text)?, config))
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<FieldId> {
        self.selected
    }

    pub fn selected_field(&self) -> Option<&Field> {
        self.selected.and_then(|id| self.state.field(id))
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    // ─── Derived views ───────────────────────────────────────────────────

    pub fn grid(&self, page: usize) -> PageGrid<'_> {
        materialize(&self.state, page)
    }

    /// The grid of the active page, shared by canvas and preview.
    pub fn current_grid(&self) -> PageGrid<'_> {
        self.grid(self.state.current_page())
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_placement(&self.state)
    }

    // ─── Core write path ─────────────────────────────────────────────────

    /// Apply one command and record it in history. Returns `true` if the
    /// state changed.
    ///
    /// Row column counts are clamped to `max_row_columns`, whatever the
    /// command's origin.
    pub fn apply(&mut self, command: PlacementCommand, description: &str) -> bool {
        let command = self.clamp_command(command);
        let changed = self.commands.execute(&mut self.state, command, description);
        if changed {
            self.drop_stale_selection();
        }
        changed
    }

    fn clamp_command(&self, command: PlacementCommand) -> PlacementCommand {
        match command {
            PlacementCommand::AddRow { page, columns } => PlacementCommand::AddRow {
                page,
                columns: self.config.clamp_columns(columns),
            },
            // Zero stays zero: the store treats it as a no-op.
            PlacementCommand::SetRowColumns {
                page,
                row_id,
                columns,
            } if columns > 0 => PlacementCommand::SetRowColumns {
                page,
                row_id,
                columns: self.config.clamp_columns(columns),
            },
            other => other,
        }
    }

    /// Resolve and apply a drag gesture.
    pub fn handle_drag(&mut self, gesture: &DragGesture) -> bool {
        let Some(outcome) = resolve_drag(&self.state, gesture, &self.config) else {
            return false;
        };
        let changed = self.apply(outcome.command, "Drag");
        if changed && let Some(id) = outcome.select {
            self.selected = Some(id);
        }
        changed
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select an existing field. Unknown ids leave the selection alone.
    pub fn select(&mut self, id: FieldId) -> bool {
        if self.state.field(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selected
            && self.state.field(id).is_none()
        {
            self.selected = None;
        }
    }

    // ─── Fields ──────────────────────────────────────────────────────────

    /// "Add field" button: append to the current page's main area and select.
    pub fn add_field(&mut self, field_type: FieldType) -> Option<FieldId> {
        let field = Field::new(FieldId::fresh(), field_type);
        let id = field.id;
        let page = self.state.current_page();
        let command = PlacementCommand::AppendField {
            field: Box::new(field),
            page,
        };
        if !self.apply(command, "Add field") {
            return None;
        }
        self.selected = Some(id);
        Some(id)
    }

    pub fn delete_field(&mut self, id: FieldId) -> bool {
        self.apply(PlacementCommand::RemoveField { id }, "Delete field")
    }

    pub fn duplicate_field(&mut self, id: FieldId) -> Option<FieldId> {
        let new_id = FieldId::fresh();
        self.apply(PlacementCommand::DuplicateField { id, new_id }, "Duplicate field")
            .then_some(new_id)
    }

    pub fn edit_field(&mut self, id: FieldId, edit: FieldEdit) -> bool {
        self.apply(PlacementCommand::EditField { id, edit }, "Edit field")
    }

    /// Edit whatever is selected; no-op without a selection.
    pub fn edit_selected(&mut self, edit: FieldEdit) -> bool {
        match self.selected {
            Some(id) => self.edit_field(id, edit),
            None => false,
        }
    }

    /// Append imported fields to the current page as one undo step.
    pub fn import_fields(&mut self, imported: Vec<ImportedField>) -> Vec<FieldId> {
        self.commands.begin_batch(&self.state, "Import fields");
        let ids = self.state.import_fields(imported);
        self.commands.end_batch(&self.state);
        ids
    }

    // ─── Rows & pages ────────────────────────────────────────────────────

    /// Add a row; `None` columns uses the configured default.
    pub fn add_row(&mut self, page: usize, columns: Option<usize>) -> Option<RowId> {
        let columns = self
            .config
            .clamp_columns(columns.unwrap_or(self.config.default_row_columns));
        let before = self.state.rows_for_page(page).len();
        if !self.apply(PlacementCommand::AddRow { page, columns }, "Add row") {
            return None;
        }
        self.state.rows_for_page(page).get(before).map(|r| r.id)
    }

    pub fn remove_row(&mut self, page: usize, row_id: RowId) -> bool {
        self.apply(PlacementCommand::RemoveRow { page, row_id }, "Delete row")
    }

    pub fn set_row_columns(&mut self, page: usize, row_id: RowId, columns: usize) -> bool {
        let columns = self.config.clamp_columns(columns);
        self.apply(
            PlacementCommand::SetRowColumns {
                page,
                row_id,
                columns,
            },
            "Change columns",
        )
    }

    /// Add a page named after the configured prefix and switch to it.
    pub fn add_page(&mut self) -> usize {
        let title = format!(
            "{} {}",
            self.config.page_title_prefix,
            self.state.page_count() + 1
        );
        self.apply(PlacementCommand::AddPage { title: Some(title) }, "Add page");
        self.state.current_page()
    }

    pub fn remove_page(&mut self, index: usize) -> bool {
        self.apply(PlacementCommand::RemovePage { index }, "Delete page")
    }

    pub fn set_current_page(&mut self, index: usize) -> bool {
        self.apply(PlacementCommand::SetCurrentPage { index }, "Switch page")
    }

    pub fn set_page_title(&mut self, index: usize, title: &str) -> bool {
        self.apply(
            PlacementCommand::SetPageTitle {
                index,
                title: title.to_string(),
            },
            "Rename page",
        )
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Option<String> {
        let description = self.commands.undo(&mut self.state)?;
        self.drop_stale_selection();
        Some(description)
    }

    pub fn redo(&mut self) -> Option<String> {
        let description = self.commands.redo(&mut self.state)?;
        self.drop_stale_selection();
        Some(description)
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, String> {
        snapshot::to_json(&self.state)
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>, String> {
        snapshot::to_msgpack(&self.state)
    }

    /// Replace the whole form from a JSON snapshot. History and selection
    /// are reset; on error nothing changes.
    pub fn load_json(&mut self, text: &str) -> Result<(), String> {
        let state = snapshot::from_json(text)?;
        self.state = state;
        self.selected = None;
        self.commands.clear();
        Ok(())
    }
}
