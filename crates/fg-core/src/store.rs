//! Placement store: queries and layout-affecting mutations on `FormState`.
//!
//! Every mutation validates against the current state before writing and
//! reports whether anything changed. Invalid references (unknown field,
//! row, or page) are no-ops, since a stale id can briefly outlive its
//! field during quick successive edits.

use crate::id::{FieldId, RowId};
use crate::model::*;
use crate::properties::FieldEdit;
use crate::registry::FieldType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single state transition, as data.
///
/// The drag resolver, the property editor, and the wasm host all express
/// their intent as a `PlacementCommand`; `FormState::apply` is the one
/// write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlacementCommand {
    MoveFieldToRow {
        id: FieldId,
        row: usize,
        index: usize,
        page: usize,
    },
    MoveFieldToMain {
        id: FieldId,
        index: usize,
        page: usize,
    },
    Reorder {
        container: ContainerKey,
        ordered: Vec<FieldId>,
    },
    AddRow {
        page: usize,
        columns: usize,
    },
    RemoveRow {
        page: usize,
        row_id: RowId,
    },
    SetRowColumns {
        page: usize,
        row_id: RowId,
        columns: usize,
    },
    AddPage {
        title: Option<String>,
    },
    RemovePage {
        index: usize,
    },
    SetCurrentPage {
        index: usize,
    },
    SetPageTitle {
        index: usize,
        title: String,
    },
    /// Insert a fully placed field as-is (palette → row drops).
    InsertField {
        field: Box<Field>,
    },
    /// Append a field to the end of a page's main area.
    AppendField {
        field: Box<Field>,
        page: usize,
    },
    RemoveField {
        id: FieldId,
    },
    DuplicateField {
        id: FieldId,
        new_id: FieldId,
    },
    EditField {
        id: FieldId,
        edit: FieldEdit,
    },
}

impl FormState {
    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub(crate) fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.layout_settings.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.layout_settings.pages.len()
    }

    pub fn current_page(&self) -> usize {
        self.layout_settings.current_page
    }

    /// Rows of a page in display order. Empty for an unknown page.
    pub fn rows_for_page(&self, page: usize) -> &[Row] {
        self.page(page).map(|p| p.rows.as_slice()).unwrap_or(&[])
    }

    /// Fields of one container in display order.
    ///
    /// Sorted by `position`; the sort is stable so ties keep array order.
    pub fn fields_for_container(&self, container: ContainerKey) -> Vec<&Field> {
        let mut fields: Vec<&Field> = self
            .fields
            .iter()
            .filter(|f| container.contains(f))
            .collect();
        fields.sort_by_key(|f| f.position);
        fields
    }

    pub fn container_len(&self, container: ContainerKey) -> usize {
        self.fields.iter().filter(|f| container.contains(f)).count()
    }

    /// Number of fields in a page's main area.
    pub fn main_len(&self, page: usize) -> usize {
        self.container_len(ContainerKey::Main { page })
    }

    /// Position for a field appended to `container`: its current length.
    ///
    /// Gaps left by literal drops are not compensated; a new field may tie
    /// with, or sort before, a field dropped at a large index.
    pub fn append_position(&self, container: ContainerKey) -> usize {
        self.container_len(container)
    }

    // ─── Field placement ─────────────────────────────────────────────────

    /// Assign a field to row `row` of `page` at `index`.
    ///
    /// Row existence is deliberately not checked: callers create the row
    /// first. The page must exist.
    pub fn move_field_to_row(&mut self, id: FieldId, row: usize, index: usize, page: usize) -> bool {
        self.place_field(id, Some(row), index, page)
    }

    /// Move a field into `page`'s main area at `index`.
    pub fn move_field_to_main(&mut self, id: FieldId, index: usize, page: usize) -> bool {
        self.place_field(id, None, index, page)
    }

    fn place_field(&mut self, id: FieldId, row: Option<usize>, index: usize, page: usize) -> bool {
        if page >= self.page_count() {
            log::debug!("place_field: page {page} out of range");
            return false;
        }
        let Some(field) = self.field_mut(id) else {
            log::debug!("place_field: unknown field {id:?}");
            return false;
        };
        if field.page == page && field.row == row && field.position == index {
            return false;
        }
        field.page = page;
        field.row = row;
        field.position = index;
        true
    }

    /// Rewrite positions of one container to follow `ordered`.
    ///
    /// `ordered` must name exactly the container's current members, each
    /// once; anything else leaves the state untouched.
    pub fn reorder_within_container(&mut self, container: ContainerKey, ordered: &[FieldId]) -> bool {
        let members: HashSet<FieldId> = self
            .fields
            .iter()
            .filter(|f| container.contains(f))
            .map(|f| f.id)
            .collect();
        let requested: HashSet<FieldId> = ordered.iter().copied().collect();
        if requested.len() != ordered.len() || requested != members {
            log::debug!("reorder: id set does not match container {container:?}");
            return false;
        }

        let mut changed = false;
        for (position, id) in ordered.iter().enumerate() {
            if let Some(field) = self.field_mut(*id)
                && field.position != position
            {
                field.position = position;
                changed = true;
            }
        }
        changed
    }

    // ─── Field lifecycle ─────────────────────────────────────────────────

    /// Create a field of `field_type` at the end of `page`'s main area.
    pub fn append_new_field(&mut self, field_type: FieldType, page: usize) -> Option<FieldId> {
        let field = Field::new(FieldId::fresh(), field_type);
        let id = field.id;
        self.append_field(field, page).then_some(id)
    }

    /// Append `field` to the end of `page`'s main area, overriding its placement.
    pub fn append_field(&mut self, mut field: Field, page: usize) -> bool {
        if page >= self.page_count() || self.field(field.id).is_some() {
            log::debug!("append_field: rejected {:?} on page {page}", field.id);
            return false;
        }
        field.page = page;
        field.row = None;
        field.position = self.append_position(ContainerKey::Main { page });
        self.fields.push(field);
        true
    }

    /// Insert a field with the placement it already carries.
    pub fn insert_field(&mut self, field: Field) -> bool {
        if field.page >= self.page_count() || self.field(field.id).is_some() {
            log::debug!("insert_field: rejected {:?}", field.id);
            return false;
        }
        self.fields.push(field);
        true
    }

    pub fn remove_field(&mut self, id: FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        self.fields.len() != before
    }

    /// Copy a field under `new_id` and append the copy to the same container.
    pub fn duplicate_field(&mut self, id: FieldId, new_id: FieldId) -> bool {
        if self.field(new_id).is_some() {
            return false;
        }
        let Some(original) = self.field(id) else {
            log::debug!("duplicate_field: unknown field {id:?}");
            return false;
        };
        let mut copy = original.clone();
        copy.id = new_id;
        copy.position = self.append_position(original.container());
        self.fields.push(copy);
        true
    }

    // ─── Rows ────────────────────────────────────────────────────────────

    /// Append a row to `page`. Returns the new row's id.
    pub fn add_row(&mut self, page: usize, columns: usize) -> Option<RowId> {
        let Some(target) = self.layout_settings.pages.get_mut(page) else {
            log::debug!("add_row: page {page} out of range");
            return None;
        };
        let row = Row::new(columns);
        let id = row.id;
        target.rows.push(row);
        Some(id)
    }

    /// Delete a row. Its fields move to the end of the page's main area in
    /// their row order; fields of later rows keep pointing at their rows.
    pub fn remove_row(&mut self, page: usize, row_id: RowId) -> bool {
        let Some(removed) = self.page(page).and_then(|p| p.row_index(row_id)) else {
            log::debug!("remove_row: {row_id:?} not on page {page}");
            return false;
        };

        let orphans: Vec<FieldId> = self
            .fields_for_container(ContainerKey::Row { page, row: removed })
            .into_iter()
            .map(|f| f.id)
            .collect();
        let base = self.append_position(ContainerKey::Main { page });

        for (offset, id) in orphans.into_iter().enumerate() {
            if let Some(field) = self.field_mut(id) {
                field.row = None;
                field.position = base.saturating_add(offset);
            }
        }
        for field in self.fields.iter_mut().filter(|f| f.page == page) {
            if let Some(row) = field.row.as_mut()
                && *row > removed
            {
                *row -= 1;
            }
        }

        self.layout_settings.pages[page].rows.remove(removed);
        true
    }

    /// Change a row's column count. Fields are not touched; the
    /// materializer redistributes them.
    pub fn update_row_columns(&mut self, page: usize, row_id: RowId, columns: usize) -> bool {
        if columns == 0 {
            return false;
        }
        let Some(row) = self
            .layout_settings
            .pages
            .get_mut(page)
            .and_then(|p| p.rows.iter_mut().find(|r| r.id == row_id))
        else {
            log::debug!("update_row_columns: {row_id:?} not on page {page}");
            return false;
        };
        if row.columns == columns {
            return false;
        }
        row.columns = columns;
        true
    }

    // ─── Pages ───────────────────────────────────────────────────────────

    /// Append a page titled `Page N` and make it current.
    pub fn add_page(&mut self) -> usize {
        let title = format!("Page {}", self.page_count() + 1);
        self.add_page_titled(title)
    }

    /// Append a page with an explicit title and make it current.
    pub fn add_page_titled(&mut self, title: impl Into<String>) -> usize {
        self.layout_settings.pages.push(Page::new(title));
        let index = self.page_count() - 1;
        self.layout_settings.current_page = index;
        index
    }

    /// Remove a page. Refused when it is the only page.
    ///
    /// The page's fields are kept: they are appended to the main area of
    /// the page that takes its place (the previous one, or the new first
    /// page), rows first, then the old main area.
    pub fn remove_page(&mut self, index: usize) -> bool {
        let count = self.page_count();
        if count <= 1 || index >= count {
            log::debug!("remove_page: refused index {index} of {count}");
            return false;
        }

        let heir = if index == 0 { 1 } else { index - 1 };
        let mut orphans: Vec<&Field> = self.fields.iter().filter(|f| f.page == index).collect();
        orphans.sort_by_key(|f| (f.row.unwrap_or(usize::MAX), f.position));
        let orphans: Vec<FieldId> = orphans.into_iter().map(|f| f.id).collect();
        let base = self.append_position(ContainerKey::Main { page: heir });

        for (offset, id) in orphans.into_iter().enumerate() {
            if let Some(field) = self.field_mut(id) {
                field.page = heir;
                field.row = None;
                field.position = base.saturating_add(offset);
            }
        }
        for field in &mut self.fields {
            if field.page > index {
                field.page -= 1;
            }
        }

        self.layout_settings.pages.remove(index);
        let settings = &mut self.layout_settings;
        if settings.current_page > index {
            settings.current_page -= 1;
        }
        settings.current_page = settings.current_page.min(settings.pages.len() - 1);
        true
    }

    pub fn set_current_page(&mut self, index: usize) -> bool {
        if index >= self.page_count() || index == self.current_page() {
            return false;
        }
        self.layout_settings.current_page = index;
        true
    }

    pub fn set_page_title(&mut self, index: usize, title: impl Into<String>) -> bool {
        let title = title.into();
        match self.layout_settings.pages.get_mut(index) {
            Some(page) if page.title != title => {
                page.title = title;
                true
            }
            _ => false,
        }
    }

    // ─── Command dispatch ────────────────────────────────────────────────

    /// Apply one command. Returns `true` if the state changed.
    pub fn apply(&mut self, command: PlacementCommand) -> bool {
        let changed = match command {
            PlacementCommand::MoveFieldToRow {
                id,
                row,
                index,
                page,
            } => self.move_field_to_row(id, row, index, page),
            PlacementCommand::MoveFieldToMain { id, index, page } => {
                self.move_field_to_main(id, index, page)
            }
            PlacementCommand::Reorder { container, ordered } => {
                self.reorder_within_container(container, &ordered)
            }
            PlacementCommand::AddRow { page, columns } => self.add_row(page, columns).is_some(),
            PlacementCommand::RemoveRow { page, row_id } => self.remove_row(page, row_id),
            PlacementCommand::SetRowColumns {
                page,
                row_id,
                columns,
            } => self.update_row_columns(page, row_id, columns),
            PlacementCommand::AddPage { title } => {
                match title {
                    Some(title) => self.add_page_titled(title),
                    None => self.add_page(),
                };
                true
            }
            PlacementCommand::RemovePage { index } => self.remove_page(index),
            PlacementCommand::SetCurrentPage { index } => self.set_current_page(index),
            PlacementCommand::SetPageTitle { index, title } => self.set_page_title(index, title),
            PlacementCommand::InsertField { field } => self.insert_field(*field),
            PlacementCommand::AppendField { field, page } => self.append_field(*field, page),
            PlacementCommand::RemoveField { id } => self.remove_field(id),
            PlacementCommand::DuplicateField { id, new_id } => self.duplicate_field(id, new_id),
            PlacementCommand::EditField { id, edit } => self.edit_field(id, edit),
        };
        if changed {
            log::trace!("applied placement command");
        }
        changed
    }
}
