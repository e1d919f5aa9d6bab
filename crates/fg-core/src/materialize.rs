//! Grid materializer.
//!
//! Derives "what to render" for one page from placement state: the page's
//! rows, each split into column buckets, plus the leftover main-area
//! fields. Used identically by the editing canvas and the live preview.
//!
//! Column membership is not stored on fields. A row's fields, in position
//! order, are dealt into `columns` buckets by `index % columns`, so
//! changing a row's column count never rewrites a field.

use crate::id::RowId;
use crate::model::{ContainerKey, Field, FormState};
use serde::Serialize;

/// One row of the rendered grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRow<'a> {
    pub row_id: RowId,
    pub columns: usize,
    /// `columns` buckets, each in row-relative order.
    pub column_fields: Vec<Vec<&'a Field>>,
}

impl RenderRow<'_> {
    pub fn field_count(&self) -> usize {
        self.column_fields.iter().map(Vec::len).sum()
    }
}

/// The renderable grid of one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGrid<'a> {
    pub rows: Vec<RenderRow<'a>>,
    pub main_fields: Vec<&'a Field>,
}

impl PageGrid<'_> {
    pub fn is_empty(&self) -> bool {
        self.main_fields.is_empty() && self.rows.iter().all(|r| r.field_count() == 0)
    }
}

/// Materialize `page` of `state`. An unknown page yields an empty grid.
///
/// Fields that reference a row index past the end of the page's row list
/// are shown in the main area rather than dropped.
#[must_use]
pub fn materialize(state: &FormState, page: usize) -> PageGrid<'_> {
    let Some(descriptor) = state.page(page) else {
        return PageGrid::default();
    };

    let rows: Vec<RenderRow<'_>> = descriptor
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let columns = row.columns.max(1);
            let mut column_fields: Vec<Vec<&Field>> = vec![Vec::new(); columns];
            let fields = state.fields_for_container(ContainerKey::Row { page, row: index });
            for (i, field) in fields.into_iter().enumerate() {
                column_fields[i % columns].push(field);
            }
            RenderRow {
                row_id: row.id,
                columns,
                column_fields,
            }
        })
        .collect();

    let row_count = descriptor.rows.len();
    let mut main_fields: Vec<&Field> = state
        .fields
        .iter()
        .filter(|f| f.page == page && f.row.is_none_or(|r| r >= row_count))
        .collect();
    main_fields.sort_by_key(|f| f.position);

    log::trace!(
        "materialized page {page}: {} rows, {} main fields",
        rows.len(),
        main_fields.len()
    );

    PageGrid { rows, main_fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FieldId;
    use crate::registry::FieldType;
    use pretty_assertions::assert_eq;

    fn labels(bucket: &[&Field]) -> Vec<String> {
        bucket.iter().map(|f| f.label.clone()).collect()
    }

    /// Page 0 with one row holding f0..f3 in position order.
    fn four_in_a_row(columns: usize) -> FormState {
        let mut state = FormState::new();
        state.add_row(0, columns);
        // Insert out of array order to prove sorting is by position.
        for position in [2, 0, 3, 1] {
            let mut field = Field::new(FieldId::fresh(), FieldType::Text);
            field.label = format!("f{position}");
            field.row = Some(0);
            field.position = position;
            state.insert_field(field);
        }
        state
    }

    #[test]
    fn modulo_distribution_two_columns() {
        let state = four_in_a_row(2);
        let grid = materialize(&state, 0);
        let row = &grid.rows[0];
        assert_eq!(row.columns, 2);
        assert_eq!(labels(&row.column_fields[0]), vec!["f0", "f2"]);
        assert_eq!(labels(&row.column_fields[1]), vec!["f1", "f3"]);
        assert!(grid.main_fields.is_empty());
    }

    #[test]
    fn shrinking_columns_redistributes_without_touching_fields() {
        let mut state = four_in_a_row(2);
        let fields_before = state.fields.clone();
        let row_id = state.rows_for_page(0)[0].id;

        state.update_row_columns(0, row_id, 1);
        let grid = materialize(&state, 0);
        assert_eq!(
            labels(&grid.rows[0].column_fields[0]),
            vec!["f0", "f1", "f2", "f3"]
        );
        assert_eq!(state.fields, fields_before);
    }

    #[test]
    fn more_columns_than_fields_leaves_empty_buckets() {
        let state = four_in_a_row(6);
        let grid = materialize(&state, 0);
        let sizes: Vec<usize> = grid.rows[0].column_fields.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn materialize_is_pure() {
        let state = four_in_a_row(3);
        assert_eq!(materialize(&state, 0), materialize(&state, 0));
    }

    #[test]
    fn main_fields_sorted_by_position() {
        let mut state = FormState::new();
        let a = state.append_new_field(FieldType::Text, 0).unwrap();
        let b = state.append_new_field(FieldType::Email, 0).unwrap();
        state.reorder_within_container(ContainerKey::Main { page: 0 }, &[b, a]);

        let grid = materialize(&state, 0);
        let order: Vec<FieldId> = grid.main_fields.iter().map(|f| f.id).collect();
        assert_eq!(order, vec![b, a]);
        assert!(grid.rows.is_empty());
    }

    #[test]
    fn dangling_row_reference_renders_in_main_area() {
        let mut state = FormState::new();
        let id = state.append_new_field(FieldType::Text, 0).unwrap();
        state.move_field_to_row(id, 4, 0, 0);

        let grid = materialize(&state, 0);
        assert_eq!(grid.main_fields.len(), 1);
        assert_eq!(grid.main_fields[0].id, id);
    }

    #[test]
    fn other_pages_are_excluded() {
        let mut state = FormState::new();
        state.add_page();
        state.append_new_field(FieldType::Text, 1);
        assert!(materialize(&state, 0).is_empty());
        assert_eq!(materialize(&state, 1).main_fields.len(), 1);
        assert!(materialize(&state, 7).is_empty());
    }

    #[test]
    fn grid_serializes_for_renderers() {
        let state = four_in_a_row(2);
        let value = serde_json::to_value(materialize(&state, 0)).unwrap();
        assert_eq!(value["rows"][0]["columns"], 2);
        assert_eq!(value["rows"][0]["columnFields"][1][0]["label"], "f1");
        assert!(value["mainFields"].as_array().unwrap().is_empty());
    }
}
