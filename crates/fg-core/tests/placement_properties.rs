//! Integration tests: snapshot → repair → store commands → materialized grid.
//!
//! Exercises the full `fg-core` pipeline on a hand-written legacy snapshot
//! and checks the placement properties that every mutation must keep.

use fg_core::id::FieldId;
use fg_core::lint::{LintSeverity, lint_placement};
use fg_core::materialize::materialize;
use fg_core::model::{ContainerKey, FieldOption, FormState};
use fg_core::registry::FieldType;
use fg_core::snapshot;
use fg_core::store::PlacementCommand;
use pretty_assertions::assert_eq;

fn legacy() -> FormState {
    snapshot::from_json(include_str!("fixtures/legacy_form.json")).expect("fixture loads")
}

fn main_ids(state: &FormState, page: usize) -> Vec<&str> {
    state
        .fields_for_container(ContainerKey::Main { page })
        .into_iter()
        .map(|f| f.id.as_str())
        .collect()
}

fn warnings(state: &FormState) -> Vec<&'static str> {
    lint_placement(state)
        .into_iter()
        .filter(|d| d.severity == LintSeverity::Warning)
        .map(|d| d.rule)
        .collect()
}

// ─── Loading ─────────────────────────────────────────────────────────────

#[test]
fn legacy_snapshot_is_repaired_on_load() {
    let state = legacy();

    assert_eq!(state.current_page(), 1);
    assert_eq!(state.rows_for_page(0)[0].columns, 1);
    assert_eq!(state.fields.len(), 6);
    assert_eq!(
        state.field(FieldId::intern("email")).unwrap().field_type,
        FieldType::Email
    );

    assert_eq!(main_ids(&state, 0), vec!["plan", "extras"]);
    assert_eq!(main_ids(&state, 1), vec!["zip", "notes"]);
    assert!(warnings(&state).is_empty());
}

#[test]
fn options_are_normalized_per_type() {
    let state = legacy();
    let options = |id: &str| state.field(FieldId::intern(id)).unwrap().options.clone();

    assert_eq!(options("plan").map(|o| o.len()), Some(3));
    assert_eq!(options("zip"), None);

    let extras = options("extras").unwrap();
    assert_eq!(extras[0], FieldOption::plain("Gift wrap"));
    assert_eq!(extras[1].label(), "Insurance");
}

#[test]
fn raw_snapshot_lints_what_repair_fixes() {
    let raw: FormState =
        serde_json::from_str(include_str!("fixtures/legacy_form.json")).unwrap();
    let rules = warnings(&raw);
    for rule in ["current-page", "duplicate-id", "dangling-page", "dangling-row", "options-shape"] {
        assert!(rules.contains(&rule), "missing {rule}: {rules:?}");
    }
}

// ─── Grid ────────────────────────────────────────────────────────────────

#[test]
fn materialized_page_draws_every_field_once() {
    let state = legacy();
    for page in 0..state.page_count() {
        let grid = materialize(&state, page);
        let drawn = grid.main_fields.len()
            + grid.rows.iter().map(|r| r.field_count()).sum::<usize>();
        let owned = state.fields.iter().filter(|f| f.page == page).count();
        assert_eq!(drawn, owned, "page {page}");
    }
}

#[test]
fn widening_a_row_spreads_its_fields() {
    let mut state = legacy();
    let row_id = state.rows_for_page(0)[0].id;

    let narrow = materialize(&state, 0);
    assert_eq!(narrow.rows[0].column_fields[0].len(), 2);

    assert!(state.apply(PlacementCommand::SetRowColumns {
        page: 0,
        row_id,
        columns: 2
    }));
    let wide = materialize(&state, 0);
    let columns: Vec<Vec<&str>> = wide.rows[0]
        .column_fields
        .iter()
        .map(|c| c.iter().map(|f| f.id.as_str()).collect())
        .collect();
    assert_eq!(columns, vec![vec!["name"], vec!["email"]]);
}

// ─── Page and row removal ────────────────────────────────────────────────

#[test]
fn removing_a_page_keeps_its_fields() {
    let mut state = legacy();
    assert!(state.apply(PlacementCommand::RemovePage { index: 0 }));

    assert_eq!(state.page_count(), 1);
    assert_eq!(state.current_page(), 0);
    assert_eq!(state.fields.len(), 6);
    assert_eq!(
        main_ids(&state, 0),
        vec!["zip", "notes", "name", "email", "plan", "extras"]
    );
    assert!(state.rows_for_page(0).is_empty());
    assert!(warnings(&state).is_empty());
}

#[test]
fn removing_a_row_keeps_later_rows_intact() {
    let mut state = legacy();
    let second = state.add_row(0, 2).unwrap();
    let moved = FieldId::intern("plan");
    assert!(state.move_field_to_row(moved, 1, 0, 0));

    let first = state.rows_for_page(0)[0].id;
    assert!(state.remove_row(0, first));

    assert_eq!(state.rows_for_page(0)[0].id, second);
    assert_eq!(state.field(moved).unwrap().row, Some(0));
    // Orphans append at the main length; `name` ties with `extras` and
    // wins on array order.
    assert_eq!(main_ids(&state, 0), vec!["name", "extras", "email"]);
    assert!(warnings(&state).is_empty());
}

// ─── Persistence ─────────────────────────────────────────────────────────

#[test]
fn repaired_state_survives_both_encodings() {
    let state = legacy();
    let json = snapshot::to_json(&state).unwrap();
    assert_eq!(snapshot::from_json(&json).unwrap(), state);

    let bytes = snapshot::to_msgpack(&state).unwrap();
    assert_eq!(snapshot::from_msgpack(&bytes).unwrap(), state);
}
