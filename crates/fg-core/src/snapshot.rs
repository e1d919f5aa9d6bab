//! Persistence snapshots: `{ fields, layoutSettings }` as JSON or MessagePack.
//!
//! Loading is forgiving about content and strict about syntax: malformed
//! bytes are an `Err`, but a well-formed snapshot with inconsistent
//! placement is repaired into a valid state instead of rejected.

use crate::model::{ContainerKey, FormState, LayoutSettings};
use std::collections::HashSet;

/// Encode as camelCase JSON.
pub fn to_json(state: &FormState) -> Result<String, String> {
    serde_json::to_string(state).map_err(|e| format!("snapshot encode error: {e}"))
}

/// Encode as pretty-printed JSON (for fixtures and debugging).
pub fn to_json_pretty(state: &FormState) -> Result<String, String> {
    serde_json::to_string_pretty(state).map_err(|e| format!("snapshot encode error: {e}"))
}

/// Decode a JSON snapshot and repair it.
pub fn from_json(text: &str) -> Result<FormState, String> {
    let mut state: FormState =
        serde_json::from_str(text).map_err(|e| format!("snapshot decode error: {e}"))?;
    repair(&mut state);
    Ok(state)
}

/// Encode as MessagePack with field names, so the layout survives schema growth.
pub fn to_msgpack(state: &FormState) -> Result<Vec<u8>, String> {
    rmp_serde::to_vec_named(state).map_err(|e| format!("snapshot encode error: {e}"))
}

/// Decode a MessagePack snapshot and repair it.
pub fn from_msgpack(bytes: &[u8]) -> Result<FormState, String> {
    let mut state: FormState =
        rmp_serde::from_slice(bytes).map_err(|e| format!("snapshot decode error: {e}"))?;
    repair(&mut state);
    Ok(state)
}

/// Bring a loaded state back within the model's invariants.
///
/// - at least one page exists and `currentPage` indexes it;
/// - row column counts are at least 1;
/// - duplicate field ids keep their first occurrence only;
/// - options match each field's type;
/// - fields on missing pages, or in missing rows, are appended to the
///   relevant main area in their previous order.
///
/// Returns the number of fields whose placement had to change.
pub fn repair(state: &mut FormState) -> usize {
    if state.layout_settings.pages.is_empty() {
        state.layout_settings = LayoutSettings::default();
    }
    let page_count = state.layout_settings.pages.len();
    let settings = &mut state.layout_settings;
    settings.current_page = settings.current_page.min(page_count - 1);
    for row in settings.pages.iter_mut().flat_map(|p| p.rows.iter_mut()) {
        row.columns = row.columns.max(1);
    }

    let mut seen = HashSet::new();
    let before = state.fields.len();
    state.fields.retain(|f| seen.insert(f.id));
    if state.fields.len() != before {
        log::debug!("repair: dropped {} duplicate field ids", before - state.fields.len());
    }

    for field in &mut state.fields {
        field.options = field.field_type.normalize_options(field.options.take());
    }

    // Collect misplaced fields in their current display order, then append.
    let mut misplaced: Vec<(usize, usize, usize)> = state
        .fields
        .iter()
        .enumerate()
        .filter_map(|(index, f)| {
            let page_ok = f.page < page_count;
            let row_ok = f
                .row
                .is_none_or(|r| page_ok && r < state.layout_settings.pages[f.page].rows.len());
            (!page_ok || !row_ok).then_some((f.page, f.position, index))
        })
        .collect();
    misplaced.sort();

    let repaired = misplaced.len();
    for (_, _, index) in misplaced {
        let page = state.fields[index].page.min(page_count - 1);
        let position = state.append_position(ContainerKey::Main { page });
        let field = &mut state.fields[index];
        field.page = page;
        field.row = None;
        field.position = position;
    }
    if repaired > 0 {
        log::debug!("repair: re-homed {repaired} misplaced fields");
    }
    repaired
}
