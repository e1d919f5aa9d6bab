//! Drag transition resolver.
//!
//! Turns one completed drag-and-drop gesture into at most one
//! `PlacementCommand`. The resolver is a pure function of the gesture and
//! the current state: it never mutates, never panics, and answers `None`
//! for anything it does not understand. Drag libraries deliver
//! inconsistent intermediate states during fast gestures, so "do nothing"
//! is always a valid answer.
//!
//! ## Decision table (first match wins)
//!
//! | Source | Destination | Result |
//! |--------|-------------|--------|
//! | any | none | no-op |
//! | `layout-palette` | `main-{p}` | add row with parsed column count |
//! | `field-palette` | `row-{r}` | insert new field at index, select it |
//! | `field-palette` | `main-{p}` | append new field to main area |
//! | container | same container | reorder within container |
//! | container | `row-{r}` | move field into row on current page |
//! | container | `main-{p}` | move field into main area of current page |
//! | anything else | | no-op |

use crate::config::EditorConfig;
use fg_core::id::FieldId;
use fg_core::model::{ContainerKey, Field, FormState};
use fg_core::registry::FieldType;
use fg_core::store::PlacementCommand;
use serde::{Deserialize, Serialize};
use winnow::ascii::dec_uint;
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::prelude::*;
use winnow::token::rest;

/// Droppable container identifiers as the canvas names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerId {
    /// The sidebar of field types.
    FieldPalette,
    /// The sidebar of row layouts (1, 2, 3... columns).
    LayoutPalette,
    /// `main-{page}`: a page's unassigned area.
    Main(usize),
    /// `row-{index}`: a row of the current page.
    Row(usize),
    /// Anything unrecognized.
    Unknown,
}

impl ContainerId {
    pub fn parse(s: &str) -> Self {
        container_id.parse(s).unwrap_or(ContainerId::Unknown)
    }

    fn is_canvas(self) -> bool {
        matches!(self, ContainerId::Main(_) | ContainerId::Row(_))
    }
}

/// One completed drag-and-drop gesture, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragGesture {
    pub source_container_id: String,
    /// `None` when the gesture was released outside any container.
    #[serde(default)]
    pub destination_container_id: Option<String>,
    pub dragged_id: String,
    #[serde(default)]
    pub destination_index: usize,
}

impl DragGesture {
    pub fn new(
        source: impl Into<String>,
        destination: Option<&str>,
        dragged_id: impl Into<String>,
        destination_index: usize,
    ) -> Self {
        Self {
            source_container_id: source.into(),
            destination_container_id: destination.map(str::to_string),
            dragged_id: dragged_id.into(),
            destination_index,
        }
    }
}

/// What a gesture resolves to: one command, and optionally a field to select.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    pub command: PlacementCommand,
    pub select: Option<FieldId>,
}

impl From<PlacementCommand> for DragOutcome {
    fn from(command: PlacementCommand) -> Self {
        Self {
            command,
            select: None,
        }
    }
}

/// Resolve a gesture against `state`. `None` means "leave everything as is".
#[must_use]
pub fn resolve_drag(
    state: &FormState,
    gesture: &DragGesture,
    config: &EditorConfig,
) -> Option<DragOutcome> {
    let destination = ContainerId::parse(gesture.destination_container_id.as_deref()?);
    let source = ContainerId::parse(&gesture.source_container_id);

    let outcome = match source {
        ContainerId::LayoutPalette => resolve_layout_drop(state, gesture, destination, config),
        ContainerId::FieldPalette => resolve_palette_drop(state, gesture, destination, config),
        _ => resolve_field_move(state, gesture, source, destination),
    };
    if outcome.is_none() {
        log::debug!(
            "drag ignored: {} -> {:?} ({})",
            gesture.source_container_id,
            gesture.destination_container_id,
            gesture.dragged_id
        );
    }
    outcome
}

/// Layout controls only land in a page's main area.
fn resolve_layout_drop(
    state: &FormState,
    gesture: &DragGesture,
    destination: ContainerId,
    config: &EditorConfig,
) -> Option<DragOutcome> {
    let ContainerId::Main(page) = destination else {
        return None;
    };
    if page >= state.page_count() {
        return None;
    }
    let columns = layout_columns.parse(gesture.dragged_id.as_str()).ok()?;
    if columns == 0 {
        return None;
    }
    Some(
        PlacementCommand::AddRow {
            page,
            columns: config.clamp_columns(columns),
        }
        .into(),
    )
}

/// A new field from the sidebar: inserted into a row, or appended to main.
fn resolve_palette_drop(
    state: &FormState,
    gesture: &DragGesture,
    destination: ContainerId,
    config: &EditorConfig,
) -> Option<DragOutcome> {
    let field_type = palette_field.parse(gesture.dragged_id.as_str()).ok()?;
    let mut field = Field::new(FieldId::fresh(), field_type);
    let id = field.id;

    let command = match destination {
        ContainerId::Row(row) => {
            let page = state.current_page();
            if row >= state.rows_for_page(page).len() {
                return None;
            }
            field.page = page;
            field.row = Some(row);
            field.position = gesture.destination_index;
            PlacementCommand::InsertField {
                field: Box::new(field),
            }
        }
        ContainerId::Main(page) if page < state.page_count() => PlacementCommand::AppendField {
            field: Box::new(field),
            page,
        },
        _ => return None,
    };

    Some(DragOutcome {
        command,
        select: config.select_dropped_fields.then_some(id),
    })
}

/// An existing field moving between (or within) canvas containers.
fn resolve_field_move(
    state: &FormState,
    gesture: &DragGesture,
    source: ContainerId,
    destination: ContainerId,
) -> Option<DragOutcome> {
    let field = state
        .fields
        .iter()
        .find(|f| f.id.as_str() == gesture.dragged_id)?;
    let page = state.current_page();
    let index = gesture.destination_index;

    if source == destination && destination.is_canvas() {
        return reorder(state, field, destination, index).map(DragOutcome::from);
    }

    let command = match destination {
        ContainerId::Row(row) => {
            if row >= state.rows_for_page(page).len() {
                return None;
            }
            PlacementCommand::MoveFieldToRow {
                id: field.id,
                row,
                index,
                page,
            }
        }
        ContainerId::Main(_) => PlacementCommand::MoveFieldToMain {
            id: field.id,
            index,
            page,
        },
        _ => return None,
    };
    Some(command.into())
}

/// Remove the field from its slot and reinsert it at `index` (clamped).
fn reorder(
    state: &FormState,
    field: &Field,
    destination: ContainerId,
    index: usize,
) -> Option<PlacementCommand> {
    let container = field.container();
    let consistent = match (destination, container) {
        (ContainerId::Row(r), ContainerKey::Row { row, .. }) => r == row,
        (ContainerId::Main(_), ContainerKey::Main { .. }) => true,
        _ => false,
    };
    if !consistent {
        return None;
    }

    let mut ordered: Vec<FieldId> = state
        .fields_for_container(container)
        .into_iter()
        .map(|f| f.id)
        .collect();
    let from = ordered.iter().position(|id| *id == field.id)?;
    let before = ordered.clone();
    let moved = ordered.remove(from);
    ordered.insert(index.min(ordered.len()), moved);

    // Same order and already-dense positions: nothing to rewrite.
    let dense = state
        .fields_for_container(container)
        .iter()
        .enumerate()
        .all(|(i, f)| f.position == i);
    if ordered == before && dense {
        return None;
    }
    Some(PlacementCommand::Reorder { container, ordered })
}

// ─── Id grammar ──────────────────────────────────────────────────────────

fn container_id(input: &mut &str) -> ModalResult<ContainerId> {
    alt((
        "field-palette".value(ContainerId::FieldPalette),
        "layout-palette".value(ContainerId::LayoutPalette),
        preceded("main-", dec_uint).map(ContainerId::Main),
        preceded("row-", dec_uint).map(ContainerId::Row),
    ))
    .parse_next(input)
}

/// `2`, `layout-3`, `2-columns`, `layout-1-col`.
fn layout_columns(input: &mut &str) -> ModalResult<usize> {
    delimited(
        opt("layout-"),
        dec_uint,
        opt(alt(("-columns", "-column", "-cols", "-col"))),
    )
    .parse_next(input)
}

/// `text`, `field-select`, `palette-button-group`.
fn palette_field(input: &mut &str) -> ModalResult<FieldType> {
    preceded(
        opt(alt(("field-", "palette-"))),
        rest.verify_map(FieldType::from_identifier),
    )
    .parse_next(input)
}
