//! Placement diagnostics for FG forms.
//!
//! Reports invariant violations without modifying the state. Resolver-driven
//! editing never produces any; they show up in hand-edited or legacy
//! snapshots, or after direct store calls that skip row creation.

use crate::id::FieldId;
use crate::model::FormState;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Breaks a model invariant; `snapshot::repair` would change the state.
    Warning,
    /// Legal but untidy.
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintDiagnostic {
    /// The field concerned, if the finding is about one.
    pub field_id: Option<FieldId>,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-row", "position-tie").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all placement rules and return diagnostics.
#[must_use]
pub fn lint_placement(state: &FormState) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_current_page(state, &mut diags);
    lint_duplicate_ids(state, &mut diags);
    lint_containment(state, &mut diags);
    lint_options(state, &mut diags);
    lint_position_ties(state, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_current_page(state: &FormState, diags: &mut Vec<LintDiagnostic>) {
    let count = state.page_count();
    if count == 0 || state.current_page() >= count {
        diags.push(LintDiagnostic {
            field_id: None,
            message: format!(
                "Current page {} is out of range for {count} page(s).",
                state.current_page()
            ),
            severity: LintSeverity::Warning,
            rule: "current-page",
        });
    }
}

fn lint_duplicate_ids(state: &FormState, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for field in &state.fields {
        if !seen.insert(field.id) {
            diags.push(LintDiagnostic {
                field_id: Some(field.id),
                message: format!("Field id `{}` is used more than once.", field.id),
                severity: LintSeverity::Warning,
                rule: "duplicate-id",
            });
        }
    }
}

/// Every field's page must exist, and its row (if any) must exist on that page.
fn lint_containment(state: &FormState, diags: &mut Vec<LintDiagnostic>) {
    for field in &state.fields {
        let Some(page) = state.page(field.page) else {
            diags.push(LintDiagnostic {
                field_id: Some(field.id),
                message: format!("Field `{}` is on missing page {}.", field.id, field.page),
                severity: LintSeverity::Warning,
                rule: "dangling-page",
            });
            continue;
        };
        if let Some(row) = field.row
            && row >= page.rows.len()
        {
            diags.push(LintDiagnostic {
                field_id: Some(field.id),
                message: format!(
                    "Field `{}` refers to row {row}, but page {} has {} row(s).",
                    field.id,
                    field.page,
                    page.rows.len()
                ),
                severity: LintSeverity::Warning,
                rule: "dangling-row",
            });
        }
    }
}

fn lint_options(state: &FormState, diags: &mut Vec<LintDiagnostic>) {
    for field in &state.fields {
        let has = field.options.is_some();
        let wants = field.field_type.has_options();
        if has != wants {
            let message = if wants {
                format!("Choice field `{}` has no options list.", field.id)
            } else {
                format!("`{}` field `{}` carries options.", field.field_type, field.id)
            };
            diags.push(LintDiagnostic {
                field_id: Some(field.id),
                message,
                severity: LintSeverity::Warning,
                rule: "options-shape",
            });
        }
    }
}

/// Ties are legal (array order breaks them) but usually mean a drop
/// landed on an occupied slot.
fn lint_position_ties(state: &FormState, diags: &mut Vec<LintDiagnostic>) {
    let mut slots: HashMap<(usize, Option<usize>, usize), FieldId> = HashMap::new();
    for field in &state.fields {
        let key = (field.page, field.row, field.position);
        if let Some(first) = slots.get(&key) {
            diags.push(LintDiagnostic {
                field_id: Some(field.id),
                message: format!(
                    "Field `{}` shares position {} with `{first}`.",
                    field.id, field.position
                ),
                severity: LintSeverity::Info,
                rule: "position-tie",
            });
        } else {
            slots.insert(key, field.id);
        }
    }
}
