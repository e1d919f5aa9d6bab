//! Undo/Redo command stack.
//!
//! `FormState` is replaced as a whole on every change, so history entries
//! are plain before/after snapshots: undo reinstalls `before`, redo
//! reinstalls `after`. No per-command inverse logic is needed.
//!
//! Batches (e.g. an import that appends many fields) collapse every
//! command executed between `begin_batch` and `end_batch` into one step.

use fg_core::model::FormState;
use fg_core::store::PlacementCommand;

/// One undoable step.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub before: FormState,
    pub after: FormState,
    pub description: String,
}

/// Manages undo/redo stacks with batch grouping.
pub struct CommandStack {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// State captured at the start of the outermost batch.
    batch_snapshot: Option<FormState>,
    batch_description: String,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_description: String::new(),
        }
    }

    /// Start a batch group. The outermost call captures the current state.
    pub fn begin_batch(&mut self, state: &FormState, description: &str) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(state.clone());
            self.batch_description = description.to_string();
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes and the state
    /// actually differs, one entry is pushed.
    pub fn end_batch(&mut self, state: &FormState) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return;
        }
        if let Some(before) = self.batch_snapshot.take()
            && before != *state
        {
            let description = std::mem::take(&mut self.batch_description);
            self.push(HistoryEntry {
                before,
                after: state.clone(),
                description,
            });
        }
    }

    /// Apply `command` to `state`, recording it if it changed anything.
    pub fn execute(&mut self, state: &mut FormState, command: PlacementCommand, description: &str) -> bool {
        if self.batch_depth > 0 {
            // The batch snapshot captures the cumulative effect.
            return state.apply(command);
        }

        let before = state.clone();
        if !state.apply(command) {
            return false;
        }
        self.push(HistoryEntry {
            before,
            after: state.clone(),
            description: description.to_string(),
        });
        true
    }

    fn push(&mut self, entry: HistoryEntry) {
        log::debug!("history: {}", entry.description);
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the last step. Returns its description.
    pub fn undo(&mut self, state: &mut FormState) -> Option<String> {
        let entry = self.undo_stack.pop()?;
        *state = entry.before.clone();
        let description = entry.description.clone();
        self.redo_stack.push(entry);
        Some(description)
    }

    /// Redo the last undone step. Returns its description.
    pub fn redo(&mut self, state: &mut FormState) -> Option<String> {
        let entry = self.redo_stack.pop()?;
        *state = entry.after.clone();
        let description = entry.description.clone();
        self.undo_stack.push(entry);
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all history (e.g. after loading a different form).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
    }
}
