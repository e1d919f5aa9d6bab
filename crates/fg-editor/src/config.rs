//! Editor configuration.

use serde::Deserialize;

/// Tunables for `FormEditor` and the drag resolver.
///
/// Every field has a default, so a host can pass a partial JSON object
/// (or nothing at all) and override only what it cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo steps kept. Default: **200**.
    pub undo_depth: usize,

    /// Column count for rows added without an explicit count. Default: **1**.
    pub default_row_columns: usize,

    /// Upper bound for row column counts; layout drops and column edits
    /// asking for more are clamped. Default: **4**.
    pub max_row_columns: usize,

    /// Select a field right after it is created by a palette drop. Default: **true**.
    pub select_dropped_fields: bool,

    /// Title prefix for new pages (`"Page 2"`, `"Page 3"`, ...).
    pub page_title_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_depth: 200,
            default_row_columns: 1,
            max_row_columns: 4,
            select_dropped_fields: true,
            page_title_prefix: "Page".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON override object. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns a readable message if the JSON is malformed or a key has the wrong type.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| format!("config parse error: {e}"))?;
        Ok(config.sanitized())
    }

    /// Clamp a requested column count into `1..=max_row_columns`.
    pub fn clamp_columns(&self, columns: usize) -> usize {
        columns.clamp(1, self.max_row_columns.max(1))
    }

    fn sanitized(mut self) -> Self {
        self.max_row_columns = self.max_row_columns.max(1);
        self.default_row_columns = self.clamp_columns(self.default_row_columns);
        self
    }
}
