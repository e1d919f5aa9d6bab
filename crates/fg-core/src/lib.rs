pub mod id;
pub mod import;
pub mod lint;
pub mod materialize;
pub mod model;
pub mod properties;
pub mod registry;
pub mod snapshot;
pub mod store;

pub use id::{FieldId, PageId, RowId};
pub use import::ImportedField;
pub use lint::{LintDiagnostic, LintSeverity, lint_placement};
pub use materialize::{PageGrid, RenderRow, materialize};
pub use model::*;
pub use properties::FieldEdit;
pub use registry::FieldType;
pub use store::PlacementCommand;
