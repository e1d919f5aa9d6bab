pub mod commands;
pub mod config;
pub mod drag;
pub mod editor;

pub use commands::CommandStack;
pub use config::EditorConfig;
pub use drag::{ContainerId, DragGesture, DragOutcome, resolve_drag};
pub use editor::FormEditor;
