//! Undo/redo integration tests.
//!
//! History stores whole-state snapshots, so every undo must restore a
//! state that is deep-equal to the one before the step.

use fg_core::model::FieldOption;
use fg_core::properties::FieldEdit;
use fg_core::registry::FieldType;
use fg_editor::{DragGesture, EditorConfig, FormEditor};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn every_step_undoes_to_the_previous_state() {
    init_logging();
    let mut editor = FormEditor::default();
    let mut history = vec![editor.state().clone()];

    editor.handle_drag(&DragGesture::new("layout-palette", Some("main-0"), "2", 0));
    history.push(editor.state().clone());
    editor.handle_drag(&DragGesture::new("field-palette", Some("row-0"), "checkbox", 0));
    history.push(editor.state().clone());
    let id = editor.selected().unwrap();
    editor.edit_field(id, FieldEdit::SetLabel { label: "Toppings".into() });
    history.push(editor.state().clone());
    editor.edit_field(
        id,
        FieldEdit::AddOption {
            option: FieldOption::plain("Olives"),
        },
    );
    history.push(editor.state().clone());
    editor.add_page();
    history.push(editor.state().clone());
    editor.remove_page(0);
    history.push(editor.state().clone());

    let last = history.pop().unwrap();
    assert_eq!(editor.state(), &last);
    while let Some(expected) = history.pop() {
        assert!(editor.undo().is_some());
        assert_eq!(editor.state(), &expected);
    }
    assert!(!editor.can_undo());

    while editor.redo().is_some() {}
    assert_eq!(editor.state(), &last);
}

#[test]
fn rejected_commands_leave_no_history() {
    init_logging();
    let mut editor = FormEditor::default();
    assert!(!editor.remove_page(0));
    assert!(!editor.set_current_page(3));
    assert!(!editor.handle_drag(&DragGesture::new("field-palette", Some("row-0"), "text", 0)));
    assert!(!editor.can_undo());
}

#[test]
fn undo_depth_comes_from_config() {
    init_logging();
    let mut editor = FormEditor::new(EditorConfig {
        undo_depth: 2,
        ..EditorConfig::default()
    });
    for _ in 0..4 {
        editor.add_field(FieldType::Text);
    }
    assert!(editor.undo().is_some());
    assert!(editor.undo().is_some());
    assert!(editor.undo().is_none());
    assert_eq!(editor.state().fields.len(), 2);
}

#[test]
fn redo_restores_selection_target() {
    init_logging();
    let mut editor = FormEditor::default();
    let id = editor.add_field(FieldType::Select).unwrap();
    assert!(editor.delete_field(id));
    assert!(editor.undo().is_some());
    assert!(editor.select(id));

    assert!(editor.redo().is_some());
    assert_eq!(editor.selected(), None);
    assert!(editor.state().field(id).is_none());
}
