use tracing::{debug, info};

use crate::errors::FormError;
use crate::render::items::render_declaration;
use crate::render::Fragment;
use crate::state::AppState;

const TARGET: &str = "declarationList";

/// Editor for the declaration: a list restricted to at most one item, backed by
/// the scalar `ResumeDocument::declaration`.
pub struct DeclarationEditor;

impl DeclarationEditor {
    /// Opens the section. A no-op returning `None` when it is already open.
    pub fn add(state: &mut AppState) -> Option<Fragment> {
        if state.declaration_open {
            debug!("Declaration already present");
            return None;
        }
        state.declaration_open = true;
        Some(Self::render(state))
    }

    /// Clears the declaration, empties the section and persists.
    pub fn remove(state: &mut AppState) -> Fragment {
        state.document.declaration.clear();
        state.declaration_open = false;
        info!("Removed declaration");
        state.persist();
        Self::render(state)
    }

    /// Writes the declaration text and persists. Only accepted while the section is open.
    pub fn edit(state: &mut AppState, text: String) -> Result<bool, FormError> {
        if !state.declaration_open {
            return Err(FormError::FieldDisabled {
                section: "declaration",
                key: "declaration".to_string(),
            });
        }
        state.document.declaration = text;
        Ok(state.persist())
    }

    pub fn render(state: &AppState) -> Fragment {
        let html = if state.declaration_open {
            render_declaration(&state.document.declaration)
        } else {
            String::new()
        };
        Fragment::new(TARGET, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_twice_yields_one_section() {
        let (mut state, _store) = AppState::for_tests();
        let first = DeclarationEditor::add(&mut state).unwrap();
        assert!(DeclarationEditor::add(&mut state).is_none());

        let rendered = DeclarationEditor::render(&state);
        assert_eq!(rendered, first);
        assert_eq!(rendered.html.matches("class=\"list-item\"").count(), 1);
    }

    #[test]
    fn test_edit_writes_scalar_and_persists() {
        let (mut state, store) = AppState::for_tests();
        DeclarationEditor::add(&mut state);
        assert!(DeclarationEditor::edit(&mut state, "I hereby declare...".into()).unwrap());
        assert_eq!(state.document.declaration, "I hereby declare...");

        let reloaded = AppState::over_store(store);
        assert_eq!(reloaded.document.declaration, "I hereby declare...");
        assert!(reloaded.declaration_open);
    }

    #[test]
    fn test_remove_clears_and_empties_section() {
        let (mut state, store) = AppState::for_tests();
        DeclarationEditor::add(&mut state);
        DeclarationEditor::edit(&mut state, "I confirm.".into()).unwrap();

        let fragment = DeclarationEditor::remove(&mut state);
        assert_eq!(fragment.html, "");
        assert_eq!(state.document.declaration, "");
        assert!(!AppState::over_store(store).declaration_open);

        // can be added again after removal
        assert!(DeclarationEditor::add(&mut state).is_some());
    }

    #[test]
    fn test_edit_while_closed_is_rejected() {
        let (mut state, _store) = AppState::for_tests();
        assert!(DeclarationEditor::edit(&mut state, "text".into()).is_err());
        assert_eq!(state.document.declaration, "");
    }

    #[test]
    fn test_declaration_text_is_escaped() {
        let (mut state, _store) = AppState::for_tests();
        DeclarationEditor::add(&mut state);
        DeclarationEditor::edit(&mut state, "<b>me</b>".into()).unwrap();
        let html = DeclarationEditor::render(&state).html;
        assert!(html.contains("&lt;b&gt;me&lt;/b&gt;"));
    }
}
