//! Hands the persisted document over to the separate preview surface.
//!
//! The preview reads the same storage key, so the only contract here is
//! "persist before opening".

use std::process::{Command, Stdio};

use tracing::{info, warn};

use crate::errors::FormError;
use crate::state::AppState;
use crate::validation::validate;

/// Opens the rendering surface. Swappable so the form can run headless.
pub trait SurfaceOpener {
    fn open(&self, target: &str) -> Result<(), FormError>;
}

/// Opens the surface with an external program (`xdg-open`, `open`, a browser binary).
///
/// Waits for the program to exit; a non-zero exit means the surface did not open.
pub struct CommandOpener {
    program: String,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>) -> Self {
        CommandOpener {
            program: program.into(),
        }
    }
}

impl SurfaceOpener for CommandOpener {
    fn open(&self, target: &str) -> Result<(), FormError> {
        let status = Command::new(&self.program)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| FormError::PreviewBlocked(format!("{}: {e}", self.program)))?;

        if !status.success() {
            return Err(FormError::PreviewBlocked(format!(
                "{} {target} exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

/// Validates, persists, then opens the preview surface.
///
/// Returns `Ok(false)` without opening when the save failed; the user has already
/// been warned by `AppState::persist` and the preview would show stale data.
pub fn open_preview(state: &mut AppState) -> Result<bool, FormError> {
    let result = validate(&state.document);
    if let Some(message) = result.message() {
        warn!("Preview blocked by validation: {:?}", result.missing);
        return Err(FormError::Validation(message.to_string()));
    }

    if !state.persist() {
        return Ok(false);
    }

    state.opener.open(&state.config.preview_target)?;
    info!("Opened preview at {}", state.config.preview_target);
    Ok(true)
}

/// Records every open instead of launching anything.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingOpener {
    pub opened: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    pub blocked: bool,
}

#[cfg(test)]
impl SurfaceOpener for RecordingOpener {
    fn open(&self, target: &str) -> Result<(), FormError> {
        if self.blocked {
            return Err(FormError::PreviewBlocked("popup blocked".to_string()));
        }
        self.opened.borrow_mut().push(target.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{bind_input, ScalarField};
    use crate::models::ResumeDocument;

    fn fill_required(state: &mut AppState) {
        bind_input(state, ScalarField::FullName, "Asha Rao".into());
        bind_input(state, ScalarField::Summary, "Engineer".into());
        bind_input(state, ScalarField::Email, "a@b.co".into());
        bind_input(state, ScalarField::Phone, "+1 (555) 123-4567".into());
    }

    #[test]
    fn test_invalid_document_blocks_preview() {
        let (mut state, store) = AppState::for_tests();
        let opener = RecordingOpener::default();
        state.opener = Box::new(opener.clone());

        let err = open_preview(&mut state).unwrap_err();
        assert!(matches!(err, FormError::Validation(_)));
        assert!(opener.opened.borrow().is_empty());
        assert_eq!(store.raw("resumeData"), None);
        assert_eq!(state.document, ResumeDocument::default());
    }

    #[test]
    fn test_valid_document_is_persisted_then_opened() {
        let (mut state, store) = AppState::for_tests();
        let opener = RecordingOpener::default();
        state.opener = Box::new(opener.clone());
        fill_required(&mut state);

        assert!(open_preview(&mut state).unwrap());
        assert_eq!(*opener.opened.borrow(), vec!["preview.html".to_string()]);
        let persisted = ResumeDocument::from_persisted(&store.raw("resumeData").unwrap()).unwrap();
        assert_eq!(persisted, state.document);
    }

    #[test]
    fn test_blocked_surface_is_reported_without_state_change() {
        let (mut state, _store) = AppState::for_tests();
        state.opener = Box::new(RecordingOpener {
            blocked: true,
            ..Default::default()
        });
        fill_required(&mut state);
        let before = state.document.clone();

        let err = open_preview(&mut state).unwrap_err();
        assert!(matches!(err, FormError::PreviewBlocked(_)));
        assert_eq!(state.document, before);
        assert!(err.notice().unwrap().message.contains("allow popups"));
    }

    #[test]
    fn test_failed_save_skips_opening() {
        let (mut state, store) = AppState::for_tests();
        let opener = RecordingOpener::default();
        state.opener = Box::new(opener.clone());
        fill_required(&mut state);
        store.set_available(false);

        assert!(!open_preview(&mut state).unwrap());
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn test_opener_exit_status_decides_success() {
        let failing = CommandOpener::new("false");
        assert!(matches!(
            failing.open("preview.html"),
            Err(FormError::PreviewBlocked(_))
        ));
        assert!(CommandOpener::new("true").open("preview.html").is_ok());
    }

    #[test]
    fn test_failing_opener_surfaces_popup_warning() {
        let (mut state, _store) = AppState::for_tests();
        state.opener = Box::new(CommandOpener::new("false"));
        fill_required(&mut state);

        let err = open_preview(&mut state).unwrap_err();
        assert!(err.notice().unwrap().message.contains("allow popups"));
    }

    #[test]
    fn test_missing_opener_program_is_blocked() {
        let opener = CommandOpener::new("/nonexistent/resume-form-opener");
        assert!(matches!(
            opener.open("preview.html"),
            Err(FormError::PreviewBlocked(_))
        ));
    }
}
