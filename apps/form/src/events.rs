//! Event dispatch: the UI runtime delivers one `FormEvent` per user action and
//! gets back what must change on screen.
//!
//! Events are handled one at a time, in order, and none of them waits on I/O
//! other than the synchronous storage write. A photo read runs as a background
//! task; its outcome comes back through `Session::next_photo` and is applied by
//! `Session::complete_photo`, so events keep flowing while the file is read.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::binder::{attach_photo, bind_input, spawn_photo_read, PhotoRead, ScalarField};
use crate::collection::{editor_for, ControlUpdate, DeclarationEditor, FieldValue, Section};
use crate::errors::FormError;
use crate::notify::{ShownToast, Toast};
use crate::preview::open_preview;
use crate::render::{render_form, Fragment};
use crate::state::AppState;

pub const CLEAR_PROMPT: &str = "Clear all fields?";
const FORM_TARGET: &str = "resumeForm";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormEvent {
    /// Input or change event on a scalar control.
    Input { field: ScalarField, value: String },
    /// Change event on the photo control; `path` is absent when nothing was picked.
    AttachPhoto {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Add { section: Section },
    Remove { section: Section, index: usize },
    Edit {
        section: Section,
        index: usize,
        key: String,
        value: FieldValue,
    },
    AddDeclaration,
    RemoveDeclaration,
    EditDeclaration { text: String },
    Save,
    /// Asks for confirmation; answered by `Confirm`.
    Clear,
    Confirm { accepted: bool },
    Preview,
    /// Full form markup, for initial population.
    Render,
}

/// Everything the UI must apply after one event.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub fragments: Vec<Fragment>,
    pub controls: Vec<ControlUpdate>,
    /// Notices raised by this event.
    pub notices: Vec<Toast>,
    /// The full toast stack still on screen.
    pub on_screen: Vec<ShownToast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub opened_preview: bool,
}

pub struct Session {
    pub state: AppState,
    pending_clear: bool,
    photo_tx: UnboundedSender<PhotoRead>,
    photo_rx: UnboundedReceiver<PhotoRead>,
}

impl Session {
    pub fn new(state: AppState) -> Self {
        let (photo_tx, photo_rx) = mpsc::unbounded_channel();
        Session {
            state,
            pending_clear: false,
            photo_tx,
            photo_rx,
        }
    }

    /// Waits for the next background photo read to finish.
    pub async fn next_photo(&mut self) -> Option<PhotoRead> {
        self.photo_rx.recv().await
    }

    /// Applies a finished photo read. Only completion touches the document.
    pub fn complete_photo(&mut self, read: PhotoRead) -> Dispatch {
        if let Err(e) = attach_photo(&mut self.state, read) {
            self.report(e);
        }
        self.finish(Dispatch::default())
    }

    /// Parses and dispatches one JSON-encoded event. Malformed input becomes a
    /// warning notice; the session stays usable.
    pub fn dispatch_line(&mut self, line: &str) -> Dispatch {
        match serde_json::from_str::<FormEvent>(line) {
            Ok(event) => self.dispatch(event),
            Err(e) => {
                warn!("Unrecognized event {line:?}: {e}");
                self.pending_clear = false;
                self.state
                    .notify(Toast::warning(format!("Unrecognized event: {e}")));
                self.finish(Dispatch::default())
            }
        }
    }

    pub fn dispatch(&mut self, event: FormEvent) -> Dispatch {
        // any event other than the answer cancels a pending clear
        let clear_armed = std::mem::take(&mut self.pending_clear);
        let mut out = Dispatch::default();

        if let Err(e) = self.handle(event, clear_armed, &mut out) {
            self.report(e);
        }
        self.finish(out)
    }

    fn report(&mut self, e: FormError) {
        if let Some(toast) = e.notice() {
            self.state.notify(toast);
        }
    }

    fn finish(&mut self, mut out: Dispatch) -> Dispatch {
        out.notices = self.state.take_notices();
        out.on_screen = self.state.toasts.visible(Utc::now());
        out
    }

    fn handle(
        &mut self,
        event: FormEvent,
        clear_armed: bool,
        out: &mut Dispatch,
    ) -> Result<(), FormError> {
        let state = &mut self.state;
        match event {
            FormEvent::Input { field, value } => {
                bind_input(state, field, value);
            }
            FormEvent::AttachPhoto { path: None } => {
                debug!("No photo selected");
            }
            FormEvent::AttachPhoto { path: Some(path) } => {
                spawn_photo_read(path, self.photo_tx.clone());
            }
            FormEvent::Add { section } => {
                out.fragments.push(editor_for(section).add(state));
            }
            FormEvent::Remove { section, index } => {
                out.fragments
                    .extend(editor_for(section).remove(state, index));
            }
            FormEvent::Edit {
                section,
                index,
                key,
                value,
            } => {
                out.controls = editor_for(section).edit(state, index, &key, value)?;
            }
            FormEvent::AddDeclaration => {
                out.fragments.extend(DeclarationEditor::add(state));
            }
            FormEvent::RemoveDeclaration => {
                out.fragments.push(DeclarationEditor::remove(state));
            }
            FormEvent::EditDeclaration { text } => {
                DeclarationEditor::edit(state, text)?;
            }
            FormEvent::Save => {
                state.persist();
            }
            FormEvent::Clear => {
                self.pending_clear = true;
                out.prompt = Some(CLEAR_PROMPT.to_string());
            }
            FormEvent::Confirm { accepted } => {
                if !clear_armed {
                    debug!("Ignoring confirmation with nothing pending");
                } else if accepted {
                    state.clear_all();
                    out.fragments.push(full_form(state));
                } else {
                    info!("Clear cancelled");
                }
            }
            FormEvent::Preview => {
                out.opened_preview = open_preview(state)?;
            }
            FormEvent::Render => {
                out.fragments.push(full_form(state));
            }
        }
        Ok(())
    }
}

fn full_form(state: &AppState) -> Fragment {
    Fragment::new(
        FORM_TARGET,
        render_form(&state.document, state.declaration_open),
    )
}
