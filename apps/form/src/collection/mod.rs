//! Add/remove/edit controller for the repeatable list sections.
//!
//! One `CollectionEditor` exists per section. Each is parameterized by the list it
//! edits, a factory for blank items, an item renderer and an optional edit hook
//! for cross-field rules. Structural changes (add/remove) re-render the whole list;
//! field edits mutate in place and only persist. Every operation persists.

pub mod declaration;
pub mod sections;

pub use declaration::DeclarationEditor;
pub use sections::editor_for;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::FormError;
use crate::models::ResumeDocument;
use crate::render::Fragment;
use crate::state::AppState;

/// The repeatable list sections of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Internships,
    Hobbies,
    Languages,
    CustomLinks,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Certifications,
        Section::Internships,
        Section::Hobbies,
        Section::Languages,
        Section::CustomLinks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
            Section::Internships => "internships",
            Section::Hobbies => "hobbies",
            Section::Languages => "languages",
            Section::CustomLinks => "customLinks",
        }
    }

    /// Id of the container element the list renders into.
    pub fn container_id(&self) -> &'static str {
        match self {
            Section::Experience => "experienceList",
            Section::Education => "educationList",
            Section::Skills => "skillsList",
            Section::Projects => "projectsList",
            Section::Certifications => "certificationsList",
            Section::Internships => "internshipsList",
            Section::Hobbies => "hobbiesList",
            Section::Languages => "languagesList",
            Section::CustomLinks => "customLinksList",
        }
    }

    /// Heading of the section card on the form.
    pub fn heading(&self) -> &'static str {
        match self {
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Certifications => "Certifications",
            Section::Internships => "Internships",
            Section::Hobbies => "Hobbies",
            Section::Languages => "Languages",
            Section::CustomLinks => "Other Websites",
        }
    }

    /// Title prefix of a rendered item ("Experience 1", "Website 2", ...).
    pub fn item_label(&self) -> &'static str {
        match self {
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skill",
            Section::Projects => "Project",
            Section::Certifications => "Certification",
            Section::Internships => "Internship",
            Section::Hobbies => "Hobby",
            Section::Languages => "Language",
            Section::CustomLinks => "Website",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value delivered by a form control: text inputs, textareas and selects
/// deliver text, checkboxes deliver a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn into_text(self, section: Section, key: &str) -> Result<String, FormError> {
        match self {
            FieldValue::Text(text) => Ok(text),
            FieldValue::Flag(_) => Err(FormError::WrongValueKind {
                section: section.name(),
                key: key.to_string(),
                expected: "text",
            }),
        }
    }

    pub fn into_flag(self, section: Section, key: &str) -> Result<bool, FormError> {
        match self {
            FieldValue::Flag(flag) => Ok(flag),
            FieldValue::Text(_) => Err(FormError::WrongValueKind {
                section: section.name(),
                key: key.to_string(),
                expected: "a checkbox flag",
            }),
        }
    }
}

/// A change the UI must apply to a control other than the one being edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlUpdate {
    pub section: Section,
    pub index: usize,
    pub key: &'static str,
    pub disabled: bool,
    /// New control value, when the control's content must change too.
    pub value: Option<String>,
}

/// Keyed field assignment for one list item (`item[key] = value`).
pub trait Editable {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError>;
}

/// Intercepts designated keys before the plain assignment.
/// Returns `None` to fall through to `Editable::set_field`.
pub type EditHook<T> =
    fn(&mut T, usize, &str, &FieldValue) -> Option<Result<Vec<ControlUpdate>, FormError>>;

pub struct CollectionEditor<T> {
    pub section: Section,
    pub items: fn(&mut ResumeDocument) -> &mut Vec<T>,
    pub view: fn(&ResumeDocument) -> &[T],
    pub blank: fn() -> T,
    pub render_item: fn(usize, &T) -> String,
    pub on_edit: Option<EditHook<T>>,
}

impl<T: Editable> CollectionEditor<T> {
    /// Appends a blank item, re-renders the list and persists.
    pub fn add(&self, state: &mut AppState) -> Fragment {
        let items = (self.items)(&mut state.document);
        items.push((self.blank)());
        info!("Added {} item #{}", self.section, items.len());
        state.persist();
        self.render(&state.document)
    }

    /// Removes the item at `index`; later items shift down by one.
    /// Out-of-range indices are a logged no-op and return `None`.
    pub fn remove(&self, state: &mut AppState, index: usize) -> Option<Fragment> {
        let items = (self.items)(&mut state.document);
        if index >= items.len() {
            warn!(
                "Ignoring removal of {} item {index}: list has {}",
                self.section,
                items.len()
            );
            return None;
        }
        items.remove(index);
        info!("Removed {} item {index}", self.section);
        state.persist();
        Some(self.render(&state.document))
    }

    /// Writes one field of the item at `index` and persists. No re-render.
    pub fn edit(
        &self,
        state: &mut AppState,
        index: usize,
        key: &str,
        value: FieldValue,
    ) -> Result<Vec<ControlUpdate>, FormError> {
        let items = (self.items)(&mut state.document);
        let len = items.len();
        let item = items.get_mut(index).ok_or(FormError::IndexOutOfRange {
            section: self.section.name(),
            index,
            len,
        })?;

        let hooked = match self.on_edit {
            Some(hook) => hook(item, index, key, &value),
            None => None,
        };
        let controls = match hooked {
            Some(result) => result?,
            None => {
                item.set_field(key, value)?;
                Vec::new()
            }
        };
        debug!("Edited {} item {index} field '{key}'", self.section);
        state.persist();
        Ok(controls)
    }

    /// Full markup of the list, rebuilt from the sequence.
    pub fn render(&self, document: &ResumeDocument) -> Fragment {
        let html = (self.view)(document)
            .iter()
            .enumerate()
            .map(|(i, item)| (self.render_item)(i, item))
            .collect::<String>();
        Fragment::new(self.section.container_id(), html)
    }

    pub fn len(&self, document: &ResumeDocument) -> usize {
        (self.view)(document).len()
    }
}

/// Object-safe view of a `CollectionEditor`, so editors of different item types
/// can be picked by `Section` at runtime.
pub trait SectionEditor: Sync {
    fn add(&self, state: &mut AppState) -> Fragment;
    fn remove(&self, state: &mut AppState, index: usize) -> Option<Fragment>;
    fn edit(
        &self,
        state: &mut AppState,
        index: usize,
        key: &str,
        value: FieldValue,
    ) -> Result<Vec<ControlUpdate>, FormError>;
    fn render(&self, document: &ResumeDocument) -> Fragment;
    fn len(&self, document: &ResumeDocument) -> usize;
}

impl<T: Editable> SectionEditor for CollectionEditor<T> {
    fn add(&self, state: &mut AppState) -> Fragment {
        CollectionEditor::add(self, state)
    }

    fn remove(&self, state: &mut AppState, index: usize) -> Option<Fragment> {
        CollectionEditor::remove(self, state, index)
    }

    fn edit(
        &self,
        state: &mut AppState,
        index: usize,
        key: &str,
        value: FieldValue,
    ) -> Result<Vec<ControlUpdate>, FormError> {
        CollectionEditor::edit(self, state, index, key, value)
    }

    fn render(&self, document: &ResumeDocument) -> Fragment {
        CollectionEditor::render(self, document)
    }

    fn len(&self, document: &ResumeDocument) -> usize {
        CollectionEditor::len(self, document)
    }
}
