//! The nine list sections: field tables, blank-item factories and editor instances.

use crate::collection::{
    CollectionEditor, ControlUpdate, Editable, FieldValue, Section, SectionEditor,
};
use crate::errors::FormError;
use crate::models::{
    CertificationEntry, CustomLink, EducationEntry, ExperienceEntry, HobbyEntry, InternshipEntry,
    LanguageEntry, ProjectEntry, ResumeDocument, SkillEntry, SkillLevel,
};
use crate::render::items;

pub static EXPERIENCE: CollectionEditor<ExperienceEntry> = CollectionEditor {
    section: Section::Experience,
    items: experience_mut,
    view: experience_view,
    blank: ExperienceEntry::default,
    render_item: items::render_experience,
    on_edit: Some(current_toggle::<ExperienceEntry>),
};

pub static EDUCATION: CollectionEditor<EducationEntry> = CollectionEditor {
    section: Section::Education,
    items: education_mut,
    view: education_view,
    blank: EducationEntry::default,
    render_item: items::render_education,
    on_edit: Some(current_toggle::<EducationEntry>),
};

pub static SKILLS: CollectionEditor<SkillEntry> = CollectionEditor {
    section: Section::Skills,
    items: skills_mut,
    view: skills_view,
    blank: SkillEntry::default,
    render_item: items::render_skill,
    on_edit: None,
};

pub static PROJECTS: CollectionEditor<ProjectEntry> = CollectionEditor {
    section: Section::Projects,
    items: projects_mut,
    view: projects_view,
    blank: ProjectEntry::default,
    render_item: items::render_project,
    on_edit: None,
};

pub static CERTIFICATIONS: CollectionEditor<CertificationEntry> = CollectionEditor {
    section: Section::Certifications,
    items: certifications_mut,
    view: certifications_view,
    blank: CertificationEntry::default,
    render_item: items::render_certification,
    on_edit: None,
};

pub static INTERNSHIPS: CollectionEditor<InternshipEntry> = CollectionEditor {
    section: Section::Internships,
    items: internships_mut,
    view: internships_view,
    blank: InternshipEntry::default,
    render_item: items::render_internship,
    on_edit: None,
};

pub static HOBBIES: CollectionEditor<HobbyEntry> = CollectionEditor {
    section: Section::Hobbies,
    items: hobbies_mut,
    view: hobbies_view,
    blank: HobbyEntry::default,
    render_item: items::render_hobby,
    on_edit: None,
};

pub static LANGUAGES: CollectionEditor<LanguageEntry> = CollectionEditor {
    section: Section::Languages,
    items: languages_mut,
    view: languages_view,
    blank: LanguageEntry::default,
    render_item: items::render_language,
    on_edit: None,
};

pub static CUSTOM_LINKS: CollectionEditor<CustomLink> = CollectionEditor {
    section: Section::CustomLinks,
    items: custom_links_mut,
    view: custom_links_view,
    blank: CustomLink::default,
    render_item: items::render_custom_link,
    on_edit: None,
};

pub fn editor_for(section: Section) -> &'static dyn SectionEditor {
    match section {
        Section::Experience => &EXPERIENCE,
        Section::Education => &EDUCATION,
        Section::Skills => &SKILLS,
        Section::Projects => &PROJECTS,
        Section::Certifications => &CERTIFICATIONS,
        Section::Internships => &INTERNSHIPS,
        Section::Hobbies => &HOBBIES,
        Section::Languages => &LANGUAGES,
        Section::CustomLinks => &CUSTOM_LINKS,
    }
}

macro_rules! list_accessors {
    ($($mut_fn:ident, $view_fn:ident => $($field:ident).+ : $item:ty;)*) => {
        $(
            fn $mut_fn(doc: &mut ResumeDocument) -> &mut Vec<$item> {
                &mut doc.$($field).+
            }

            fn $view_fn(doc: &ResumeDocument) -> &[$item] {
                &doc.$($field).+
            }
        )*
    };
}

list_accessors! {
    experience_mut, experience_view => experience: ExperienceEntry;
    education_mut, education_view => education: EducationEntry;
    skills_mut, skills_view => skills: SkillEntry;
    projects_mut, projects_view => projects: ProjectEntry;
    certifications_mut, certifications_view => certifications: CertificationEntry;
    internships_mut, internships_view => internships: InternshipEntry;
    hobbies_mut, hobbies_view => hobbies: HobbyEntry;
    languages_mut, languages_view => languages: LanguageEntry;
    custom_links_mut, custom_links_view => public_links.custom: CustomLink;
}

// ────────────────────────────────────────────────────────────────────────────
// "Currently here" toggle
// ────────────────────────────────────────────────────────────────────────────

/// Items with a "currently here" checkbox that locks the end date.
pub trait Ongoing: Editable {
    const SECTION: Section;
}

impl Ongoing for ExperienceEntry {
    const SECTION: Section = Section::Experience;
}

impl Ongoing for EducationEntry {
    const SECTION: Section = Section::Education;
}

/// Toggling `current` clears and disables the end-date control, and clears the
/// model's `endDate` in the same step. Unchecking re-enables the control but does
/// not bring the old end date back.
fn current_toggle<T: Ongoing>(
    item: &mut T,
    index: usize,
    key: &str,
    value: &FieldValue,
) -> Option<Result<Vec<ControlUpdate>, FormError>> {
    if key != "current" {
        return None;
    }
    let result = value
        .clone()
        .into_flag(T::SECTION, key)
        .and_then(|checked| {
            item.set_field(key, FieldValue::Flag(checked))?;
            Ok(vec![ControlUpdate {
                section: T::SECTION,
                index,
                key: "endDate",
                disabled: checked,
                value: checked.then(String::new),
            }])
        });
    Some(result)
}

// ────────────────────────────────────────────────────────────────────────────
// Keyed field assignment
// ────────────────────────────────────────────────────────────────────────────

fn unknown(section: Section, key: &str) -> FormError {
    FormError::UnknownField {
        section: section.name(),
        key: key.to_string(),
    }
}

/// Shared by both `Ongoing` item types: the end date only takes input while
/// `current` is off, and switching `current` on clears it.
fn set_date_range(
    section: Section,
    current: &mut bool,
    end_date: &mut String,
    key: &str,
    value: FieldValue,
) -> Result<(), FormError> {
    match key {
        "current" => {
            *current = value.into_flag(section, key)?;
            if *current {
                end_date.clear();
            }
        }
        "endDate" => {
            let text = value.into_text(section, key)?;
            if *current && !text.is_empty() {
                return Err(FormError::FieldDisabled {
                    section: section.name(),
                    key: key.to_string(),
                });
            }
            *end_date = text;
        }
        _ => return Err(unknown(section, key)),
    }
    Ok(())
}

impl Editable for ExperienceEntry {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        const S: Section = Section::Experience;
        match key {
            "jobTitle" => self.job_title = value.into_text(S, key)?,
            "company" => self.company = value.into_text(S, key)?,
            "startDate" => self.start_date = value.into_text(S, key)?,
            "description" => self.description = value.into_text(S, key)?,
            "endDate" | "current" => {
                set_date_range(S, &mut self.current, &mut self.end_date, key, value)?
            }
            _ => return Err(unknown(S, key)),
        }
        Ok(())
    }
}

impl Editable for EducationEntry {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        const S: Section = Section::Education;
        match key {
            "degree" => self.degree = value.into_text(S, key)?,
            "institution" => self.institution = value.into_text(S, key)?,
            "startDate" => self.start_date = value.into_text(S, key)?,
            "cgpa" => self.cgpa = value.into_text(S, key)?,
            "description" => self.description = value.into_text(S, key)?,
            "endDate" | "current" => {
                set_date_range(S, &mut self.current, &mut self.end_date, key, value)?
            }
            _ => return Err(unknown(S, key)),
        }
        Ok(())
    }
}

impl Editable for SkillEntry {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        const S: Section = Section::Skills;
        match key {
            "name" => self.name = value.into_text(S, key)?,
            "category" => self.category = value.into_text(S, key)?,
            "level" => {
                self.level = value
                    .into_text(S, key)?
                    .parse::<SkillLevel>()
                    .map_err(|_| FormError::WrongValueKind {
                        section: S.name(),
                        key: key.to_string(),
                        expected: "one of Beginner, Intermediate, Expert",
                    })?
            }
            _ => return Err(unknown(S, key)),
        }
        Ok(())
    }
}

impl Editable for ProjectEntry {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        const S: Section = Section::Projects;
        match key {
            "name" => self.name = value.into_text(S, key)?,
            "description" => self.description = value.into_text(S, key)?,
            "startDate" => self.start_date = value.into_text(S, key)?,
            "endDate" => self.end_date = value.into_text(S, key)?,
            "projectUrl" => self.project_url = value.into_text(S, key)?,
            _ => return Err(unknown(S, key)),
        }
        Ok(())
    }
}

impl Editable for CertificationEntry {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        const S: Section = Section::Certifications;
        match key {
            "name" => self.name = value.into_text(S, key)?,
            "issuer" => self.issuer = value.into_text(S, key)?,
            "date" => self.date = value.into_text(S, key)?,
            "description" => self.description = value.into_text(S, key)?,
            "url" => self.url = value.into_text(S, key)?,
            _ => return Err(unknown(S, key)),
        }
        Ok(())
    }
}

impl Editable for InternshipEntry {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        const S: Section = Section::Internships;
        match key {
            "name" => self.name = value.into_text(S, key)?,
            "organization" => self.organization = value.into_text(S, key)?,
            "startDate" => self.start_date = value.into_text(S, key)?,
            "endDate" => self.end_date = value.into_text(S, key)?,
            "description" => self.description = value.into_text(S, key)?,
            _ => return Err(unknown(S, key)),
        }
        Ok(())
    }
}

impl Editable for HobbyEntry {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        match key {
            "hobby" => self.hobby = value.into_text(Section::Hobbies, key)?,
            _ => return Err(unknown(Section::Hobbies, key)),
        }
        Ok(())
    }
}

impl Editable for LanguageEntry {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        match key {
            "name" => self.name = value.into_text(Section::Languages, key)?,
            _ => return Err(unknown(Section::Languages, key)),
        }
        Ok(())
    }
}

impl Editable for CustomLink {
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        match key {
            "url" => self.url = value.into_text(Section::CustomLinks, key)?,
            _ => return Err(unknown(Section::CustomLinks, key)),
        }
        Ok(())
    }
}
