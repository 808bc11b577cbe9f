//! Markup for one item of each list section.
//!
//! Item controls carry `data-k` (field key) and `data-i` (item index) so that the
//! UI runtime can route input events back to `CollectionEditor::edit`.

use crate::collection::Section;
use crate::models::{
    CertificationEntry, CustomLink, EducationEntry, ExperienceEntry, HobbyEntry, InternshipEntry,
    LanguageEntry, ProjectEntry, SkillEntry, SkillLevel,
};
use crate::render::escape_html;

struct Input<'a> {
    label: &'a str,
    key: &'a str,
    value: &'a str,
    kind: Option<&'a str>,
    placeholder: Option<&'a str>,
    disabled: bool,
}

impl<'a> Input<'a> {
    fn text(label: &'a str, key: &'a str, value: &'a str) -> Self {
        Input {
            label,
            key,
            value,
            kind: None,
            placeholder: None,
            disabled: false,
        }
    }

    fn date(label: &'a str, key: &'a str, value: &'a str) -> Self {
        Input {
            kind: Some("date"),
            ..Input::text(label, key, value)
        }
    }

    fn url(label: &'a str, key: &'a str, value: &'a str) -> Self {
        Input {
            kind: Some("url"),
            ..Input::text(label, key, value)
        }
    }

    fn placeholder(self, placeholder: &'a str) -> Self {
        Input {
            placeholder: Some(placeholder),
            ..self
        }
    }

    fn disabled(self, disabled: bool) -> Self {
        Input { disabled, ..self }
    }

    fn render(&self, index: usize) -> String {
        let kind = self
            .kind
            .map(|k| format!(" type=\"{k}\""))
            .unwrap_or_default();
        let placeholder = self
            .placeholder
            .map(|p| format!(" placeholder=\"{}\"", escape_html(p)))
            .unwrap_or_default();
        let disabled = if self.disabled { " disabled" } else { "" };
        format!(
            r#"<label>{label} <input class="input"{kind}{placeholder} data-k="{key}" data-i="{index}"{disabled} value="{value}"></label>"#,
            label = self.label,
            key = self.key,
            value = escape_html(self.value),
        )
    }
}

fn textarea(label: &str, key: &str, index: usize, value: &str, rows: u8) -> String {
    format!(
        r#"<label>{label} <textarea class="textarea" data-k="{key}" data-i="{index}" rows="{rows}">{value}</textarea></label>"#,
        value = escape_html(value),
    )
}

fn checkbox(label: &str, key: &str, index: usize, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(
        r#"<label class="full checkbox"><input type="checkbox" data-k="{key}" data-i="{index}"{checked}/> {label}</label>"#
    )
}

fn level_select(index: usize, level: SkillLevel) -> String {
    let options: String = SkillLevel::ALL
        .iter()
        .map(|option| {
            let selected = if *option == level { " selected" } else { "" };
            format!("<option{selected}>{option}</option>")
        })
        .collect();
    format!(
        r#"<label>Level <select class="select" data-k="level" data-i="{index}">{options}</select></label>"#
    )
}

fn row(columns: u8, cells: &[String]) -> String {
    format!(r#"<div class="row row-{columns}">{}</div>"#, cells.concat())
}

fn item_shell(section: Section, index: usize, body: &str) -> String {
    format!(
        r#"<div class="list-item"><div class="list-item-header"><span class="list-item-title">{label} {n}</span><button type="button" class="btn btn-small btn-danger" data-remove="{index}">Remove</button></div>{body}</div>"#,
        label = section.item_label(),
        n = index + 1,
    )
}

pub fn render_experience(i: usize, exp: &ExperienceEntry) -> String {
    let body = [
        row(
            2,
            &[
                Input::text("Job Title", "jobTitle", &exp.job_title).render(i),
                Input::text("Company", "company", &exp.company).render(i),
            ],
        ),
        row(
            3,
            &[
                Input::date("Start Date", "startDate", &exp.start_date).render(i),
                Input::date("End Date", "endDate", &exp.end_date)
                    .disabled(exp.current)
                    .render(i),
                checkbox("Currently working here", "current", i, exp.current),
            ],
        ),
        textarea("Description", "description", i, &exp.description, 3),
    ]
    .concat();
    item_shell(Section::Experience, i, &body)
}

pub fn render_education(i: usize, edu: &EducationEntry) -> String {
    let body = [
        row(
            2,
            &[
                Input::text("Degree/Course", "degree", &edu.degree).render(i),
                Input::text("Institution", "institution", &edu.institution).render(i),
            ],
        ),
        row(
            2,
            &[
                Input::date("Start Date", "startDate", &edu.start_date).render(i),
                Input::date("End Date", "endDate", &edu.end_date)
                    .disabled(edu.current)
                    .render(i),
            ],
        ),
        row(
            2,
            &[checkbox("Currently studying here", "current", i, edu.current)],
        ),
        row(2, &[Input::text("CGPA/Marks", "cgpa", &edu.cgpa).render(i)]),
        textarea("Description", "description", i, &edu.description, 3),
    ]
    .concat();
    item_shell(Section::Education, i, &body)
}

pub fn render_skill(i: usize, skill: &SkillEntry) -> String {
    let body = row(
        3,
        &[
            Input::text("Skill Name", "name", &skill.name).render(i),
            Input::text("Category", "category", &skill.category)
                .placeholder("Programming, Design...")
                .render(i),
            level_select(i, skill.level),
        ],
    );
    item_shell(Section::Skills, i, &body)
}

pub fn render_project(i: usize, project: &ProjectEntry) -> String {
    let body = [
        row(
            2,
            &[
                Input::text("Project Name", "name", &project.name).render(i),
                Input::url("Project URL", "projectUrl", &project.project_url).render(i),
            ],
        ),
        row(
            2,
            &[
                Input::date("Start Date", "startDate", &project.start_date).render(i),
                Input::date("End Date", "endDate", &project.end_date).render(i),
            ],
        ),
        textarea("Description", "description", i, &project.description, 3),
    ]
    .concat();
    item_shell(Section::Projects, i, &body)
}

pub fn render_certification(i: usize, cert: &CertificationEntry) -> String {
    let body = [
        row(
            2,
            &[
                Input::text("Certificate Name", "name", &cert.name).render(i),
                Input::text("Issuer", "issuer", &cert.issuer).render(i),
            ],
        ),
        row(
            2,
            &[
                Input::date("Date", "date", &cert.date).render(i),
                Input::url("Certificate URL", "url", &cert.url)
                    .placeholder("https://example.com/certificate")
                    .render(i),
            ],
        ),
        textarea("Description", "description", i, &cert.description, 2),
    ]
    .concat();
    item_shell(Section::Certifications, i, &body)
}

pub fn render_internship(i: usize, intern: &InternshipEntry) -> String {
    let body = [
        row(
            2,
            &[
                Input::text("Internship Name", "name", &intern.name).render(i),
                Input::text("Organization", "organization", &intern.organization).render(i),
            ],
        ),
        row(
            2,
            &[
                Input::date("Start Date", "startDate", &intern.start_date).render(i),
                Input::date("End Date", "endDate", &intern.end_date).render(i),
            ],
        ),
        textarea("Description", "description", i, &intern.description, 3),
    ]
    .concat();
    item_shell(Section::Internships, i, &body)
}

pub fn render_hobby(i: usize, hobby: &HobbyEntry) -> String {
    item_shell(
        Section::Hobbies,
        i,
        &Input::text("Hobby", "hobby", &hobby.hobby).render(i),
    )
}

pub fn render_language(i: usize, lang: &LanguageEntry) -> String {
    item_shell(
        Section::Languages,
        i,
        &Input::text("Language", "name", &lang.name).render(i),
    )
}

pub fn render_custom_link(i: usize, link: &CustomLink) -> String {
    item_shell(
        Section::CustomLinks,
        i,
        &Input::url("Website URL", "url", &link.url).render(i),
    )
}

/// The declaration is a single removable block, not an indexed item.
pub fn render_declaration(text: &str) -> String {
    format!(
        r#"<div class="list-item"><div class="list-item-header"><span class="list-item-title">Declaration</span><button type="button" class="btn btn-small btn-danger remove-declaration">Remove</button></div><label><textarea class="textarea declaration-input" rows="3" placeholder="Enter your declaration...">{}</textarea></label></div>"#,
        escape_html(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTILE: &str = r#"<script>&"'</script>"#;
    const ESCAPED: &str = "&lt;script&gt;&amp;&quot;&#039;&lt;/script&gt;";

    #[test]
    fn test_hostile_hobby_is_escaped() {
        let html = render_hobby(
            0,
            &HobbyEntry {
                hobby: HOSTILE.to_string(),
            },
        );
        assert!(html.contains(&format!("value=\"{ESCAPED}\"")));
        assert!(!html.contains(HOSTILE));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_hostile_skill_fields_are_escaped() {
        let html = render_skill(
            0,
            &SkillEntry {
                name: HOSTILE.to_string(),
                category: HOSTILE.to_string(),
                level: SkillLevel::Intermediate,
            },
        );
        assert_eq!(html.matches(ESCAPED).count(), 2);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_hostile_project_fields_are_escaped() {
        let html = render_project(
            2,
            &ProjectEntry {
                name: HOSTILE.to_string(),
                description: HOSTILE.to_string(),
                start_date: HOSTILE.to_string(),
                end_date: String::new(),
                project_url: HOSTILE.to_string(),
            },
        );
        assert_eq!(html.matches(ESCAPED).count(), 4);
        assert!(!html.contains("<script>"));
        assert!(html.contains(&format!("rows=\"3\">{ESCAPED}</textarea>")));
    }

    #[test]
    fn test_escaped_value_has_no_raw_metacharacters() {
        let escaped = escape_html(HOSTILE);
        assert!(!escaped.contains(['<', '>', '"', '\'']));
        // every remaining ampersand starts an entity
        for (pos, _) in escaped.match_indices('&') {
            let rest = &escaped[pos..];
            assert!(
                ["&amp;", "&lt;", "&gt;", "&quot;", "&#039;"]
                    .iter()
                    .any(|entity| rest.starts_with(entity)),
                "raw ampersand at {pos}"
            );
        }
    }

    #[test]
    fn test_item_title_is_one_based_and_remove_is_zero_based() {
        let html = render_language(
            4,
            &LanguageEntry {
                name: "Kannada".to_string(),
            },
        );
        assert!(html.contains("Language 5"));
        assert!(html.contains("data-remove=\"4\""));
        assert!(html.contains("data-k=\"name\" data-i=\"4\""));
    }

    #[test]
    fn test_skill_level_selected() {
        let html = render_skill(
            0,
            &SkillEntry {
                level: SkillLevel::Expert,
                ..Default::default()
            },
        );
        assert!(html.contains("<option selected>Expert</option>"));
        assert!(html.contains("<option>Beginner</option>"));
    }

    #[test]
    fn test_current_education_renders_checked_and_disabled() {
        let html = render_education(
            0,
            &EducationEntry {
                current: true,
                ..Default::default()
            },
        );
        assert!(html.contains("data-k=\"current\" data-i=\"0\" checked"));
        assert!(html.contains("data-k=\"endDate\" data-i=\"0\" disabled"));
        assert!(html.contains("Currently studying here"));
    }
}
