//! The whole form view, used to populate the page from the loaded document.

use crate::binder::ScalarField;
use crate::collection::{editor_for, Section};
use crate::models::ResumeDocument;
use crate::render::escape_html;
use crate::render::items::render_declaration;

fn scalar_input(field: ScalarField, doc: &ResumeDocument) -> String {
    let kind = match field {
        ScalarField::Email => "email",
        ScalarField::Phone => "tel",
        ScalarField::Github
        | ScalarField::Linkedin
        | ScalarField::Portfolio
        | ScalarField::Website => "url",
        _ => "text",
    };
    format!(
        r#"<label>{label} <input class="input" type="{kind}" id="{id}" value="{value}"></label>"#,
        label = field.label(),
        id = field.id(),
        value = escape_html(field.get(doc)),
    )
}

fn scalar_textarea(field: ScalarField, doc: &ResumeDocument, rows: u8) -> String {
    format!(
        r#"<label>{label} <textarea class="textarea" id="{id}" rows="{rows}">{value}</textarea></label>"#,
        label = field.label(),
        id = field.id(),
        value = escape_html(field.get(doc)),
    )
}

fn photo_input(doc: &ResumeDocument) -> String {
    let marker = if doc.personal_info.profile_photo.is_empty() {
        ""
    } else {
        r#" data-has-photo="true""#
    };
    format!(
        r#"<label>Profile Photo <input class="input" type="file" accept="image/*" id="profilePhoto"{marker}></label>"#
    )
}

fn action_bar(suffix: &str) -> String {
    format!(
        r#"<div class="actions"><button type="button" class="btn" id="btn-save{suffix}">Save</button><button type="button" class="btn btn-danger" id="btn-clear{suffix}">Clear</button><button type="button" class="btn btn-primary" id="btn-preview{suffix}">Preview</button></div>"#
    )
}

fn add_button_id(section: Section) -> &'static str {
    match section {
        Section::Experience => "addExperience",
        Section::Education => "addEducation",
        Section::Skills => "addSkill",
        Section::Projects => "addProject",
        Section::Certifications => "addCertification",
        Section::Internships => "addInternship",
        Section::Hobbies => "addHobby",
        Section::Languages => "addLanguage",
        Section::CustomLinks => "addCustomLink",
    }
}

fn list_section(section: Section, doc: &ResumeDocument) -> String {
    let list = editor_for(section).render(doc);
    format!(
        r#"<section class="card"><h2>{heading}</h2><div id="{target}">{html}</div><button type="button" class="btn btn-small" id="{add}">+ Add {label}</button></section>"#,
        heading = section.heading(),
        target = list.target,
        html = list.html,
        add = add_button_id(section),
        label = section.item_label(),
    )
}

/// Renders every control with its current value. The declaration block appears
/// only when `declaration_open` is set.
pub fn render_form(doc: &ResumeDocument, declaration_open: bool) -> String {
    let mut html = String::from(r#"<form class="resume-form" autocomplete="off">"#);
    html.push_str(&action_bar(""));

    html.push_str(r#"<section class="card"><h2>Personal Information</h2>"#);
    html.push_str(&scalar_input(ScalarField::FullName, doc));
    html.push_str(&photo_input(doc));
    for field in [ScalarField::Email, ScalarField::Phone, ScalarField::Location] {
        html.push_str(&scalar_input(field, doc));
    }
    html.push_str(&scalar_textarea(ScalarField::Summary, doc, 4));
    html.push_str("</section>");

    html.push_str(r#"<section class="card"><h2>Public Links</h2>"#);
    for field in [
        ScalarField::Github,
        ScalarField::Linkedin,
        ScalarField::Portfolio,
        ScalarField::Website,
    ] {
        html.push_str(&scalar_input(field, doc));
    }
    html.push_str("</section>");
    html.push_str(&list_section(Section::CustomLinks, doc));

    // custom links sit with the public links above
    for section in Section::ALL
        .into_iter()
        .filter(|s| *s != Section::CustomLinks)
    {
        html.push_str(&list_section(section, doc));
    }

    html.push_str(r#"<section class="card"><h2>Additional Information</h2>"#);
    html.push_str(&scalar_textarea(ScalarField::AdditionalInfo, doc, 4));
    html.push_str("</section>");

    let declaration = if declaration_open {
        render_declaration(&doc.declaration)
    } else {
        String::new()
    };
    html.push_str(&format!(
        r#"<section class="card"><h2>Declaration</h2><div id="declarationList">{declaration}</div><button type="button" class="btn btn-small" id="addDeclaration">+ Add Declaration</button></section>"#
    ));

    html.push_str(&action_bar("-2"));
    html.push_str("</form>");
    html
}
