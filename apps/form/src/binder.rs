//! Two-way binding between scalar form controls and document attributes.
//!
//! Every input or change event writes the attribute and persists immediately;
//! there is no debounce.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::errors::FormError;
use crate::models::ResumeDocument;
use crate::state::AppState;

const SVG_MIME: &str = "image/svg+xml";
/// How far into a file to look for an `<svg` root element.
const SVG_SNIFF_LEN: usize = 1024;

/// The single-valued text controls of the form, named by their element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarField {
    FullName,
    Email,
    Phone,
    Location,
    Summary,
    Github,
    Linkedin,
    Portfolio,
    Website,
    AdditionalInfo,
}

impl ScalarField {
    pub fn id(&self) -> &'static str {
        match self {
            ScalarField::FullName => "fullName",
            ScalarField::Email => "email",
            ScalarField::Phone => "phone",
            ScalarField::Location => "location",
            ScalarField::Summary => "summary",
            ScalarField::Github => "github",
            ScalarField::Linkedin => "linkedin",
            ScalarField::Portfolio => "portfolio",
            ScalarField::Website => "website",
            ScalarField::AdditionalInfo => "additionalInfo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScalarField::FullName => "Full Name",
            ScalarField::Email => "Email",
            ScalarField::Phone => "Phone",
            ScalarField::Location => "Location",
            ScalarField::Summary => "Professional Summary",
            ScalarField::Github => "GitHub",
            ScalarField::Linkedin => "LinkedIn",
            ScalarField::Portfolio => "Portfolio",
            ScalarField::Website => "Website",
            ScalarField::AdditionalInfo => "Additional Information",
        }
    }

    pub fn get<'a>(&self, doc: &'a ResumeDocument) -> &'a str {
        match self {
            ScalarField::FullName => &doc.personal_info.full_name,
            ScalarField::Email => &doc.personal_info.email,
            ScalarField::Phone => &doc.personal_info.phone,
            ScalarField::Location => &doc.personal_info.location,
            ScalarField::Summary => &doc.personal_info.summary,
            ScalarField::Github => &doc.public_links.github,
            ScalarField::Linkedin => &doc.public_links.linkedin,
            ScalarField::Portfolio => &doc.public_links.portfolio,
            ScalarField::Website => &doc.public_links.website,
            ScalarField::AdditionalInfo => &doc.additional_info,
        }
    }

    fn slot<'a>(&self, doc: &'a mut ResumeDocument) -> &'a mut String {
        match self {
            ScalarField::FullName => &mut doc.personal_info.full_name,
            ScalarField::Email => &mut doc.personal_info.email,
            ScalarField::Phone => &mut doc.personal_info.phone,
            ScalarField::Location => &mut doc.personal_info.location,
            ScalarField::Summary => &mut doc.personal_info.summary,
            ScalarField::Github => &mut doc.public_links.github,
            ScalarField::Linkedin => &mut doc.public_links.linkedin,
            ScalarField::Portfolio => &mut doc.public_links.portfolio,
            ScalarField::Website => &mut doc.public_links.website,
            ScalarField::AdditionalInfo => &mut doc.additional_info,
        }
    }
}

/// Writes one scalar control's value into the document and persists.
pub fn bind_input(state: &mut AppState, field: ScalarField, value: String) -> bool {
    *field.slot(&mut state.document) = value;
    debug!("Updated {}", field.id());
    state.persist()
}

/// Reads an image file and encodes it as a `data:` URI.
///
/// The type is sniffed from the content. SVG has no magic bytes, so it is
/// recognised by its root element.
pub async fn read_photo(path: &Path) -> Result<String, FormError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FormError::Photo(format!("{}: {e}", path.display())))?;

    let mime = match infer::get(&bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => kind.mime_type(),
        Some(kind) => {
            return Err(FormError::Photo(format!(
                "{} is {}, not an image",
                path.display(),
                kind.mime_type()
            )))
        }
        None if looks_like_svg(&bytes) => SVG_MIME,
        None => {
            return Err(FormError::Photo(format!(
                "{} is not a recognised image",
                path.display()
            )))
        }
    };

    Ok(format!(
        "data:{mime};base64,{}",
        general_purpose::STANDARD.encode(&bytes)
    ))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(SVG_SNIFF_LEN)];
    String::from_utf8_lossy(head)
        .to_ascii_lowercase()
        .contains("<svg")
}

/// Outcome of a photo read that ran off the event loop.
#[derive(Debug)]
pub struct PhotoRead {
    pub path: PathBuf,
    pub result: Result<String, FormError>,
}

/// Starts reading `path` in the background. The outcome is sent on `done`, so
/// events keep being handled while the file is read.
pub fn spawn_photo_read(path: PathBuf, done: UnboundedSender<PhotoRead>) {
    debug!("Reading photo {} in the background", path.display());
    tokio::spawn(async move {
        let result = read_photo(&path).await;
        if done.send(PhotoRead { path, result }).is_err() {
            debug!("Photo read finished after the session closed");
        }
    });
}

/// Applies a finished photo read to the document and persists.
///
/// A failed read leaves the document untouched. So does a photo too large for
/// the storage quota.
pub fn attach_photo(state: &mut AppState, read: PhotoRead) -> Result<bool, FormError> {
    let PhotoRead { path, result } = read;
    let data_uri = result?;
    if data_uri.len() > state.config.storage_quota_bytes {
        return Err(FormError::Photo(format!(
            "{} is too large to store ({} bytes encoded)",
            path.display(),
            data_uri.len()
        )));
    }

    state.document.personal_info.profile_photo = data_uri;
    info!("Attached profile photo from {}", path.display());
    Ok(state.persist())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_bind_input_writes_through() {
        let (mut state, store) = AppState::for_tests();
        assert!(bind_input(&mut state, ScalarField::FullName, "Asha Rao".into()));
        assert!(bind_input(&mut state, ScalarField::Github, "https://github.com/asha".into()));
        assert!(bind_input(&mut state, ScalarField::AdditionalInfo, "Open to relocation".into()));

        let reloaded = AppState::over_store(store);
        assert_eq!(reloaded.document.personal_info.full_name, "Asha Rao");
        assert_eq!(reloaded.document.public_links.github, "https://github.com/asha");
        assert_eq!(reloaded.document.additional_info, "Open to relocation");
    }

    #[test]
    fn test_scalar_field_ids_round_trip_through_serde() {
        let field: ScalarField = serde_json::from_str("\"additionalInfo\"").unwrap();
        assert_eq!(field, ScalarField::AdditionalInfo);
        assert_eq!(field.id(), "additionalInfo");
        assert_eq!(
            serde_json::to_string(&ScalarField::FullName).unwrap(),
            "\"fullName\""
        );
    }

    async fn read(path: &Path) -> PhotoRead {
        PhotoRead {
            path: path.to_path_buf(),
            result: read_photo(path).await,
        }
    }

    #[tokio::test]
    async fn test_attach_png_stores_data_uri() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();

        let (mut state, store) = AppState::for_tests();
        assert!(attach_photo(&mut state, read(file.path()).await).unwrap());

        let photo = &state.document.personal_info.profile_photo;
        assert!(photo.starts_with("data:image/png;base64,"));
        assert_eq!(
            general_purpose::STANDARD
                .decode(photo.trim_start_matches("data:image/png;base64,"))
                .unwrap(),
            PNG_HEADER
        );
        assert!(store.raw("resumeData").unwrap().contains("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_non_image_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n").unwrap();

        let (mut state, _store) = AppState::for_tests();
        let err = attach_photo(&mut state, read(file.path()).await).unwrap_err();
        assert!(matches!(err, FormError::Photo(_)));
        assert_eq!(state.document.personal_info.profile_photo, "");
    }

    #[tokio::test]
    async fn test_missing_file_leaves_document_untouched() {
        let (mut state, _store) = AppState::for_tests();
        state.document.personal_info.profile_photo = "data:image/png;base64,AAAA".into();
        let missing = Path::new("/definitely/not/here.png");
        assert!(attach_photo(&mut state, read(missing).await).is_err());
        assert_eq!(
            state.document.personal_info.profile_photo,
            "data:image/png;base64,AAAA"
        );
    }

    #[tokio::test]
    async fn test_unrecognised_content_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"plain words").unwrap();

        let (mut state, store) = AppState::for_tests();
        let err = attach_photo(&mut state, read(file.path()).await).unwrap_err();
        assert!(matches!(err, FormError::Photo(_)));
        assert_eq!(state.document.personal_info.profile_photo, "");
        assert_eq!(store.raw("resumeData"), None);
    }

    #[tokio::test]
    async fn test_svg_is_recognised_by_root_element() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"/>"#)
            .unwrap();
        let uri = read_photo(file.path()).await.unwrap();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_photo_larger_than_quota_is_rejected() {
        let (mut state, store) = AppState::for_tests();
        state.config.storage_quota_bytes = 16;
        let read = PhotoRead {
            path: PathBuf::from("big.png"),
            result: Ok(format!("data:image/png;base64,{}", "A".repeat(64))),
        };
        assert!(attach_photo(&mut state, read).is_err());
        assert_eq!(state.document.personal_info.profile_photo, "");
        assert_eq!(store.raw("resumeData"), None);
    }

    #[tokio::test]
    async fn test_background_read_reports_on_channel() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        spawn_photo_read(file.path().to_path_buf(), tx);
        let done = rx.recv().await.unwrap();
        assert_eq!(done.path, file.path());
        assert!(done.result.unwrap().starts_with("data:image/png;base64,"));
    }
}
