use thiserror::Error;

use crate::notify::Toast;

/// Form-level error type.
/// Every variant is recoverable: `notice()` decides what, if anything, the user sees.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown field '{key}' in {section}")]
    UnknownField { section: &'static str, key: String },

    #[error("Field '{key}' in {section} expects {expected}")]
    WrongValueKind {
        section: &'static str,
        key: String,
        expected: &'static str,
    },

    #[error("No {section} item at index {index} (list has {len})")]
    IndexOutOfRange {
        section: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Field '{key}' in {section} is disabled")]
    FieldDisabled { section: &'static str, key: String },

    #[error("Photo could not be read: {0}")]
    Photo(String),

    #[error("Preview surface could not be opened: {0}")]
    PreviewBlocked(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl FormError {
    /// The user-visible warning for this error, if any.
    ///
    /// Editing mistakes (bad keys, stale indices) come from the UI layer itself,
    /// so they are logged rather than shown.
    pub fn notice(&self) -> Option<Toast> {
        match self {
            FormError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                Some(Toast::warning(
                    "Unable to save to local storage. Check storage settings.",
                ))
            }
            FormError::QuotaExceeded { needed, quota } => {
                tracing::error!("Storage quota exceeded: {needed} > {quota}");
                Some(Toast::warning(
                    "Unable to save to local storage. Check storage settings.",
                ))
            }
            FormError::Serialization(e) => {
                tracing::error!("Serialization error: {e}");
                Some(Toast::warning(
                    "Unable to save to local storage. Check storage settings.",
                ))
            }
            FormError::UnknownField { .. }
            | FormError::WrongValueKind { .. }
            | FormError::FieldDisabled { .. }
            | FormError::IndexOutOfRange { .. } => {
                tracing::warn!("Ignoring edit: {self}");
                None
            }
            FormError::Photo(msg) => {
                tracing::warn!("Photo error: {msg}");
                Some(Toast::warning("Could not read the selected photo."))
            }
            FormError::PreviewBlocked(msg) => {
                tracing::warn!("Preview blocked: {msg}");
                Some(Toast::warning("Please allow popups to see preview."))
            }
            FormError::Validation(msg) => Some(Toast::warning(msg.clone())),
        }
    }
}
