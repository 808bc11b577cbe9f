//! Backfill of persisted records against the current document shape.
//!
//! Persisted JSON may come from any earlier version of the form, so every field
//! is read leniently:
//! - missing or `null` strings become `""`, numbers and booleans are stringified
//! - arrays that are missing or not arrays become `[]`; non-object elements are dropped
//! - nested records that are not objects become their defaults
//! - `current` flags accept booleans only, and a `current` item keeps no end date
//! - unknown skill levels fall back to `Beginner`

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::resume::{ResumeDocument, SkillLevel};

impl ResumeDocument {
    /// Parses a persisted record and backfills every absent or mistyped field.
    ///
    /// Fails only when `raw` is not JSON at all or its root is not an object.
    pub fn from_persisted(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(_) => {
                let mut doc: ResumeDocument = serde_json::from_value(value)?;
                doc.clear_ongoing_end_dates();
                Ok(doc)
            }
            other => Err(serde::de::Error::custom(format!(
                "persisted document root must be an object, found {}",
                kind_of(&other)
            ))),
        }
    }
}

impl ResumeDocument {
    /// Items still in progress have no end date; older records may carry one anyway.
    fn clear_ongoing_end_dates(&mut self) {
        let dated = self
            .experience
            .iter_mut()
            .map(|e| ("experience", e.current, &mut e.end_date))
            .chain(
                self.education
                    .iter_mut()
                    .map(|e| ("education", e.current, &mut e.end_date)),
            );
        for (section, current, end_date) in dated {
            if current && !end_date.is_empty() {
                warn!("Dropping end date '{end_date}' of ongoing {section} item");
                end_date.clear();
            }
        }
    }
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

pub(crate) fn lenient_level<'de, D>(deserializer: D) -> Result<SkillLevel, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => SkillLevel::default(),
    })
}

pub(crate) fn lenient_record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).unwrap_or_default()),
        Value::Null => Ok(T::default()),
        other => {
            warn!("Replacing {} record with defaults", kind_of(&other));
            Ok(T::default())
        }
    }
}

pub(crate) fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| {
                if !item.is_object() {
                    warn!("Dropping {} at position {i}: list items must be objects", kind_of(&item));
                    return None;
                }
                match serde_json::from_value(item) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        warn!("Dropping unreadable list item at position {i}: {e}");
                        None
                    }
                }
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            warn!("Replacing {} with an empty list", kind_of(&other));
            Ok(Vec::new())
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
