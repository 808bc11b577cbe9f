use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Longest toast lifetime accepted from the environment (one hour).
pub const MAX_TOAST_TTL_MS: u64 = 60 * 60 * 1000;

/// Form configuration loaded from environment variables (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub storage_quota_bytes: usize,
    pub preview_target: String,
    pub preview_opener: String,
    pub toast_ttl_ms: u64,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(".resume-form"),
            storage_key: "resumeData".to_string(),
            // browsers give local storage roughly 5 MiB per origin
            storage_quota_bytes: 5 * 1024 * 1024,
            preview_target: "preview.html".to_string(),
            preview_opener: "xdg-open".to_string(),
            toast_ttl_ms: 2200,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let toast_ttl_ms = parse_or(&lookup, "FORM_TOAST_TTL_MS", defaults.toast_ttl_ms)?;
        if toast_ttl_ms > MAX_TOAST_TTL_MS {
            bail!("FORM_TOAST_TTL_MS must be at most {MAX_TOAST_TTL_MS}, got {toast_ttl_ms}");
        }

        Ok(Config {
            data_dir: lookup("FORM_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage_key: lookup("FORM_STORAGE_KEY").unwrap_or(defaults.storage_key),
            storage_quota_bytes: parse_or(
                &lookup,
                "FORM_STORAGE_QUOTA_BYTES",
                defaults.storage_quota_bytes,
            )?,
            preview_target: lookup("FORM_PREVIEW_TARGET").unwrap_or(defaults.preview_target),
            preview_opener: lookup("FORM_PREVIEW_OPENER").unwrap_or(defaults.preview_opener),
            toast_ttl_ms,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}
