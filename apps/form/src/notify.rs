//! Transient on-screen notices ("toasts").
//!
//! Save acknowledgments coalesce: while a "Saved" toast is still visible, another
//! save only pushes its expiry forward. Warnings always stack.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MAX_TOAST_TTL_MS;

const SAVED_TITLE: &str = "Saved";
const SAVED_MESSAGE: &str = "Your progress has been saved locally.";
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn saved() -> Self {
        Toast {
            level: ToastLevel::Info,
            title: SAVED_TITLE.to_string(),
            message: SAVED_MESSAGE.to_string(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Toast {
            level: ToastLevel::Warning,
            title: "Warning".to_string(),
            message: message.into(),
        }
    }

    fn is_save_ack(&self) -> bool {
        self.level == ToastLevel::Info && self.title == SAVED_TITLE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShownToast {
    #[serde(flatten)]
    pub toast: Toast,
    pub shown_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ToastLog {
    ttl: Duration,
    shown: VecDeque<ShownToast>,
}

impl ToastLog {
    pub fn new(ttl_ms: u64) -> Self {
        ToastLog {
            ttl: Duration::milliseconds(ttl_ms.min(MAX_TOAST_TTL_MS) as i64),
            shown: VecDeque::new(),
        }
    }

    /// Shows `toast` at `now`. Returns `false` when it was merged into a visible save toast.
    pub fn show(&mut self, toast: Toast, now: DateTime<Utc>) -> bool {
        self.expire(now);

        if toast.is_save_ack() {
            let expires_at = self.expiry(now);
            if let Some(existing) = self.shown.iter_mut().find(|s| s.toast.is_save_ack()) {
                existing.expires_at = expires_at;
                return false;
            }
        }

        match toast.level {
            ToastLevel::Info => info!("{}: {}", toast.title, toast.message),
            ToastLevel::Warning => warn!("{}: {}", toast.title, toast.message),
        }

        if self.shown.len() == MAX_VISIBLE {
            self.shown.pop_front();
        }
        self.shown.push_back(ShownToast {
            toast,
            shown_at: now,
            expires_at: self.expiry(now),
        });
        true
    }

    /// Toasts still on screen at `now`, oldest first.
    pub fn visible(&mut self, now: DateTime<Utc>) -> Vec<ShownToast> {
        self.expire(now);
        self.shown.iter().cloned().collect()
    }

    fn expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl).unwrap_or(now)
    }

    fn expire(&mut self, now: DateTime<Utc>) {
        self.shown.retain(|s| s.expires_at > now);
    }
}
