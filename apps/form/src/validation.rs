use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ResumeDocument;

/// One combined message covering every requirement, shown whatever failed.
pub const REQUIREMENTS_MESSAGE: &str =
    "Please fill: Full Name, valid Email, valid Phone (≥7 digits), and Summary.";

const MIN_PHONE_DIGITS: usize = 7;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    FullName,
    Summary,
    Email,
    Phone,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub passed: bool,
    /// Requirements that failed, in form order. Only used for logging; the user
    /// always sees `REQUIREMENTS_MESSAGE`.
    pub missing: Vec<Requirement>,
}

impl ValidationResult {
    pub fn message(&self) -> Option<&'static str> {
        (!self.passed).then_some(REQUIREMENTS_MESSAGE)
    }
}

/// Checks the minimal fields an applicant-tracking system needs.
///
/// PASS requires all of:
/// - full name non-empty after trimming
/// - summary non-empty after trimming
/// - trimmed email shaped like `local@domain.tld`
/// - at least 7 ASCII digits in the phone number (formatting ignored)
pub fn validate(doc: &ResumeDocument) -> ValidationResult {
    let info = &doc.personal_info;
    let mut missing = Vec::new();

    if info.full_name.trim().is_empty() {
        missing.push(Requirement::FullName);
    }
    if !EMAIL_SHAPE.is_match(info.email.trim()) {
        missing.push(Requirement::Email);
    }
    if phone_digits(&info.phone) < MIN_PHONE_DIGITS {
        missing.push(Requirement::Phone);
    }
    if info.summary.trim().is_empty() {
        missing.push(Requirement::Summary);
    }

    ValidationResult {
        passed: missing.is_empty(),
        missing,
    }
}

fn phone_digits(phone: &str) -> usize {
    phone.chars().filter(|c| c.is_ascii_digit()).count()
}
