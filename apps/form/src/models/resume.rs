use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::migration::{
    lenient_bool, lenient_level, lenient_record, lenient_seq, lenient_string,
};

/// The whole résumé being edited. One instance per session, owned by `AppState`.
///
/// Every field is defaultable so that records written by older versions load
/// without error; see `models::migration` for the coercion rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(deserialize_with = "lenient_record")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "lenient_record")]
    pub public_links: PublicLinks,
    #[serde(deserialize_with = "lenient_seq")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "lenient_seq")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "lenient_seq")]
    pub skills: Vec<SkillEntry>,
    #[serde(deserialize_with = "lenient_seq")]
    pub projects: Vec<ProjectEntry>,
    #[serde(deserialize_with = "lenient_seq")]
    pub certifications: Vec<CertificationEntry>,
    #[serde(deserialize_with = "lenient_seq")]
    pub internships: Vec<InternshipEntry>,
    #[serde(deserialize_with = "lenient_seq")]
    pub hobbies: Vec<HobbyEntry>,
    #[serde(deserialize_with = "lenient_seq")]
    pub languages: Vec<LanguageEntry>,
    #[serde(deserialize_with = "lenient_string")]
    pub additional_info: String,
    /// At most one declaration; empty string means "no declaration section".
    #[serde(deserialize_with = "lenient_string")]
    pub declaration: String,
    /// Keys written by newer versions of the form. Kept so they survive a round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: String,
    /// `data:<mime>;base64,...` string, empty when no photo is attached.
    #[serde(deserialize_with = "lenient_string")]
    pub profile_photo: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicLinks {
    #[serde(deserialize_with = "lenient_string")]
    pub github: String,
    #[serde(deserialize_with = "lenient_string")]
    pub linkedin: String,
    #[serde(deserialize_with = "lenient_string")]
    pub portfolio: String,
    #[serde(deserialize_with = "lenient_string")]
    pub website: String,
    #[serde(deserialize_with = "lenient_seq")]
    pub custom: Vec<CustomLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomLink {
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
}

/// Invariant: `current == true` implies `end_date.is_empty()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub job_title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub current: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
}

/// Same `current`/`end_date` invariant as `ExperienceEntry`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub current: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub cgpa: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("unknown skill level '{s}'"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_level")]
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub project_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub issuer: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InternshipEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub organization: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HobbyEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub hobby: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
}
