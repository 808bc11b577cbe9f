pub mod migration;
pub mod resume;

pub use resume::{
    CertificationEntry, CustomLink, EducationEntry, ExperienceEntry, HobbyEntry, InternshipEntry,
    LanguageEntry, ProjectEntry, ResumeDocument, SkillEntry, SkillLevel,
};
