//! Structured resume record produced by the oracle structuring call.
//!
//! No field is guaranteed present — the oracle works off best-effort
//! extracted text, so every consumer of these types must tolerate empty
//! strings and empty lists. Defaults are wired through serde so a partial
//! oracle response still deserializes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// One position held, as the oracle reports it. `duration` is free text
/// ("Jan 2020 - Mar 2022", "2019 - Present") — the repair heuristics parse
/// it, they do not trust it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub year: String,
}

/// Full structured resume. Skills are ordered as the oracle emitted them
/// (most prominent first by convention of the structuring prompt).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_resume_tolerates_sparse_json() {
        let parsed: ParsedResume =
            serde_json::from_str(r#"{"skills": ["Rust"], "summary": "Engineer"}"#).unwrap();
        assert_eq!(parsed.skills, vec!["Rust".to_string()]);
        assert_eq!(parsed.summary.as_deref(), Some("Engineer"));
        assert!(parsed.experience.is_empty());
        assert!(parsed.personal_info.name.is_none());
    }

    #[test]
    fn test_parsed_resume_tolerates_empty_object() {
        let parsed: ParsedResume = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ParsedResume::default());
    }
}
