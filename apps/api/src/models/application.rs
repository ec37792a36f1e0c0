#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::resume::ParsedResume;

/// Lifecycle states of an application. Only the `-> Approved` edge is
/// handled by this service; the rest are driven by reviewers elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Shortlisted,
    Rejected,
    Approved,
}

impl ApplicationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

/// Where the application came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationSource {
    Manual,
    DirectApply,
    EmailAutomation,
}

/// A candidate's submission for a job (or unassigned when `job_id` is None).
///
/// The validation triad (`is_valid_resume` / `validation_score` /
/// `validation_reason`) is all-or-nothing: either the validator ran and all
/// three are set, or it was skipped and all three are None.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    pub resume_raw_text: Option<String>,
    pub parsed_data: Option<ParsedResume>,
    pub is_valid_resume: Option<bool>,
    pub validation_score: Option<i16>,
    pub validation_reason: Option<String>,
    pub status: ApplicationStatus,
    pub source: ApplicationSource,
    pub approved_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::Shortlisted).unwrap();
        assert_eq!(json, r#""shortlisted""#);
    }

    #[test]
    fn test_source_round_trips() {
        let src: ApplicationSource = serde_json::from_str(r#""email_automation""#).unwrap();
        assert_eq!(src, ApplicationSource::EmailAutomation);
    }

    #[test]
    fn test_terminal_states() {
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(!ApplicationStatus::Pending.is_terminal());
    }
}
