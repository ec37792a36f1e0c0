use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intake::scorer::AiScore;
use crate::models::application::ApplicationSource;
use crate::models::resume::{EducationEntry, ExperienceEntry};

/// A hiring-pipeline subject materialized from an approved application.
///
/// All resume-derived fields are a snapshot copy taken at approval time —
/// never a live reference back to the application. After creation the two
/// records evolve independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    /// Provenance link only; uniqueness on this column is the authoritative
    /// guard against double approval.
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub years_of_experience: f64,
    pub ai_score: Option<AiScore>,
    /// None means "not yet staged" — the job had no pipeline, or the
    /// pipeline had no stages.
    pub current_pipeline_stage_id: Option<Uuid>,
    pub source: ApplicationSource,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
