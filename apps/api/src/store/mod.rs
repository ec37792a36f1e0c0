//! Document-store access behind a trait so the approval state machine can
//! be exercised without a database. Production uses [`postgres::PgStore`];
//! tests use [`memory::MemoryStore`].
//!
//! The store is assumed last-write-wins with no multi-document
//! transactions. The one hard guarantee this core leans on is uniqueness
//! of `application_id` across candidates — that is where double-approval
//! actually gets stopped.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::Application;
use crate::models::candidate::Candidate;
use crate::models::job::{Job, Pipeline};
use crate::models::resume::ParsedResume;
use crate::intake::validator::ResumeValidation;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-constraint violation on candidate.application_id.
    #[error("candidate already exists for this application")]
    DuplicateCandidate,

    #[error("store error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            // 23505 = postgres unique_violation
            if db.code().as_deref() == Some("23505") {
                return StoreError::DuplicateCandidate;
            }
        }
        StoreError::Backend(e.to_string())
    }
}

/// Everything the intake pipeline needs from the document store.
#[async_trait]
pub trait IntakeStore: Send + Sync {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError>;

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError>;

    async fn find_pipeline(&self, id: Uuid) -> Result<Option<Pipeline>, StoreError>;

    /// Fast-path idempotency lookup; the insert constraint is authoritative.
    async fn candidate_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Candidate>, StoreError>;

    /// Inserts a candidate; `DuplicateCandidate` when one already
    /// references the same application.
    async fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError>;

    /// Flips the application to approved, stamping reviewer and time.
    async fn mark_application_approved(
        &self,
        application_id: Uuid,
        reviewed_by: Uuid,
        approved_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Persists the outcome of the parse pipeline: raw text, structured
    /// data, and the validation triad (all three set, or all three None).
    async fn save_parse_results(
        &self,
        application_id: Uuid,
        raw_text: &str,
        parsed: &ParsedResume,
        validation: Option<&ResumeValidation>,
    ) -> Result<(), StoreError>;
}
