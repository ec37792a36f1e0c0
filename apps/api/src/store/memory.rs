#![allow(dead_code)]

//! In-memory store. Used by unit tests and by local demos without a
//! database; mirrors the Postgres semantics including the unique
//! candidate-per-application constraint.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{IntakeStore, StoreError};
use crate::intake::validator::ResumeValidation;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::candidate::Candidate;
use crate::models::job::{Job, Pipeline};
use crate::models::resume::ParsedResume;

#[derive(Default)]
struct Collections {
    applications: HashMap<Uuid, Application>,
    jobs: HashMap<Uuid, Job>,
    pipelines: HashMap<Uuid, Pipeline>,
    /// Keyed by application_id — the map key is the unique constraint.
    candidates: HashMap<Uuid, Candidate>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_application(&self, application: Application) {
        self.inner
            .lock()
            .expect("store lock")
            .applications
            .insert(application.id, application);
    }

    pub fn seed_job(&self, job: Job) {
        self.inner.lock().expect("store lock").jobs.insert(job.id, job);
    }

    pub fn seed_pipeline(&self, pipeline: Pipeline) {
        self.inner
            .lock()
            .expect("store lock")
            .pipelines
            .insert(pipeline.id, pipeline);
    }

    pub fn candidate_count(&self) -> usize {
        self.inner.lock().expect("store lock").candidates.len()
    }
}

#[async_trait]
impl IntakeStore for MemoryStore {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError> {
        Ok(self
            .inner
            .lock()
            .expect("store lock")
            .applications
            .get(&id)
            .cloned())
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.inner.lock().expect("store lock").jobs.get(&id).cloned())
    }

    async fn find_pipeline(&self, id: Uuid) -> Result<Option<Pipeline>, StoreError> {
        Ok(self
            .inner
            .lock()
            .expect("store lock")
            .pipelines
            .get(&id)
            .cloned())
    }

    async fn candidate_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Candidate>, StoreError> {
        Ok(self
            .inner
            .lock()
            .expect("store lock")
            .candidates
            .get(&application_id)
            .cloned())
    }

    async fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        if inner.candidates.contains_key(&candidate.application_id) {
            return Err(StoreError::DuplicateCandidate);
        }
        inner
            .candidates
            .insert(candidate.application_id, candidate.clone());
        Ok(())
    }

    async fn mark_application_approved(
        &self,
        application_id: Uuid,
        reviewed_by: Uuid,
        approved_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        let application = inner
            .applications
            .get_mut(&application_id)
            .ok_or_else(|| StoreError::Backend("application vanished".to_string()))?;
        application.status = ApplicationStatus::Approved;
        application.reviewed_by = Some(reviewed_by);
        application.approved_at = Some(approved_at);
        application.updated_at = approved_at;
        Ok(())
    }

    async fn save_parse_results(
        &self,
        application_id: Uuid,
        raw_text: &str,
        parsed: &ParsedResume,
        validation: Option<&ResumeValidation>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        let application = inner
            .applications
            .get_mut(&application_id)
            .ok_or_else(|| StoreError::Backend("application vanished".to_string()))?;
        application.resume_raw_text = Some(raw_text.to_string());
        application.parsed_data = Some(parsed.clone());
        application.is_valid_resume = validation.map(|v| v.is_valid);
        application.validation_score = validation.map(|v| v.score);
        application.validation_reason = validation.map(|v| v.reason.clone());
        application.updated_at = Utc::now();
        Ok(())
    }
}
