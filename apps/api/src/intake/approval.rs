//! The approval transition: a pending application becomes a candidate.
//!
//! Order matters. Guards run before any write; the oracle scoring call is
//! the last fallible step before the first write, so a scoring failure
//! leaves no trace. The candidate insert relies on the store's uniqueness
//! of `application_id` — the up-front lookup is a fast path with a better
//! error, not the enforcement mechanism.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::intake::oracle::Oracle;
use crate::intake::repair::{repair_resume, years_of_experience};
use crate::intake::scorer::{self, ScoreError};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::candidate::Candidate;
use crate::models::job::Pipeline;
use crate::store::{IntakeStore, StoreError};

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("application already approved")]
    AlreadyApproved,

    #[error("application not found")]
    ApplicationNotFound,

    #[error("job not found")]
    JobNotFound,

    #[error("pipeline not found")]
    PipelineNotFound,

    #[error(transparent)]
    Scoring(#[from] ScoreError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ApprovalError {
    fn from(e: StoreError) -> Self {
        match e {
            // Lost the insert race to a concurrent approve — same outcome
            // as the fast-path check.
            StoreError::DuplicateCandidate => ApprovalError::AlreadyApproved,
            other => ApprovalError::Store(other),
        }
    }
}

#[derive(Debug, Default)]
pub struct ApproveOptions {
    /// Overrides the job's default pipeline when set.
    pub pipeline_id: Option<Uuid>,
}

#[derive(Debug)]
pub struct ApprovalOutcome {
    pub candidate: Candidate,
    pub application: Application,
}

pub struct ApprovalOrchestrator {
    store: Arc<dyn IntakeStore>,
    oracle: Arc<dyn Oracle>,
}

impl ApprovalOrchestrator {
    pub fn new(store: Arc<dyn IntakeStore>, oracle: Arc<dyn Oracle>) -> Self {
        Self { store, oracle }
    }

    pub async fn approve(
        &self,
        application_id: Uuid,
        job_id: Uuid,
        reviewed_by: Uuid,
        options: ApproveOptions,
    ) -> Result<ApprovalOutcome, ApprovalError> {
        // Guards: all reads, no writes yet.
        if self
            .store
            .candidate_for_application(application_id)
            .await?
            .is_some()
        {
            return Err(ApprovalError::AlreadyApproved);
        }

        let application = self
            .store
            .find_application(application_id)
            .await?
            .ok_or(ApprovalError::ApplicationNotFound)?;

        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or(ApprovalError::JobNotFound)?;

        let pipeline = self.resolve_pipeline(options.pipeline_id, job.default_pipeline_id).await?;
        let stage = pipeline.as_ref().and_then(Pipeline::first_stage);

        // Score before any write so a failure aborts the whole transition.
        let parsed = application.parsed_data.clone().unwrap_or_default();
        let ai_score =
            scorer::score(&parsed, &job.description, &job.requirements, self.oracle.as_ref())
                .await?;

        let now = Utc::now();
        let repaired = repair_resume(&parsed);
        let candidate = Candidate {
            id: Uuid::new_v4(),
            application_id: application.id,
            job_id: job.id,
            name: application.name.clone(),
            email: application.email.clone(),
            phone: application.phone.clone(),
            summary: repaired.summary.clone(),
            skills: repaired.skills.clone(),
            experience: repaired.experience.clone(),
            education: repaired.education.clone(),
            certifications: repaired.certifications.clone(),
            languages: repaired.languages.clone(),
            years_of_experience: years_of_experience(&repaired.experience, now.date_naive()),
            ai_score: Some(ai_score),
            current_pipeline_stage_id: stage.map(|s| s.id),
            source: application.source,
            created_by: reviewed_by,
            created_at: now,
        };

        self.store.insert_candidate(&candidate).await?;
        self.store
            .mark_application_approved(application.id, reviewed_by, now)
            .await?;

        info!(
            application_id = %application.id,
            candidate_id = %candidate.id,
            stage = ?candidate.current_pipeline_stage_id,
            "application approved"
        );

        let mut application = application;
        application.status = ApplicationStatus::Approved;
        application.approved_at = Some(now);
        application.reviewed_by = Some(reviewed_by);
        application.updated_at = now;

        Ok(ApprovalOutcome {
            candidate,
            application,
        })
    }

    /// Explicit pipeline wins, else the job default, else none. An
    /// explicitly requested pipeline that does not exist is an error; a
    /// dangling job default degrades to unstaged.
    async fn resolve_pipeline(
        &self,
        explicit: Option<Uuid>,
        job_default: Option<Uuid>,
    ) -> Result<Option<Pipeline>, ApprovalError> {
        if let Some(id) = explicit {
            let pipeline = self
                .store
                .find_pipeline(id)
                .await?
                .ok_or(ApprovalError::PipelineNotFound)?;
            return Ok(Some(pipeline));
        }
        if let Some(id) = job_default {
            return Ok(self.store.find_pipeline(id).await?);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::oracle::testing::ScriptedOracle;
    use crate::models::application::ApplicationSource;
    use crate::models::job::{Job, PipelineStage};
    use crate::models::resume::{ExperienceEntry, ParsedResume};
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn parsed_resume() -> ParsedResume {
        ParsedResume {
            summary: Some("Backend engineer".to_string()),
            skills: vec!["Rust".to_string(), "Postgres".to_string()],
            experience: vec![ExperienceEntry {
                company: "Initech".to_string(),
                title: "Engineer".to_string(),
                duration: "Nov 2020 - Oct 2022".to_string(),
                description: "Payments".to_string(),
            }],
            certifications: vec![
                "AWS Certified Solutions Architect".to_string(),
                "Proficient in distributed systems design and fault tolerance".to_string(),
            ],
            ..Default::default()
        }
    }

    fn application(id: Uuid, job_id: Uuid) -> Application {
        let now = Utc::now();
        Application {
            id,
            job_id: Some(job_id),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            resume_url: Some("s3://resumes/jane.pdf".to_string()),
            resume_raw_text: Some("raw text".to_string()),
            parsed_data: Some(parsed_resume()),
            is_valid_resume: Some(true),
            validation_score: Some(88),
            validation_reason: Some("looks genuine".to_string()),
            status: ApplicationStatus::Pending,
            source: ApplicationSource::DirectApply,
            approved_at: None,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn job(id: Uuid, default_pipeline_id: Option<Uuid>) -> Job {
        Job {
            id,
            title: "Backend Engineer".to_string(),
            description: "Build payment services".to_string(),
            requirements: vec!["Rust".to_string(), "SQL".to_string()],
            default_pipeline_id,
        }
    }

    fn score_response() -> serde_json::Value {
        json!({
            "overall_score": 84,
            "skills_match": 90,
            "experience_match": 80,
            "education_match": 60,
            "summary": "Strong backend match",
            "strengths": ["Rust"],
            "concerns": [],
            "recommendation": "good_fit"
        })
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        application_id: Uuid,
        job_id: Uuid,
    }

    fn fixture(default_pipeline: Option<Pipeline>) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let application_id = Uuid::new_v4();
        let job_id = Uuid::new_v4();
        let default_pipeline_id = default_pipeline.as_ref().map(|p| p.id);
        store.seed_application(application(application_id, job_id));
        store.seed_job(job(job_id, default_pipeline_id));
        if let Some(pipeline) = default_pipeline {
            store.seed_pipeline(pipeline);
        }
        Fixture {
            store,
            application_id,
            job_id,
        }
    }

    fn orchestrator(store: Arc<MemoryStore>, oracle: ScriptedOracle) -> ApprovalOrchestrator {
        ApprovalOrchestrator::new(store, Arc::new(oracle))
    }

    fn pipeline(stages: Vec<(i32, &str)>) -> Pipeline {
        Pipeline {
            id: Uuid::new_v4(),
            name: "Hiring".to_string(),
            stages: stages
                .into_iter()
                .map(|(order, name)| PipelineStage {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    order,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_approve_materializes_candidate_and_flips_status() {
        let fx = fixture(None);
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));

        let outcome = orchestrator
            .approve(fx.application_id, fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome.application.status, ApplicationStatus::Approved);
        assert!(outcome.application.approved_at.is_some());
        assert_eq!(outcome.candidate.name, "Jane Doe");
        assert_eq!(outcome.candidate.ai_score.as_ref().unwrap().overall_score, 84);
        assert_eq!(fx.store.candidate_count(), 1);

        let stored = fx
            .store
            .find_application(fx.application_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn test_second_approve_is_rejected_with_one_candidate() {
        let fx = fixture(None);
        let first = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        first
            .approve(fx.application_id, fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap();

        let second = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        let err = second
            .approve(fx.application_id, fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApprovalError::AlreadyApproved));
        assert_eq!(fx.store.candidate_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_job_fails_before_any_write() {
        let fx = fixture(None);
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        let err = orchestrator
            .approve(fx.application_id, Uuid::new_v4(), Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::JobNotFound));
        assert_eq!(fx.store.candidate_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_application() {
        let fx = fixture(None);
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        let err = orchestrator
            .approve(Uuid::new_v4(), fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::ApplicationNotFound));
    }

    #[tokio::test]
    async fn test_explicit_missing_pipeline_is_an_error() {
        let fx = fixture(None);
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        let err = orchestrator
            .approve(
                fx.application_id,
                fx.job_id,
                Uuid::new_v4(),
                ApproveOptions {
                    pipeline_id: Some(Uuid::new_v4()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::PipelineNotFound));
        assert_eq!(fx.store.candidate_count(), 0);
    }

    #[tokio::test]
    async fn test_initial_stage_is_minimum_order() {
        let pipeline = pipeline(vec![(2, "B"), (1, "A")]);
        let stage_a_id = pipeline.stages[1].id;
        let fx = fixture(Some(pipeline));
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));

        let outcome = orchestrator
            .approve(fx.application_id, fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome.candidate.current_pipeline_stage_id, Some(stage_a_id));
    }

    #[tokio::test]
    async fn test_stageless_pipeline_leaves_candidate_unstaged() {
        let fx = fixture(Some(pipeline(vec![])));
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        let outcome = orchestrator
            .approve(fx.application_id, fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap();
        assert!(outcome.candidate.current_pipeline_stage_id.is_none());
    }

    #[tokio::test]
    async fn test_explicit_pipeline_wins_over_job_default() {
        let default = pipeline(vec![(1, "Default entry")]);
        let explicit = pipeline(vec![(1, "Explicit entry")]);
        let explicit_stage_id = explicit.stages[0].id;
        let explicit_id = explicit.id;
        let fx = fixture(Some(default));
        fx.store.seed_pipeline(explicit);

        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        let outcome = orchestrator
            .approve(
                fx.application_id,
                fx.job_id,
                Uuid::new_v4(),
                ApproveOptions {
                    pipeline_id: Some(explicit_id),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            outcome.candidate.current_pipeline_stage_id,
            Some(explicit_stage_id)
        );
    }

    #[tokio::test]
    async fn test_scoring_failure_aborts_transition_entirely() {
        let fx = fixture(None);
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::failing());

        let err = orchestrator
            .approve(fx.application_id, fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApprovalError::Scoring(_)));
        assert_eq!(fx.store.candidate_count(), 0);
        let stored = fx
            .store
            .find_application(fx.application_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn test_candidate_snapshot_is_repaired() {
        let fx = fixture(None);
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        let outcome = orchestrator
            .approve(fx.application_id, fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap();

        // The skill sentence filed as a certification is filtered out of
        // the snapshot; the application's own parsed data keeps it.
        assert_eq!(
            outcome.candidate.certifications,
            vec!["AWS Certified Solutions Architect".to_string()]
        );
        assert_eq!(
            outcome
                .application
                .parsed_data
                .as_ref()
                .unwrap()
                .certifications
                .len(),
            2
        );
        // Nov 2020 - Oct 2022 = 23 months
        assert_eq!(outcome.candidate.years_of_experience, 1.9);
    }

    #[tokio::test]
    async fn test_empty_parsed_data_still_scores() {
        let fx = fixture(None);
        {
            let mut app = fx
                .store
                .find_application(fx.application_id)
                .await
                .unwrap()
                .unwrap();
            app.parsed_data = None;
            fx.store.seed_application(app);
        }
        let orchestrator = orchestrator(fx.store.clone(), ScriptedOracle::single(score_response()));
        let outcome = orchestrator
            .approve(fx.application_id, fx.job_id, Uuid::new_v4(), ApproveOptions::default())
            .await
            .unwrap();
        assert!(outcome.candidate.skills.is_empty());
        assert!(outcome.candidate.ai_score.is_some());
    }
}
