//! Postgres-backed store. Document-shaped fields (parsed resume, stages,
//! AI score) live in jsonb columns; enums are stored as their snake_case
//! wire strings.
//!
//! The `candidates.application_id` column carries a unique index — that
//! constraint, not the pre-check in the approval path, is what actually
//! closes the concurrent-approval race.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{IntakeStore, StoreError};
use crate::intake::validator::ResumeValidation;
use crate::models::application::Application;
use crate::models::candidate::Candidate;
use crate::models::job::{Job, Pipeline, PipelineStage};
use crate::models::resume::ParsedResume;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn enum_from_wire<T: DeserializeOwned>(wire: &str) -> Result<T, StoreError> {
    serde_json::from_value(Value::String(wire.to_string()))
        .map_err(|e| StoreError::Backend(format!("bad enum value '{wire}': {e}")))
}

fn enum_to_wire<T: Serialize>(value: &T) -> Result<String, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => Ok(s),
        other => Err(StoreError::Backend(format!("bad enum encoding: {other:?}"))),
    }
}

fn json_column<T: DeserializeOwned>(
    row: &PgRow,
    column: &str,
) -> Result<Option<T>, StoreError> {
    let value: Option<Value> = row
        .try_get(column)
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    match value {
        Some(v) => serde_json::from_value(v)
            .map(Some)
            .map_err(|e| StoreError::Backend(format!("bad json in {column}: {e}"))),
        None => Ok(None),
    }
}

fn application_from_row(row: &PgRow) -> Result<Application, StoreError> {
    let status_wire: String = row.try_get("status").map_err(backend)?;
    let source_wire: String = row.try_get("source").map_err(backend)?;
    Ok(Application {
        id: row.try_get("id").map_err(backend)?,
        job_id: row.try_get("job_id").map_err(backend)?,
        name: row.try_get("name").map_err(backend)?,
        email: row.try_get("email").map_err(backend)?,
        phone: row.try_get("phone").map_err(backend)?,
        resume_url: row.try_get("resume_url").map_err(backend)?,
        resume_raw_text: row.try_get("resume_raw_text").map_err(backend)?,
        parsed_data: json_column::<ParsedResume>(row, "parsed_data")?,
        is_valid_resume: row.try_get("is_valid_resume").map_err(backend)?,
        validation_score: row.try_get("validation_score").map_err(backend)?,
        validation_reason: row.try_get("validation_reason").map_err(backend)?,
        status: enum_from_wire(&status_wire)?,
        source: enum_from_wire(&source_wire)?,
        approved_at: row.try_get("approved_at").map_err(backend)?,
        reviewed_by: row.try_get("reviewed_by").map_err(backend)?,
        created_at: row.try_get("created_at").map_err(backend)?,
        updated_at: row.try_get("updated_at").map_err(backend)?,
    })
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl IntakeStore for PgStore {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError> {
        let row = sqlx::query(
            "SELECT id, job_id, name, email, phone, resume_url, resume_raw_text, \
             parsed_data, is_valid_resume, validation_score, validation_reason, \
             status, source, approved_at, reviewed_by, created_at, updated_at \
             FROM applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| application_from_row(&r)).transpose()
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query(
            "SELECT id, title, description, requirements, default_pipeline_id \
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| {
            Ok(Job {
                id: r.try_get("id").map_err(backend)?,
                title: r.try_get("title").map_err(backend)?,
                description: r.try_get("description").map_err(backend)?,
                requirements: json_column::<Vec<String>>(&r, "requirements")?.unwrap_or_default(),
                default_pipeline_id: r.try_get("default_pipeline_id").map_err(backend)?,
            })
        })
        .transpose()
    }

    async fn find_pipeline(&self, id: Uuid) -> Result<Option<Pipeline>, StoreError> {
        let row = sqlx::query("SELECT id, name, stages FROM pipelines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            Ok(Pipeline {
                id: r.try_get("id").map_err(backend)?,
                name: r.try_get("name").map_err(backend)?,
                stages: json_column::<Vec<PipelineStage>>(&r, "stages")?.unwrap_or_default(),
            })
        })
        .transpose()
    }

    async fn candidate_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Candidate>, StoreError> {
        let row = sqlx::query("SELECT doc FROM candidates WHERE application_id = $1")
            .bind(application_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            json_column::<Candidate>(&r, "doc")?
                .ok_or_else(|| StoreError::Backend("candidate doc column is null".to_string()))
        })
        .transpose()
    }

    async fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        let doc = serde_json::to_value(candidate)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        sqlx::query(
            "INSERT INTO candidates (id, application_id, job_id, doc, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(candidate.id)
        .bind(candidate.application_id)
        .bind(candidate.job_id)
        .bind(doc)
        .bind(candidate.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_application_approved(
        &self,
        application_id: Uuid,
        reviewed_by: Uuid,
        approved_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE applications SET status = $1, reviewed_by = $2, approved_at = $3, \
             updated_at = $3 WHERE id = $4",
        )
        .bind(enum_to_wire(&crate::models::application::ApplicationStatus::Approved)?)
        .bind(reviewed_by)
        .bind(approved_at)
        .bind(application_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_parse_results(
        &self,
        application_id: Uuid,
        raw_text: &str,
        parsed: &ParsedResume,
        validation: Option<&ResumeValidation>,
    ) -> Result<(), StoreError> {
        let parsed_json =
            serde_json::to_value(parsed).map_err(|e| StoreError::Backend(e.to_string()))?;
        sqlx::query(
            "UPDATE applications SET resume_raw_text = $1, parsed_data = $2, \
             is_valid_resume = $3, validation_score = $4, validation_reason = $5, \
             updated_at = $6 WHERE id = $7",
        )
        .bind(raw_text)
        .bind(parsed_json)
        .bind(validation.map(|v| v.is_valid))
        .bind(validation.map(|v| v.score))
        .bind(validation.map(|v| v.reason.clone()))
        .bind(Utc::now())
        .bind(application_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
