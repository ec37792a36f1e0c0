//! HTTP handlers for the intake pipeline. Thin glue: the routing and
//! validation layer lives outside this core, so these only translate
//! requests into pipeline calls and pipeline results into responses.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::assets::fetch_resume_bytes;
use crate::errors::AppError;
use crate::intake::approval::{ApprovalOrchestrator, ApproveOptions};
use crate::intake::extract::FileKind;
use crate::intake::structurer::structure;
use crate::intake::validator::validate;
use crate::models::application::Application;
use crate::models::candidate::Candidate;
use crate::models::resume::ParsedResume;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub chars: usize,
}

/// POST /api/v1/resumes/extract — multipart upload, returns extracted text.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut payload: Option<(FileKind, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("bad multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let kind = FileKind::from_declared(field.content_type(), field.file_name())
            .ok_or_else(|| {
                AppError::Validation("only PDF, DOC, and DOCX resumes are accepted".to_string())
            })?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        payload = Some((kind, bytes.to_vec()));
    }

    let (kind, bytes) =
        payload.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;

    let text = state.extractor.extract(&bytes, kind).await?;
    let chars = text.chars().count();
    Ok(Json(ExtractResponse { text, chars }))
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub application_id: Uuid,
    pub parsed_data: ParsedResume,
    pub is_valid_resume: Option<bool>,
    pub validation_score: Option<i16>,
    pub validation_reason: Option<String>,
    pub extracted_chars: usize,
}

/// POST /api/v1/applications/:id/parse
///
/// The full ingestion pass: fetch the stored resume, run the extraction
/// chain, structure and (best-effort) validate, persist the results on the
/// application.
pub async fn handle_parse(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ParseResponse>, AppError> {
    let application = state
        .store
        .find_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("application not found".to_string()))?;

    let resume_url = application
        .resume_url
        .as_deref()
        .ok_or_else(|| AppError::Validation("application has no resume on file".to_string()))?;
    let kind = FileKind::from_declared(None, Some(resume_url)).ok_or_else(|| {
        AppError::Validation("resume is not a PDF, DOC, or DOCX file".to_string())
    })?;

    let bytes = fetch_resume_bytes(&state.s3, &state.http, resume_url).await?;
    let text = state.extractor.extract(&bytes, kind).await?;

    let parsed = structure(&text, state.oracle.as_ref()).await?;
    // Advisory only — a validator outage leaves the triad null.
    let validation = validate(&text, state.oracle.as_ref()).await;

    state
        .store
        .save_parse_results(application_id, &text, &parsed, validation.as_ref())
        .await?;

    info!(%application_id, chars = text.chars().count(), validated = validation.is_some(), "resume parsed");

    Ok(Json(ParseResponse {
        application_id,
        parsed_data: parsed,
        is_valid_resume: validation.as_ref().map(|v| v.is_valid),
        validation_score: validation.as_ref().map(|v| v.score),
        validation_reason: validation.map(|v| v.reason),
        extracted_chars: text.chars().count(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub job_id: Uuid,
    pub reviewed_by: Uuid,
    #[serde(default)]
    pub pipeline_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub candidate: Candidate,
    pub application: Application,
}

/// POST /api/v1/applications/:id/approve
pub async fn handle_approve(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse>, AppError> {
    let orchestrator = ApprovalOrchestrator::new(state.store.clone(), state.oracle.clone());
    let outcome = orchestrator
        .approve(
            application_id,
            request.job_id,
            request.reviewed_by,
            ApproveOptions {
                pipeline_id: request.pipeline_id,
            },
        )
        .await?;
    Ok(Json(ApproveResponse {
        candidate: outcome.candidate,
        application: outcome.application,
    }))
}
