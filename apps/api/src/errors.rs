use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assets::AssetError;
use crate::intake::approval::ApprovalError;
use crate::intake::extract::ExtractError;
use crate::intake::scorer::ScoreError;
use crate::intake::structurer::StructureError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Every extraction tier exhausted — the file itself is the problem.
    #[error("Resume unreadable: {0}")]
    ResumeUnreadable(String),

    /// Oracle-side failure (structuring or scoring). Retryable by caller.
    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ResumeUnreadable(msg) => {
                tracing::warn!("resume unreadable: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "RESUME_UNREADABLE",
                    "This file could not be read — likely corrupted or an unsupported scan"
                        .to_string(),
                )
            }
            AppError::Oracle(msg) => {
                tracing::error!("oracle error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_PROCESSING_FAILED",
                    "An AI processing error occurred; please retry".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        AppError::ResumeUnreadable(e.to_string())
    }
}

impl From<StructureError> for AppError {
    fn from(e: StructureError) -> Self {
        match e {
            StructureError::TextTooShort { .. } => AppError::ResumeUnreadable(e.to_string()),
            other => AppError::Oracle(other.to_string()),
        }
    }
}

impl From<ScoreError> for AppError {
    fn from(e: ScoreError) -> Self {
        AppError::Oracle(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateCandidate => {
                AppError::Conflict("candidate already exists for this application".to_string())
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<AssetError> for AppError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::BadUrl(msg) => AppError::Validation(msg),
            AssetError::Fetch(msg) => AppError::ResumeUnreadable(msg),
        }
    }
}

impl From<ApprovalError> for AppError {
    fn from(e: ApprovalError) -> Self {
        match e {
            ApprovalError::AlreadyApproved => {
                AppError::Conflict("application is already approved".to_string())
            }
            ApprovalError::ApplicationNotFound => {
                AppError::NotFound("application not found".to_string())
            }
            ApprovalError::JobNotFound => AppError::NotFound("job not found".to_string()),
            ApprovalError::PipelineNotFound => {
                AppError::NotFound("pipeline not found".to_string())
            }
            ApprovalError::Scoring(inner) => AppError::from(inner),
            ApprovalError::Store(inner) => AppError::from(inner),
        }
    }
}
