//! The oracle seam: text-in / JSON-out.
//!
//! Structuring, validation, and scoring each build a prompt and parse the
//! returned JSON through a strict serde schema. The trait keeps those
//! modules testable without network access — tests script responses, the
//! production impl is `LlmClient`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum OracleError {
    /// Transport or service failure — the call never produced usable output.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The call succeeded but the output was not the JSON we asked for.
    #[error("oracle returned malformed output: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait Oracle: Send + Sync {
    /// Sends one prompt and returns the parsed JSON body. Single attempt
    /// from the caller's perspective; transport-level retry is internal.
    async fn complete_json(&self, prompt: &str, system: &str) -> Result<Value, OracleError>;
}

#[async_trait]
impl Oracle for LlmClient {
    async fn complete_json(&self, prompt: &str, system: &str) -> Result<Value, OracleError> {
        self.call_json::<Value>(prompt, system)
            .await
            .map_err(|e| match e {
                LlmError::Parse(inner) => OracleError::Malformed(inner.to_string()),
                LlmError::EmptyContent => OracleError::Malformed("empty content".to_string()),
                other => OracleError::Unavailable(other.to_string()),
            })
    }
}
