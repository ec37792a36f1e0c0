//! Authenticity/quality judgment, independent of structuring.
//!
//! The signal is advisory, never load-bearing: any oracle failure degrades
//! to `None` ("unknown") with a warning. A validation failure must never
//! block extracted text or structured data from landing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::intake::oracle::Oracle;
use crate::intake::prompts::{VALIDATE_PROMPT_TEMPLATE, VALIDATE_SYSTEM};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeValidation {
    pub is_valid: bool,
    pub score: i16,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct ValidationWire {
    is_valid: bool,
    score: i64,
    #[serde(default)]
    reason: String,
}

/// `None` means skipped/unknown, not invalid.
pub async fn validate(text: &str, oracle: &dyn Oracle) -> Option<ResumeValidation> {
    let prompt = VALIDATE_PROMPT_TEMPLATE.replace("{resume_text}", text.trim());

    let value = match oracle.complete_json(&prompt, VALIDATE_SYSTEM).await {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "resume validation skipped");
            return None;
        }
    };

    match serde_json::from_value::<ValidationWire>(value) {
        Ok(wire) => Some(ResumeValidation {
            is_valid: wire.is_valid,
            score: wire.score.clamp(0, 100) as i16,
            reason: wire.reason,
        }),
        Err(e) => {
            warn!(error = %e, "resume validation returned off-schema data, skipped");
            None
        }
    }
}
