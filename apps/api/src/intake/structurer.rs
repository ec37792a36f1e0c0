//! Structuring: extracted text -> `ParsedResume` via one oracle call.
//!
//! A malformed response is a hard failure of this call. There is no retry
//! here — the caller decides whether to re-run the whole pipeline.

use thiserror::Error;

use crate::intake::extract::MIN_USABLE_TEXT_CHARS;
use crate::intake::oracle::{Oracle, OracleError};
use crate::intake::prompts::{STRUCTURE_PROMPT_TEMPLATE, STRUCTURE_SYSTEM};
use crate::models::resume::ParsedResume;

#[derive(Debug, Error)]
pub enum StructureError {
    /// Gate: refuse to spend an oracle call on text this thin.
    #[error("text too short to structure ({chars} chars, need {MIN_USABLE_TEXT_CHARS})")]
    TextTooShort { chars: usize },

    #[error("structuring failed: {0}")]
    Oracle(#[from] OracleError),

    /// The oracle answered, but not in the ParsedResume shape. Off-schema
    /// data stops here rather than propagating partially typed.
    #[error("structuring returned off-schema data: {0}")]
    Schema(String),
}

pub async fn structure(text: &str, oracle: &dyn Oracle) -> Result<ParsedResume, StructureError> {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();
    if chars < MIN_USABLE_TEXT_CHARS {
        return Err(StructureError::TextTooShort { chars });
    }

    let prompt = STRUCTURE_PROMPT_TEMPLATE.replace("{resume_text}", trimmed);
    let value = oracle.complete_json(&prompt, STRUCTURE_SYSTEM).await?;
    serde_json::from_value(value).map_err(|e| StructureError::Schema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::oracle::testing::ScriptedOracle;
    use serde_json::json;

    const RESUME_TEXT: &str = "Jane Doe, backend engineer. Eight years building \
        payment systems in Rust and Go at Initech and Globex.";

    #[tokio::test]
    async fn test_short_text_is_gated_before_oracle_spend() {
        // A failing oracle proves the gate fires first: reaching the oracle
        // would surface Unavailable, not TextTooShort.
        let oracle = ScriptedOracle::failing();
        let err = structure("too short", &oracle).await.unwrap_err();
        assert!(matches!(err, StructureError::TextTooShort { .. }));
    }

    #[tokio::test]
    async fn test_well_formed_response_parses() {
        let oracle = ScriptedOracle::single(json!({
            "personal_info": {"name": "Jane Doe", "email": "jane@example.com"},
            "summary": "Backend engineer",
            "skills": ["Rust", "Go"],
            "experience": [{
                "company": "Initech",
                "title": "Engineer",
                "duration": "Jan 2018 - Present",
                "description": "Payments"
            }],
            "education": [],
            "certifications": [],
            "languages": ["English"]
        }));
        let parsed = structure(RESUME_TEXT, &oracle).await.unwrap();
        assert_eq!(parsed.skills, vec!["Rust".to_string(), "Go".to_string()]);
        assert_eq!(parsed.experience[0].company, "Initech");
    }

    #[tokio::test]
    async fn test_off_schema_response_is_hard_failure() {
        let oracle = ScriptedOracle::single(json!({"skills": "Rust, Go"}));
        let err = structure(RESUME_TEXT, &oracle).await.unwrap_err();
        assert!(matches!(err, StructureError::Schema(_)));
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let oracle = ScriptedOracle::failing();
        let err = structure(RESUME_TEXT, &oracle).await.unwrap_err();
        assert!(matches!(err, StructureError::Oracle(_)));
    }
}
