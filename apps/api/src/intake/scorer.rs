//! Candidate-vs-job match scoring.
//!
//! The prompt payload is an explicit field whitelist — summary, skills,
//! experience, education, certifications, languages. Raw extracted text is
//! deliberately excluded to bound token cost. Oracle output is not
//! contractually bounded, so every numeric lands through a clamp.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::intake::oracle::{Oracle, OracleError};
use crate::intake::prompts::{SCORE_PROMPT_TEMPLATE, SCORE_SYSTEM};
use crate::models::resume::ParsedResume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongFit,
    GoodFit,
    ModerateFit,
    PoorFit,
}

/// Multi-axis match score. All numeric axes are 0-100 inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiScore {
    pub overall_score: u8,
    pub skills_match: u8,
    pub experience_match: u8,
    pub education_match: u8,
    pub summary: String,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendation: Recommendation,
}

/// Wire shape straight off the oracle, before clamping.
#[derive(Debug, Deserialize)]
struct ScoreWire {
    overall_score: i64,
    skills_match: i64,
    experience_match: i64,
    education_match: i64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    concerns: Vec<String>,
    recommendation: Recommendation,
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("scoring failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("scoring returned off-schema data: {0}")]
    Schema(String),
}

fn clamp_axis(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// The whitelisted prompt payload built from structured resume data.
pub fn scoring_payload(resume: &ParsedResume) -> serde_json::Value {
    json!({
        "summary": resume.summary,
        "skills": resume.skills,
        "experience": resume.experience,
        "education": resume.education,
        "certifications": resume.certifications,
        "languages": resume.languages,
    })
}

pub async fn score(
    resume: &ParsedResume,
    job_description: &str,
    job_requirements: &[String],
    oracle: &dyn Oracle,
) -> Result<AiScore, ScoreError> {
    let payload = scoring_payload(resume);
    let prompt = SCORE_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{job_requirements}", &job_requirements.join("\n- "))
        .replace(
            "{candidate_data}",
            &serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string()),
        );

    let value = oracle.complete_json(&prompt, SCORE_SYSTEM).await?;
    let wire: ScoreWire =
        serde_json::from_value(value).map_err(|e| ScoreError::Schema(e.to_string()))?;

    Ok(AiScore {
        overall_score: clamp_axis(wire.overall_score),
        skills_match: clamp_axis(wire.skills_match),
        experience_match: clamp_axis(wire.experience_match),
        education_match: clamp_axis(wire.education_match),
        summary: wire.summary,
        strengths: wire.strengths,
        concerns: wire.concerns,
        recommendation: wire.recommendation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::oracle::testing::ScriptedOracle;
    use crate::models::resume::PersonalInfo;

    fn resume() -> ParsedResume {
        ParsedResume {
            personal_info: PersonalInfo {
                name: Some("Jane Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                ..Default::default()
            },
            summary: Some("Backend engineer".to_string()),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        }
    }

    fn score_json(overall: i64, skills: i64) -> serde_json::Value {
        json!({
            "overall_score": overall,
            "skills_match": skills,
            "experience_match": 70,
            "education_match": 60,
            "summary": "Solid match",
            "strengths": ["Rust depth"],
            "concerns": [],
            "recommendation": "good_fit"
        })
    }

    #[tokio::test]
    async fn test_axes_clamped_above_and_below() {
        let oracle = ScriptedOracle::single(score_json(150, -10));
        let score = score(&resume(), "Build services", &[], &oracle).await.unwrap();
        assert_eq!(score.overall_score, 100);
        assert_eq!(score.skills_match, 0);
        assert_eq!(score.experience_match, 70);
    }

    #[tokio::test]
    async fn test_recommendation_parses() {
        let oracle = ScriptedOracle::single(score_json(80, 85));
        let score = score(&resume(), "Build services", &[], &oracle).await.unwrap();
        assert_eq!(score.recommendation, Recommendation::GoodFit);
    }

    #[tokio::test]
    async fn test_unknown_recommendation_is_schema_failure() {
        let mut bad = score_json(80, 85);
        bad["recommendation"] = json!("maybe_fit");
        let oracle = ScriptedOracle::single(bad);
        let err = score(&resume(), "Build services", &[], &oracle)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoreError::Schema(_)));
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let oracle = ScriptedOracle::failing();
        let err = score(&resume(), "Build services", &[], &oracle)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoreError::Oracle(_)));
    }

    #[test]
    fn test_payload_whitelists_fields() {
        let payload = scoring_payload(&resume());
        let mut keys: Vec<&str> = payload.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "certifications",
                "education",
                "experience",
                "languages",
                "skills",
                "summary"
            ]
        );
        // Identity and raw text never ride along in the prompt payload.
        assert!(payload.get("personal_info").is_none());
        assert!(payload.get("extracted_text").is_none());
    }
}
