//! Prompt templates for the three oracle operations.
//!
//! Fixed strings with `{placeholder}` interpolation — callers `.replace()`
//! the fields in. Prompts are not configurable input.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

pub const STRUCTURE_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Structuring: raw resume text -> ParsedResume JSON.
pub const STRUCTURE_PROMPT_TEMPLATE: &str = r#"Extract structured data from the resume text below.

Return a JSON object with exactly these keys:
- "personal_info": {"name", "email", "phone", "location"} (string or null each)
- "summary": string or null
- "skills": array of strings, most prominent first
- "experience": array of {"company", "title", "duration", "description"} (strings, empty string when unknown)
- "education": array of {"institution", "degree", "field", "year"} (strings, empty string when unknown)
- "certifications": array of strings (actual certifications only, not skill statements)
- "languages": array of strings

Copy "duration" verbatim from the resume (e.g. "Jan 2020 - Mar 2022"). Do not invent data that is not in the text.

Resume text:
{resume_text}"#;

pub const VALIDATE_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Validation: is this actually a resume, and how strong is it.
pub const VALIDATE_PROMPT_TEMPLATE: &str = r#"Judge whether the text below is a genuine resume and rate its overall quality.

Return a JSON object with exactly these keys:
- "is_valid": boolean — true only if this reads as a real person's resume/CV
- "score": integer 0-100 — overall resume quality (structure, specificity, credibility)
- "reason": one-sentence string explaining the judgment

Text:
{resume_text}"#;

pub const SCORE_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Scoring: structured resume vs job description/requirements -> AiScore.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Score how well the candidate below matches the job. Score on whatever fields are present; missing fields lower confidence, they are not disqualifying.

Return a JSON object with exactly these keys:
- "overall_score": integer 0-100
- "skills_match": integer 0-100
- "experience_match": integer 0-100
- "education_match": integer 0-100
- "summary": short string summarizing the match
- "strengths": array of strings
- "concerns": array of strings
- "recommendation": one of "strong_fit", "good_fit", "moderate_fit", "poor_fit"

Job description:
{job_description}

Job requirements:
{job_requirements}

Candidate data:
{candidate_data}"#;
