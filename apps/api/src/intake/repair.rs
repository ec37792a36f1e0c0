//! Deterministic post-processing of oracle-structured resume fields.
//!
//! Pure string heuristics, no I/O. The oracle output is free text with
//! predictable failure shapes — skill sentences filed as certifications,
//! company names buried in descriptions, degree types echoed into the
//! field-of-study slot. Each repair targets one documented pattern and is
//! best-effort: entries that do not match are left alone, never errored.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::resume::{EducationEntry, ExperienceEntry, ParsedResume};

lazy_static! {
    /// `[Month]? Year <dash> [Month]? (Year|Present|Current)`
    static ref DURATION_RE: Regex = Regex::new(
        r"(?i)^\s*(?:([a-z]{3,9})\.?\s+)?(\d{4})\s*[-–—]\s*(?:([a-z]{3,9})\.?\s+)?(\d{4}|present|current)\s*$"
    )
    .expect("valid duration regex");

    /// `(at|@|for) <Capitalized phrase>` terminated by dash, comma, or end.
    static ref COMPANY_RE: Regex = Regex::new(
        r"(?:\b(?i:at|for)\b|@)\s+([A-Z][A-Za-z0-9&.']*(?:\s+[A-Z][A-Za-z0-9&.']*)*)\s*(?:[-–—,]|$)"
    )
    .expect("valid company regex");

    /// `in <subject>` clause inside a degree string.
    static ref IN_SUBJECT_RE: Regex =
        Regex::new(r"(?i)\bin\s+(.+)$").expect("valid in-subject regex");

    /// `of <subject>` clause inside an institution string.
    static ref OF_SUBJECT_RE: Regex =
        Regex::new(r"(?i)\bof\s+(.+)$").expect("valid of-subject regex");
}

/// Phrases that mark a "certification" as a mis-filed skill sentence.
/// Calibrated list from production data; preserved verbatim.
const SKILL_PHRASE_MARKERS: [&str; 6] = [
    "proficient in",
    "strong foundation",
    "experience with",
    "skilled in",
    "expertise in",
    "knowledge of",
];

/// Real certification names do not run this long.
const MAX_CERTIFICATION_CHARS: usize = 100;

const DEGREE_TYPE_PREFIXES: [&str; 6] = [
    "bachelor",
    "master",
    "phd",
    "doctorate",
    "associate",
    "diploma",
];

fn month_number(name: &str) -> Option<u32> {
    let key: String = name.to_ascii_lowercase().chars().take(3).collect();
    let number = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

/// Whole months covered by one duration string, 0 when it does not match
/// the pattern or the range is garbled (end before start). Missing months
/// default to January; "present"/"current" resolve to `today`.
pub fn months_in_duration(duration: &str, today: NaiveDate) -> u32 {
    let captures = match DURATION_RE.captures(duration) {
        Some(c) => c,
        None => return 0,
    };

    let start_month = match captures.get(1) {
        Some(m) => match month_number(m.as_str()) {
            Some(n) => n as i32,
            None => return 0, // month token present but not a month
        },
        None => 1,
    };
    let start_year: i32 = match captures[2].parse() {
        Ok(y) => y,
        Err(_) => return 0,
    };

    let end_token = captures[4].to_ascii_lowercase();
    let (end_year, end_month) = if end_token == "present" || end_token == "current" {
        (today.year(), today.month() as i32)
    } else {
        let year: i32 = match end_token.parse() {
            Ok(y) => y,
            Err(_) => return 0,
        };
        let month = match captures.get(3) {
            Some(m) => match month_number(m.as_str()) {
                Some(n) => n as i32,
                None => return 0,
            },
            None => 1,
        };
        (year, month)
    };

    let months = (end_year - start_year) * 12 + (end_month - start_month);
    months.max(0) as u32
}

/// Total years of experience across all entries, one decimal place.
/// Entries with unparseable durations contribute zero.
pub fn years_of_experience(entries: &[ExperienceEntry], today: NaiveDate) -> f64 {
    let total_months: u32 = entries
        .iter()
        .map(|e| months_in_duration(&e.duration, today))
        .sum();
    (total_months as f64 / 12.0 * 10.0).round() / 10.0
}

/// Drops certification strings that are really skill sentences: anything
/// over 100 chars or containing a skill-phrase marker.
pub fn filter_certifications(certifications: Vec<String>) -> Vec<String> {
    certifications
        .into_iter()
        .filter(|cert| {
            if cert.chars().count() > MAX_CERTIFICATION_CHARS {
                return false;
            }
            let lowered = cert.to_lowercase();
            !SKILL_PHRASE_MARKERS
                .iter()
                .any(|marker| lowered.contains(marker))
        })
        .collect()
}

/// Recovers a company name from an experience description, e.g.
/// "Led the payments team at Initech, shipping..." -> "Initech".
pub fn infer_company(description: &str) -> Option<String> {
    COMPANY_RE
        .captures(description)
        .map(|c| c[1].trim().to_string())
}

/// Repairs a field-of-study that is actually a degree type ("Bachelor",
/// "Master of Science"...). Recovery order: `in <subject>` inside the
/// degree, then `of <subject>` inside the institution, else unchanged.
pub fn repair_field_of_study(entry: &EducationEntry) -> String {
    let field_lower = entry.field.trim().to_lowercase();
    let looks_like_degree_type = DEGREE_TYPE_PREFIXES
        .iter()
        .any(|prefix| field_lower.starts_with(prefix));
    if !looks_like_degree_type {
        return entry.field.clone();
    }

    if let Some(captures) = IN_SUBJECT_RE.captures(&entry.degree) {
        return captures[1].trim().to_string();
    }
    if let Some(captures) = OF_SUBJECT_RE.captures(&entry.institution) {
        return captures[1].trim().to_string();
    }
    entry.field.clone()
}

/// Applies every repair to a structured resume, returning a fixed copy.
/// The input is untouched — approval snapshots the repaired copy.
pub fn repair_resume(resume: &ParsedResume) -> ParsedResume {
    let mut repaired = resume.clone();

    for entry in &mut repaired.experience {
        if entry.company.trim().is_empty() && !entry.description.trim().is_empty() {
            if let Some(company) = infer_company(&entry.description) {
                entry.company = company;
            }
        }
    }

    for entry in &mut repaired.education {
        entry.field = repair_field_of_study(entry);
    }

    repaired.certifications = filter_certifications(repaired.certifications);
    repaired
}
