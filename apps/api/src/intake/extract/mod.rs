//! Layered resume text extraction.
//!
//! Each tier implements [`Extractor`]; the orchestrator walks an ordered
//! tier list and stops at the first one producing usable text. Adding,
//! removing, or reordering tiers is a data change in the constructor, not a
//! control-flow change.
//!
//! Tier order: native text layer -> cloud OCR (scanned PDFs) -> raw
//! text-run walk. Non-PDF inputs only get the native tier; DOC/DOCX are
//! rarely scanned images, so there is nothing sensible to fall back to.

pub mod native;
pub mod ocr;
pub mod runs;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

pub use native::NativeExtractor;
pub use ocr::{OcrConfig, OcrExtractor};
pub use runs::TextRunExtractor;

/// Trimmed-character floor below which extracted text is considered
/// unusable. Calibrated from production resumes; preserved as-is rather
/// than assumed optimal.
pub const MIN_USABLE_TEXT_CHARS: usize = 50;

/// Declared type of an uploaded resume document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Doc,
    Docx,
}

impl FileKind {
    /// Resolves the declared kind from a content type, falling back to the
    /// filename extension. Unknown types are rejected up front — this is a
    /// resume intake, not a general document parser.
    pub fn from_declared(content_type: Option<&str>, filename: Option<&str>) -> Option<FileKind> {
        match content_type.map(str::to_ascii_lowercase).as_deref() {
            Some("application/pdf") => return Some(FileKind::Pdf),
            Some("application/msword") => return Some(FileKind::Doc),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                return Some(FileKind::Docx)
            }
            _ => {}
        }
        let name = filename?.to_ascii_lowercase();
        if name.ends_with(".pdf") {
            Some(FileKind::Pdf)
        } else if name.ends_with(".docx") {
            Some(FileKind::Docx)
        } else if name.ends_with(".doc") {
            Some(FileKind::Doc)
        } else {
            None
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileKind::Pdf => "pdf",
            FileKind::Doc => "doc",
            FileKind::Docx => "docx",
        };
        f.write_str(label)
    }
}

/// Why a single tier produced nothing usable.
#[derive(Debug, Error)]
pub enum TierError {
    #[error("tier not configured")]
    Unavailable,

    #[error("extracted only {chars} usable chars")]
    TooShort { chars: usize },

    #[error("{0}")]
    Failed(String),
}

/// Terminal extraction failure: every applicable tier failed or came up
/// short. Callers should surface this as "file could not be read", not a
/// generic error — automated recovery is already exhausted.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("all extraction tiers exhausted ({summary})")]
    Exhausted { summary: String },
}

/// One fallback level in the extraction chain.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this tier can handle the declared file kind at all.
    fn supports(&self, kind: FileKind) -> bool;

    /// Best-effort extraction. Returning text shorter than the usable floor
    /// is legal; the orchestrator applies the floor uniformly.
    async fn attempt(&self, buffer: &[u8], kind: FileKind) -> Result<String, TierError>;
}

/// Walks the tier list in order and returns the first usable text.
pub struct ExtractionOrchestrator {
    tiers: Vec<Box<dyn Extractor>>,
}

impl ExtractionOrchestrator {
    pub fn new(tiers: Vec<Box<dyn Extractor>>) -> Self {
        Self { tiers }
    }

    /// Production chain: native readers, then cloud OCR, then the lopdf
    /// text-run walk.
    pub fn with_default_tiers(ocr: Option<OcrConfig>) -> Self {
        Self::new(vec![
            Box::new(NativeExtractor),
            Box::new(OcrExtractor::new(ocr)),
            Box::new(TextRunExtractor),
        ])
    }

    pub async fn extract(&self, buffer: &[u8], kind: FileKind) -> Result<String, ExtractError> {
        let mut failures: Vec<String> = Vec::new();

        for tier in &self.tiers {
            if !tier.supports(kind) {
                continue;
            }
            match tier.attempt(buffer, kind).await {
                Ok(text) => {
                    let trimmed = text.trim();
                    let chars = trimmed.chars().count();
                    if chars >= MIN_USABLE_TEXT_CHARS {
                        info!(tier = tier.name(), chars, "extraction succeeded");
                        return Ok(trimmed.to_string());
                    }
                    warn!(tier = tier.name(), chars, "extraction below usable floor");
                    failures.push(format!("{}: too short ({chars} chars)", tier.name()));
                }
                Err(e) => {
                    warn!(tier = tier.name(), error = %e, "extraction tier failed");
                    failures.push(format!("{}: {e}", tier.name()));
                }
            }
        }

        Err(ExtractError::Exhausted {
            summary: if failures.is_empty() {
                format!("no tier supports {kind}")
            } else {
                failures.join("; ")
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stub tier with scripted behavior.
    struct StubTier {
        name: &'static str,
        pdf_only: bool,
        result: Result<String, &'static str>,
    }

    impl StubTier {
        fn ok(name: &'static str, text: &str) -> Box<Self> {
            Box::new(Self {
                name,
                pdf_only: false,
                result: Ok(text.to_string()),
            })
        }

        fn failing(name: &'static str, msg: &'static str) -> Box<Self> {
            Box::new(Self {
                name,
                pdf_only: false,
                result: Err(msg),
            })
        }

        fn pdf_only(mut self: Box<Self>) -> Box<Self> {
            self.pdf_only = true;
            self
        }
    }

    #[async_trait]
    impl Extractor for StubTier {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports(&self, kind: FileKind) -> bool {
            !self.pdf_only || kind == FileKind::Pdf
        }

        async fn attempt(&self, _buffer: &[u8], _kind: FileKind) -> Result<String, TierError> {
            self.result
                .clone()
                .map_err(|m| TierError::Failed(m.to_string()))
        }
    }

    const LONG_TEXT: &str =
        "Senior software engineer with ten years of experience building backend systems.";

    #[tokio::test]
    async fn test_first_usable_tier_wins() {
        let orchestrator = ExtractionOrchestrator::new(vec![
            StubTier::ok("native", LONG_TEXT),
            StubTier::failing("ocr", "should not be reached"),
        ]);
        let text = orchestrator
            .extract(b"%PDF-", FileKind::Pdf)
            .await
            .unwrap();
        assert_eq!(text, LONG_TEXT);
    }

    #[tokio::test]
    async fn test_tertiary_rescues_after_native_and_ocr_fail() {
        let orchestrator = ExtractionOrchestrator::new(vec![
            StubTier::failing("native", "no text layer"),
            StubTier::failing("ocr", "service down").pdf_only(),
            StubTier::ok("text-runs", LONG_TEXT).pdf_only(),
        ]);
        let text = orchestrator
            .extract(b"%PDF-", FileKind::Pdf)
            .await
            .unwrap();
        assert_eq!(text, LONG_TEXT);
    }

    #[tokio::test]
    async fn test_short_text_everywhere_exhausts() {
        let orchestrator = ExtractionOrchestrator::new(vec![
            StubTier::ok("native", "too short"),
            StubTier::failing("ocr", "service down"),
            StubTier::ok("text-runs", "still short"),
        ]);
        let err = orchestrator
            .extract(b"%PDF-", FileKind::Pdf)
            .await
            .unwrap_err();
        let ExtractError::Exhausted { summary } = err;
        assert!(summary.contains("native"), "summary was: {summary}");
        assert!(summary.contains("service down"));
    }

    #[tokio::test]
    async fn test_non_pdf_has_no_fallback() {
        let orchestrator = ExtractionOrchestrator::new(vec![
            StubTier::failing("native", "corrupt docx"),
            StubTier::ok("ocr", LONG_TEXT).pdf_only(),
            StubTier::ok("text-runs", LONG_TEXT).pdf_only(),
        ]);
        let err = orchestrator
            .extract(b"PK", FileKind::Docx)
            .await
            .unwrap_err();
        let ExtractError::Exhausted { summary } = err;
        assert!(summary.contains("corrupt docx"));
    }

    #[tokio::test]
    async fn test_result_is_trimmed() {
        let padded = format!("\n\n  {LONG_TEXT}  \n");
        let orchestrator = ExtractionOrchestrator::new(vec![StubTier::ok("native", &padded)]);
        let text = orchestrator
            .extract(b"%PDF-", FileKind::Pdf)
            .await
            .unwrap();
        assert_eq!(text, LONG_TEXT);
    }

    #[test]
    fn test_file_kind_from_content_type() {
        assert_eq!(
            FileKind::from_declared(Some("application/pdf"), None),
            Some(FileKind::Pdf)
        );
        assert_eq!(
            FileKind::from_declared(
                Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
                None
            ),
            Some(FileKind::Docx)
        );
    }

    #[test]
    fn test_file_kind_falls_back_to_extension() {
        assert_eq!(
            FileKind::from_declared(Some("application/octet-stream"), Some("resume.PDF")),
            Some(FileKind::Pdf)
        );
        assert_eq!(
            FileKind::from_declared(None, Some("cv.doc")),
            Some(FileKind::Doc)
        );
        assert_eq!(FileKind::from_declared(None, Some("photo.png")), None);
    }
}
