//! Tier 2: cloud OCR fallback for scanned/image-based PDFs.
//!
//! PDF only. The service is treated as a pure buffer -> text function with
//! its own failure modes: bounded retry (two retries, 2s then 4s backoff),
//! hard 30s per-request timeout, and "not configured" reported as an
//! ordinary tier failure so the chain moves on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::{Extractor, FileKind, TierError};

const OCR_RETRIES: u32 = 2;
const OCR_BACKOFF_BASE_MS: u64 = 2000;
const OCR_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    text: String,
}

pub struct OcrExtractor {
    config: Option<OcrConfig>,
    client: Client,
}

impl OcrExtractor {
    pub fn new(config: Option<OcrConfig>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn call_service(&self, config: &OcrConfig, buffer: &[u8]) -> Result<String, String> {
        let mut request = self
            .client
            .post(&config.endpoint)
            .timeout(OCR_REQUEST_TIMEOUT)
            .header("content-type", "application/octet-stream")
            .body(buffer.to_vec());
        if let Some(key) = &config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("OCR service returned {status}"));
        }
        let body: OcrResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.text)
    }
}

#[async_trait]
impl Extractor for OcrExtractor {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn supports(&self, kind: FileKind) -> bool {
        kind == FileKind::Pdf
    }

    async fn attempt(&self, buffer: &[u8], _kind: FileKind) -> Result<String, TierError> {
        let config = self.config.as_ref().ok_or(TierError::Unavailable)?;

        let mut last_error = String::new();
        for attempt in 0..=OCR_RETRIES {
            if attempt > 0 {
                // 2s then 4s
                let delay = Duration::from_millis(OCR_BACKOFF_BASE_MS * (1 << (attempt - 1)));
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "OCR attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            match self.call_service(config, buffer).await {
                Ok(text) => return Ok(text),
                Err(e) => last_error = e,
            }
        }
        Err(TierError::Failed(last_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_ocr_is_unavailable() {
        let extractor = OcrExtractor::new(None);
        let err = extractor
            .attempt(b"%PDF-", FileKind::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, TierError::Unavailable));
    }

    #[test]
    fn test_ocr_is_pdf_only() {
        let extractor = OcrExtractor::new(None);
        assert!(extractor.supports(FileKind::Pdf));
        assert!(!extractor.supports(FileKind::Doc));
        assert!(!extractor.supports(FileKind::Docx));
    }
}
