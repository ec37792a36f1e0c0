//! Tier 1: native text-layer readers.
//!
//! PDF goes through `pdf-extract`. DOCX is an OOXML zip — we pull
//! `word/document.xml` and strip the markup. Legacy DOC has no cheap
//! structured reader, so we salvage printable runs from the binary; that is
//! deliberately crude and usually still clears the usable-text floor for
//! real resumes.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::{Extractor, FileKind, TierError};

pub struct NativeExtractor;

#[async_trait]
impl Extractor for NativeExtractor {
    fn name(&self) -> &'static str {
        "native"
    }

    fn supports(&self, _kind: FileKind) -> bool {
        true
    }

    async fn attempt(&self, buffer: &[u8], kind: FileKind) -> Result<String, TierError> {
        match kind {
            FileKind::Pdf => pdf_text_layer(buffer),
            FileKind::Docx => docx_text(buffer),
            FileKind::Doc => doc_text(buffer),
        }
    }
}

fn pdf_text_layer(buffer: &[u8]) -> Result<String, TierError> {
    pdf_extract::extract_text_from_mem(buffer).map_err(|e| TierError::Failed(e.to_string()))
}

lazy_static! {
    static ref XML_TAG: Regex = Regex::new(r"<[^>]+>").expect("valid tag regex");
}

fn docx_text(buffer: &[u8]) -> Result<String, TierError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(buffer))
        .map_err(|e| TierError::Failed(format!("not a docx container: {e}")))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| TierError::Failed(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut document_xml)
        .map_err(|e| TierError::Failed(format!("unreadable document.xml: {e}")))?;

    // Paragraph closes become newlines so sections stay visually separated,
    // then every remaining tag goes.
    let with_breaks = document_xml.replace("</w:p>", "</w:p>\n");
    let stripped = XML_TAG.replace_all(&with_breaks, "");
    Ok(decode_xml_entities(&stripped))
}

fn decode_xml_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

/// Minimum run length for the legacy-DOC salvage; shorter runs are almost
/// always OLE noise rather than prose.
const MIN_DOC_RUN_CHARS: usize = 4;

fn doc_text(buffer: &[u8]) -> Result<String, TierError> {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    for &byte in buffer {
        if byte == b'\n' || (0x20..0x7f).contains(&byte) {
            current.push(byte as char);
        } else if current.trim().chars().count() >= MIN_DOC_RUN_CHARS {
            runs.push(std::mem::take(&mut current).trim().to_string());
        } else {
            current.clear();
        }
    }
    if current.trim().chars().count() >= MIN_DOC_RUN_CHARS {
        runs.push(current.trim().to_string());
    }

    if runs.is_empty() {
        return Err(TierError::Failed("no readable text runs".to_string()));
    }
    Ok(runs.join(" "))
}
