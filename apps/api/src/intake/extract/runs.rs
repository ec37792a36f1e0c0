//! Tier 3: raw text-run walk over the PDF content streams.
//!
//! Lower fidelity than the text-layer reader — no layout, no ordering
//! guarantees beyond stream order — but it sometimes recovers text from
//! documents `pdf-extract` chokes on. All show-text operands are collected
//! and joined with single spaces.

use async_trait::async_trait;
use lopdf::content::Content;
use lopdf::{Document, Object};

use super::{Extractor, FileKind, TierError};

pub struct TextRunExtractor;

#[async_trait]
impl Extractor for TextRunExtractor {
    fn name(&self) -> &'static str {
        "text-runs"
    }

    fn supports(&self, kind: FileKind) -> bool {
        kind == FileKind::Pdf
    }

    async fn attempt(&self, buffer: &[u8], _kind: FileKind) -> Result<String, TierError> {
        collect_text_runs(buffer)
    }
}

fn collect_text_runs(buffer: &[u8]) -> Result<String, TierError> {
    let doc = Document::load_mem(buffer).map_err(|e| TierError::Failed(e.to_string()))?;

    let mut runs: Vec<String> = Vec::new();
    for (_page_number, page_id) in doc.get_pages() {
        let content_data = match doc.get_page_content(page_id) {
            Ok(data) => data,
            Err(_) => continue, // pages without readable content are skipped
        };
        let content = match Content::decode(&content_data) {
            Ok(content) => content,
            Err(_) => continue,
        };
        for operation in &content.operations {
            match operation.operator.as_str() {
                // Tj, ' and " take a single string operand
                "Tj" | "'" | "\"" => {
                    for operand in &operation.operands {
                        push_string_operand(operand, &mut runs);
                    }
                }
                // TJ takes an array interleaving strings and kerning numbers
                "TJ" => {
                    if let Some(Object::Array(elements)) = operation.operands.first() {
                        for element in elements {
                            push_string_operand(element, &mut runs);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    if runs.is_empty() {
        return Err(TierError::Failed("no text runs in content streams".to_string()));
    }
    Ok(runs.join(" ").trim().to_string())
}

fn push_string_operand(object: &Object, runs: &mut Vec<String>) {
    if let Object::String(bytes, _) = object {
        // Lossy decode is acceptable at this tier; exotic encodings come out
        // mangled rather than failing the whole document.
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            runs.push(trimmed.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_buffer_fails_cleanly() {
        assert!(matches!(
            collect_text_runs(b"not a pdf at all"),
            Err(TierError::Failed(_))
        ));
    }

    #[test]
    fn test_string_operands_are_collected() {
        let mut runs = Vec::new();
        push_string_operand(
            &Object::String(b"Hello".to_vec(), lopdf::StringFormat::Literal),
            &mut runs,
        );
        push_string_operand(&Object::Integer(-120), &mut runs);
        push_string_operand(
            &Object::String(b"  World ".to_vec(), lopdf::StringFormat::Literal),
            &mut runs,
        );
        assert_eq!(runs, vec!["Hello".to_string(), "World".to_string()]);
    }
}
