//! services/api/src/adapters/document_text.rs
//!
//! Implements the `DocumentTextExtractor` port for uploaded resumes and job descriptions.
//! PDFs are parsed with `pdf-extract`; everything else must be UTF-8 text.

use interview_coach_core::ports::DocumentTextExtractor;
use std::panic;
use tracing::warn;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Best-effort extractor: unreadable input yields an empty string.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pdf(document: &[u8]) -> String {
        // pdf-extract panics on some malformed files instead of returning an error.
        match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(document)) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Failed to extract text from PDF: {}", e);
                String::new()
            }
            Err(_) => {
                warn!("PDF parser panicked; treating document as empty.");
                String::new()
            }
        }
    }
}

impl DocumentTextExtractor for PdfTextExtractor {
    fn extract_text(&self, document: &[u8]) -> String {
        let text = if document.starts_with(PDF_MAGIC) {
            Self::extract_pdf(document)
        } else {
            match std::str::from_utf8(document) {
                Ok(text) => text.to_string(),
                Err(e) => {
                    warn!("Uploaded document is neither a PDF nor UTF-8 text: {}", e);
                    String::new()
                }
            }
        };
        text.replace('\0', "").trim().to_string()
    }
}
