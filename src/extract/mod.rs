//! PDF text extraction.
//!
//! Text is read with lopdf and bounded by page and character limits so
//! oversized scans do not blow up prompt size. Reading stops as soon as
//! either limit is reached, whichever comes first.

use std::path::Path;

use lopdf::Document as PdfDocument;
use thiserror::Error;

use crate::config::{DEFAULT_MAX_CHARS, DEFAULT_MAX_PAGES};

/// Documents whose trimmed text is at or below this length cannot be
/// classified meaningfully and fail extraction.
pub const MIN_TEXT_CHARS: usize = 50;
/// Below this length the document is still processed, with a warning.
const SHORT_TEXT_WARN_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("PDF is password protected")]
    Encrypted,
    #[error("insufficient extractable text ({chars} chars)")]
    InsufficientText { chars: usize },
}

/// Bounded text pulled from a single PDF.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    /// Pages read before a limit was hit.
    pub pages_read: usize,
}

/// Extracts text from PDFs under configurable page and character limits.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    max_pages: usize,
    max_chars: usize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Read text from `path`, stopping at the page or character limit.
    ///
    /// Pages that fail to decode are skipped with a warning; the whole
    /// file only fails when it cannot be opened or yields too little
    /// text to classify.
    pub fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let mut doc = PdfDocument::load(path)?;
        if doc.is_encrypted() && doc.decrypt("").is_err() {
            return Err(ExtractionError::Encrypted);
        }

        let pages = doc.get_pages();
        let mut text = String::new();
        let mut char_count = 0usize;
        let mut pages_read = 0usize;

        for (page_num, _) in pages.iter().take(self.max_pages) {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    if !text.is_empty() {
                        text.push('\n');
                        char_count += 1;
                    }
                    char_count += page_text.chars().count();
                    text.push_str(&page_text);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping page {} of {}: {}",
                        page_num,
                        path.display(),
                        e
                    );
                }
            }
            pages_read += 1;
            if char_count >= self.max_chars {
                break;
            }
        }

        let text = truncate_chars(text, self.max_chars);
        let trimmed_chars = text.trim().chars().count();
        if trimmed_chars <= MIN_TEXT_CHARS {
            return Err(ExtractionError::InsufficientText {
                chars: trimmed_chars,
            });
        }
        if trimmed_chars < SHORT_TEXT_WARN_CHARS {
            tracing::warn!(
                "Very little text in {} ({} chars); classification may be poor",
                path.display(),
                trimmed_chars
            );
        }

        Ok(ExtractedText { text, pages_read })
    }
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut text = text;
            text.truncate(byte_index);
            text
        }
        None => text,
    }
}
