//! Page-by-page text extraction from guideline documents.
//!
//! - [`PlainTextExtractor`] reads UTF-8 text whose pages are separated by form
//!   feeds, the layout `pdftotext` produces.
//! - [`PdfExtractor`] reads PDF files directly (requires the `pdf` feature).
//! - [`AutoExtractor`] picks one of the above by file extension.

use std::path::Path;

use tracing::debug;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Page separator in plain-text exports.
const FORM_FEED: char = '\x0c';

/// Pulls raw page texts out of a document on local storage.
pub trait TextExtractor: Send + Sync {
    /// Extract every page of the document at `path`, in document order.
    ///
    /// # Errors
    ///
    /// - [`RagError::NotFoundError`] if `path` is not an existing file.
    /// - [`RagError::ExtractionError`] if the content cannot be read.
    fn extract(&self, path: &Path) -> Result<Document>;
}

/// Fail with `NotFoundError` unless `path` is an existing regular file.
fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(RagError::NotFoundError(format!("document '{}'", path.display())))
    }
}

/// Source name recorded on passages: the file name, or the full path as fallback.
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extraction_error(path: &Path, message: impl Into<String>) -> RagError {
    RagError::ExtractionError { path: path.display().to_string(), message: message.into() }
}

/// Reads UTF-8 text files, splitting pages on form feed characters.
///
/// A file without form feeds is a single page. A trailing form feed does not
/// produce an extra empty page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Split already-loaded text into pages.
    pub fn split_pages(text: &str) -> Vec<String> {
        let mut pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        pages
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<Document> {
        ensure_file(path)?;
        let bytes = std::fs::read(path).map_err(|e| extraction_error(path, e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| extraction_error(path, format!("not valid UTF-8: {e}")))?;

        let pages = Self::split_pages(&text);
        debug!(path = %path.display(), page_count = pages.len(), "extracted plain text");
        Ok(Document::new(source_name(path), pages))
    }
}

/// Reads PDF files page by page using `lopdf`.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<Document> {
        ensure_file(path)?;
        let pdf = lopdf::Document::load(path).map_err(|e| extraction_error(path, e.to_string()))?;

        // get_pages is keyed by 1-based page number, already in document order
        let mut pages = Vec::new();
        for page_number in pdf.get_pages().keys() {
            let text = pdf.extract_text(&[*page_number]).map_err(|e| {
                extraction_error(path, format!("page {page_number}: {e}"))
            })?;
            pages.push(text);
        }

        debug!(path = %path.display(), page_count = pages.len(), "extracted pdf");
        Ok(Document::new(source_name(path), pages))
    }
}

/// Chooses an extractor from the file extension.
///
/// `.pdf` files go to [`PdfExtractor`]; everything else is read as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoExtractor;

fn is_pdf(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

impl TextExtractor for AutoExtractor {
    fn extract(&self, path: &Path) -> Result<Document> {
        if !is_pdf(path) {
            return PlainTextExtractor.extract(path);
        }

        #[cfg(feature = "pdf")]
        {
            PdfExtractor.extract(path)
        }
        #[cfg(not(feature = "pdf"))]
        {
            ensure_file(path)?;
            Err(extraction_error(path, "PDF support requires the `pdf` feature"))
        }
    }
}
