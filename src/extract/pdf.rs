//! PDF text extraction backed by `pdf-extract`.

use super::ExtractError;
use std::panic::{self, AssertUnwindSafe};

/// Extract the text of every page, pages joined by newlines.
///
/// `pdf-extract` can panic on malformed input, so the call is isolated and
/// a panic is reported as a parse error.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractError::Pdf("parser panicked on malformed input".to_string()))?;

    let pages = result.map_err(|e| ExtractError::Pdf(e.to_string()))?;

    Ok(pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}
