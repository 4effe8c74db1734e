//! Document text extraction.
//!
//! Uploaded files are turned into plain text before analysis. PDF, DOCX and
//! plain text are supported; anything else is rejected up front.

pub mod docx;
pub mod pdf;

use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while reading an uploaded document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: {0}. Please upload PDF, DOCX, or TXT.")]
    Unsupported(PathBuf),

    #[error("File is too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse PDF: {0}")]
    Pdf(String),

    #[error("Failed to parse DOCX: {0}")]
    Docx(String),

    #[error("Document contains no extractable text")]
    Empty,
}

/// Supported document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::PlainText => "text/plain",
        }
    }
}

/// Text pulled out of a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub kind: DocumentKind,
    pub text: String,
}

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

/// Decide the document kind from the leading bytes and the file name.
///
/// DOCX files are ZIP archives, so the extension is needed to tell them
/// apart from other Office formats.
pub fn detect_kind(path: &Path, header: &[u8]) -> Result<DocumentKind, ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    if header.starts_with(PDF_MAGIC) || ext.as_deref() == Some("pdf") {
        return Ok(DocumentKind::Pdf);
    }

    if header.starts_with(ZIP_MAGIC) {
        return match ext.as_deref() {
            Some("docx") => Ok(DocumentKind::Docx),
            _ => Err(ExtractError::Unsupported(path.to_path_buf())),
        };
    }

    match ext.as_deref() {
        Some(e) if TEXT_EXTENSIONS.contains(&e) => Ok(DocumentKind::PlainText),
        None if looks_like_utf8(header) => Ok(DocumentKind::PlainText),
        _ => Err(ExtractError::Unsupported(path.to_path_buf())),
    }
}

/// Valid UTF-8, allowing a character cut off at the end of the header.
fn looks_like_utf8(header: &[u8]) -> bool {
    match std::str::from_utf8(header) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

/// Extract trimmed plain text from the document at `path`.
pub fn extract_text(path: &Path, max_bytes: u64) -> Result<ExtractedDocument, ExtractError> {
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(ExtractError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::with_capacity(size as usize);
    std::fs::File::open(path)?.read_to_end(&mut bytes)?;

    let header = &bytes[..bytes.len().min(16)];
    let kind = detect_kind(path, header)?;
    info!("Extracting {} as {}", path.display(), kind.mime_type());

    let raw = match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(&bytes)?,
        DocumentKind::Docx => docx::extract_docx_text(&bytes)?,
        DocumentKind::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
    };

    let text = raw.trim().to_string();
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }

    debug!("Extracted {} characters", text.chars().count());
    Ok(ExtractedDocument { kind, text })
}
