//! Text extraction for uploaded documents
//!
//! Format-specific extractors turn a file on disk into ordered text
//! fragments, which are joined with newlines:
//! - PDF: one fragment per page (pdf_oxide)
//! - PPTX: one fragment per text-bearing shape, slide by slide (zip + quick-xml)
//!
//! Unsupported extensions produce empty text rather than an error; callers
//! decide whether empty text is acceptable.

pub mod pdf;
pub mod pptx;

pub use pdf::PdfExtractor;
pub use pptx::PptxExtractor;

use std::path::Path;

use crate::types::ExtractMode;
use crate::utils::normalize_extension;

/// Extraction failure for a supported document type
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read PDF: {0}")]
    Pdf(String),
    #[error("failed to read slide deck: {0}")]
    Pptx(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

/// Trait for format-specific text extraction
pub trait Extractor: Send + Sync {
    /// Extract ordered text fragments from the file at `path`
    fn fragments(&self, path: &Path, mode: ExtractMode) -> Result<Vec<String>>;

    /// File extensions this extractor handles (lower-case, no dot)
    fn supported_extensions(&self) -> &[&str];
}

/// Registry of extractors, picks the right one based on file extension
pub struct ExtractorRegistry {
    pdf: PdfExtractor,
    pptx: PptxExtractor,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            pdf: PdfExtractor::new(),
            pptx: PptxExtractor::new(),
        }
    }

    /// Extractor for an extension, if any
    pub fn for_extension(&self, ext: &str) -> Option<&dyn Extractor> {
        let ext = normalize_extension(ext);
        [&self.pdf as &dyn Extractor, &self.pptx as &dyn Extractor]
            .into_iter()
            .find(|e| e.supported_extensions().contains(&ext.as_str()))
    }

    /// Whether any extractor handles this extension
    pub fn is_supported(&self, ext: &str) -> bool {
        self.for_extension(ext).is_some()
    }

    /// Extract the file's text, fragments joined with `\n`
    pub fn extract(&self, path: &Path, ext: &str, mode: ExtractMode) -> Result<String> {
        let Some(extractor) = self.for_extension(ext) else {
            tracing::debug!(extension = %ext, "unsupported extension, returning empty text");
            return Ok(String::new());
        };

        let fragments = extractor.fragments(path, mode)?;
        tracing::debug!(
            extension = %ext,
            fragments = fragments.len(),
            "extracted document text"
        );
        Ok(fragments.join("\n"))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract text from `path` using the extractor registered for `ext`
pub fn extract_text(path: &Path, ext: &str, mode: ExtractMode) -> Result<String> {
    ExtractorRegistry::new().extract(path, ext, mode)
}

/// Apply the prompt-mode fragment policy: trim, drop empties
pub(crate) fn push_fragment(fragments: &mut Vec<String>, text: &str, mode: ExtractMode) {
    match mode {
        ExtractMode::Raw => fragments.push(text.to_string()),
        ExtractMode::Prompt => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                fragments.push(trimmed.to_string());
            }
        }
    }
}
