//! PDF text extraction using pdf_oxide.
//! One fragment per page, in file order.

use super::{push_fragment, ExtractError, Extractor, Result};
use crate::types::ExtractMode;
use std::path::Path;

/// Extract plain text from every page of a PDF file
pub fn extract_pages(pdf_path: &Path, mode: ExtractMode) -> Result<Vec<String>> {
    let mut doc = pdf_oxide::PdfDocument::open(pdf_path)
        .map_err(|e| ExtractError::Pdf(format!("failed to open PDF: {}", e)))?;

    let page_count = doc
        .page_count()
        .map_err(|e| ExtractError::Pdf(format!("failed to get page count: {}", e)))?;

    let mut pages = Vec::with_capacity(page_count);
    for page_idx in 0..page_count {
        match doc.extract_text(page_idx) {
            Ok(text) => push_fragment(&mut pages, &text, mode),
            Err(e) => {
                tracing::warn!(page = page_idx + 1, error = %e, "failed to extract PDF page");
            }
        }
    }

    Ok(pages)
}

/// PDF extractor
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PdfExtractor {
    fn fragments(&self, path: &Path, mode: ExtractMode) -> Result<Vec<String>> {
        extract_pages(path, mode)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PDF with one Helvetica text line per page; "" gives a blank page
    fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            String::new(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];
        let mut kids = Vec::new();
        for text in pages {
            let page_id = objects.len() + 1;
            kids.push(format!("{} 0 R", page_id));
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            ));
            let stream = if text.is_empty() {
                String::new()
            } else {
                format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text)
            };
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ));
        }
        objects[1] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        );

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }
        let xref_at = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{:010} 00000 n \n", offset));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }

    fn write_pdf(dir: &Path, pages: &[&str]) -> std::path::PathBuf {
        let path = dir.join("lecture.pdf");
        std::fs::write(&path, minimal_pdf(pages)).unwrap();
        path
    }

    #[test]
    fn test_zero_page_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &[]);

        assert!(extract_pages(&path, ExtractMode::Prompt).unwrap().is_empty());
        assert!(extract_pages(&path, ExtractMode::Raw).unwrap().is_empty());
    }

    #[test]
    fn test_blank_pages_skipped_in_prompt_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &["Hello page one", "", "Page three"]);

        let pages = extract_pages(&path, ExtractMode::Prompt).unwrap();
        assert_eq!(pages, vec!["Hello page one", "Page three"]);
    }

    #[test]
    fn test_blank_pages_kept_in_raw_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &["Hello page one", "", "Page three"]);

        let pages = extract_pages(&path, ExtractMode::Raw).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].trim(), "Hello page one");
        assert!(pages[1].trim().is_empty());
        assert_eq!(pages[2].trim(), "Page three");
    }

    #[test]
    fn test_supported_extensions() {
        let extractor = PdfExtractor::new();
        assert_eq!(extractor.supported_extensions(), &["pdf"]);
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let result = extract_pages(&path, ExtractMode::Prompt);
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = extract_pages(Path::new("/nonexistent/quizgen/missing.pdf"), ExtractMode::Raw);
        assert!(result.is_err());
    }
}
