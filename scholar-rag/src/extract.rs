//! Plain-text extraction from source files.
//!
//! The indexer only consumes plain text; turning a PDF into text is delegated
//! to a [`TextExtractor`]. With the `pdf` feature, [`PdfTextExtractor`] uses
//! the `pdf-extract` crate.

use std::path::{Path, PathBuf};

use crate::error::{RagError, Result};

/// File suffix of the papers picked up from the input folder.
pub const PDF_SUFFIX: &str = ".pdf";

/// Turns a file on disk into plain text.
///
/// Extraction is blocking; callers run it on a blocking thread.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of the file at `path`.
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Reads the file as UTF-8 text. Useful for pre-extracted corpora and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| RagError::ExtractionError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Extracts text from PDF files with `pdf-extract`.
///
/// Pages are separated by a newline; form feeds inserted between pages are
/// replaced so line-based metadata extraction sees ordinary lines.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| RagError::ExtractionError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            RagError::ExtractionError { path: path.display().to_string(), message: e.to_string() }
        })?;
        Ok(text.replace('\x0C', "\n"))
    }
}

/// The extractor used when none is configured.
#[cfg(feature = "pdf")]
pub fn default_extractor() -> Box<dyn TextExtractor> {
    Box::new(PdfTextExtractor)
}

/// The extractor used when none is configured.
#[cfg(not(feature = "pdf"))]
pub fn default_extractor() -> Box<dyn TextExtractor> {
    Box::new(PlainTextExtractor)
}

/// Whether a file name has the `.pdf` suffix (case-sensitive).
pub fn is_pdf(file_name: &str) -> bool {
    file_name.ends_with(PDF_SUFFIX)
}

/// List the `.pdf` file names directly inside `dir`, sorted by name.
///
/// Subdirectories and non-UTF-8 names are skipped.
pub fn list_pdf_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_pdf(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Join a file name onto the input folder.
pub fn source_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pdf_suffix_is_accepted() {
        assert!(is_pdf("paper1.pdf"));
        assert!(!is_pdf("paper1.PDF"));
        assert!(!is_pdf("notes.txt"));
        assert!(!is_pdf("pdf"));
    }

    #[test]
    fn lists_sorted_pdf_files_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.pdf", "readme.md"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        assert_eq!(list_pdf_files(dir.path()).unwrap(), ["a.pdf", "b.pdf"]);
    }

    #[test]
    fn plain_text_extractor_reports_missing_files() {
        let err = PlainTextExtractor.extract(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, RagError::ExtractionError { .. }));
    }
}
