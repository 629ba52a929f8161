//! Text extraction for uploaded contracts.
//!
//! Uploads arrive as raw bytes plus the extension declared by the client. PDFs go through a tiered
//! pipeline (text layer per page, OCR for blank pages, then a second PDF reader when nothing at all
//! was recovered); DOCX files are read paragraph by paragraph; plain text is decoded as UTF-8 with a
//! Latin-1 fallback. Whatever the path, blank output is rejected as [`ExtractionError::EmptyDocument`].

mod docx;
pub mod ocr;
pub mod pdf;
mod text;

use std::str::FromStr;
use thiserror::Error;

pub use ocr::{OcrEngine, PageImage, PageOcr, PageRasterizer, PdftoppmRasterizer, TesseractEngine};
pub use pdf::{FullTextReader, LopdfTextLayer, PageTextLayer, PdfExtractReader, PdfExtractor};

/// Errors that stop extraction. All of them are surfaced to the caller.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The declared extension is not one of `pdf`, `docx`, or `txt`.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    /// Every extraction tier produced blank text.
    #[error("No text found in document")]
    EmptyDocument,
    /// No parser in the chain could read the bytes.
    #[error("Failed to read {format} document: {message}")]
    Malformed {
        /// Format the bytes were declared as.
        format: DocumentFormat,
        /// Parser diagnostic.
        message: String,
    },
}

/// File formats accepted by the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
    /// Plain text.
    Txt,
}

impl DocumentFormat {
    /// Canonical lower-case extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    /// Derive the format from a file name, using the text after the last `.`.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = filename.rsplit('.').next().unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for DocumentFormat {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            _ => Err(ExtractionError::UnsupportedFormat(normalized)),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Text recovered from an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted text.
    pub text: String,
    /// Whether OCR was attempted for at least one page.
    pub used_fallback_ocr: bool,
}

/// Entry point for turning upload bytes into text.
pub struct Extractor {
    pdf: PdfExtractor,
}

impl Extractor {
    /// Build an extractor around a configured PDF pipeline.
    pub fn new(pdf: PdfExtractor) -> Self {
        Self { pdf }
    }

    /// Extract text from `bytes` declared with `extension`.
    pub fn extract(&self, bytes: &[u8], extension: &str) -> Result<Extraction, ExtractionError> {
        let format: DocumentFormat = extension.parse()?;
        tracing::debug!(format = %format, bytes = bytes.len(), "Extracting document text");

        let extraction = match format {
            DocumentFormat::Pdf => self.pdf.extract(bytes)?,
            DocumentFormat::Docx => Extraction {
                text: docx::extract_paragraphs(bytes)?,
                used_fallback_ocr: false,
            },
            DocumentFormat::Txt => Extraction {
                text: text::decode(bytes),
                used_fallback_ocr: false,
            },
        };

        if extraction.text.trim().is_empty() {
            tracing::warn!(format = %format, "Extraction produced no text");
            return Err(ExtractionError::EmptyDocument);
        }

        tracing::info!(
            format = %format,
            characters = extraction.text.chars().count(),
            ocr = extraction.used_fallback_ocr,
            "Document text extracted"
        );
        Ok(extraction)
    }
}
