//! Tiered PDF text extraction.
//!
//! 1. Read the text layer page by page with the primary parser.
//! 2. For every page whose text layer is blank, rasterize and OCR that page only.
//! 3. If the assembled document is still blank, re-read the raw bytes with a second PDF reader
//!    and keep whatever it yields, without OCR.
//!
//! Pages are joined with a blank line.

use super::ocr::PageOcr;
use super::{DocumentFormat, Extraction, ExtractionError};
use crate::capability::Capability;

const PAGE_SEPARATOR: &str = "\n\n";

/// Page-level access to a PDF text layer.
pub trait PageTextLayer: Send + Sync {
    /// Return the text of every page in order. Unreadable pages are returned as empty strings.
    fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Whole-document PDF reader used as the last tier.
pub trait FullTextReader: Send + Sync {
    /// Return the text of every page in order.
    fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Primary text layer backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfTextLayer;

impl PageTextLayer for LopdfTextLayer {
    fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let document = lopdf::Document::load_mem(pdf).map_err(|error| malformed(error.to_string()))?;
        let pages = document
            .get_pages()
            .into_keys()
            .map(|page_number| {
                document
                    .extract_text(&[page_number])
                    .unwrap_or_else(|error| {
                        tracing::debug!(page = page_number, error = %error, "Page text layer unreadable");
                        String::new()
                    })
            })
            .collect();
        Ok(pages)
    }
}

/// Secondary reader backed by `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractReader;

impl FullTextReader for PdfExtractReader {
    fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
        pdf_extract::extract_text_from_mem_by_pages(pdf).map_err(|error| malformed(format!("{error:?}")))
    }
}

fn malformed(message: String) -> ExtractionError {
    ExtractionError::Malformed {
        format: DocumentFormat::Pdf,
        message,
    }
}

/// PDF pipeline with injected parsers and an optional OCR capability.
pub struct PdfExtractor {
    primary: Box<dyn PageTextLayer>,
    ocr: Capability<PageOcr>,
    secondary: Box<dyn FullTextReader>,
}

impl PdfExtractor {
    /// Assemble a pipeline from its tiers.
    pub fn new(
        primary: Box<dyn PageTextLayer>,
        ocr: Capability<PageOcr>,
        secondary: Box<dyn FullTextReader>,
    ) -> Self {
        Self {
            primary,
            ocr,
            secondary,
        }
    }

    /// Default pipeline: `lopdf`, the given OCR capability, then `pdf-extract`.
    pub fn with_ocr(ocr: Capability<PageOcr>) -> Self {
        Self::new(Box::new(LopdfTextLayer), ocr, Box::new(PdfExtractReader))
    }

    /// Run every tier until one yields text.
    pub fn extract(&self, pdf: &[u8]) -> Result<Extraction, ExtractionError> {
        let (direct, used_fallback_ocr) = match self.primary.page_texts(pdf) {
            Ok(pages) => self.assemble_pages(pdf, pages),
            Err(error) => {
                tracing::warn!(error = %error, "Primary PDF parser failed; trying secondary reader");
                (String::new(), false)
            }
        };

        if !direct.trim().is_empty() {
            return Ok(Extraction {
                text: direct,
                used_fallback_ocr,
            });
        }

        tracing::info!("No text recovered from text layer or OCR; trying secondary PDF reader");
        let text = self
            .secondary
            .page_texts(pdf)?
            .into_iter()
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR);
        Ok(Extraction {
            text,
            used_fallback_ocr,
        })
    }

    fn assemble_pages(&self, pdf: &[u8], pages: Vec<String>) -> (String, bool) {
        let mut parts = Vec::with_capacity(pages.len());
        let mut used_fallback_ocr = false;

        for (index, page_text) in pages.into_iter().enumerate() {
            if !page_text.trim().is_empty() {
                parts.push(page_text);
                continue;
            }

            let Some(ocr) = self.ocr.as_available() else {
                tracing::debug!(page = index + 1, "Blank page and OCR disabled; skipping");
                continue;
            };
            used_fallback_ocr = true;
            let page_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
            match ocr.recognize_page(pdf, page_number) {
                Ok(text) if !text.is_empty() => {
                    tracing::debug!(page = page_number, characters = text.len(), "OCR recovered page text");
                    parts.push(text);
                }
                Ok(_) => tracing::debug!(page = page_number, "OCR found no text"),
                Err(error) => {
                    tracing::warn!(page = page_number, error = %error, "OCR fallback failed for page");
                }
            }
        }

        (parts.join(PAGE_SEPARATOR), used_fallback_ocr)
    }
}
