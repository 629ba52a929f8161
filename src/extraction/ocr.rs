//! OCR fallback for PDF pages without a text layer.
//!
//! A page is rasterized by a [`PageRasterizer`] and the image is handed to an [`OcrEngine`]. The
//! default implementations drive the `pdftoppm` (poppler) and `tesseract` binaries through
//! temporary files; a missing binary is reported as [`CapabilityError::Unavailable`].

use crate::capability::CapabilityError;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;

/// A rasterized PDF page.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// One-based page number within the source PDF.
    pub page_number: u32,
    /// PNG-encoded image data.
    pub png: Vec<u8>,
}

/// Renders a single PDF page to an image.
pub trait PageRasterizer: Send + Sync {
    /// Rasterize `page_number` (one-based) of `pdf` at `dpi`.
    fn rasterize(&self, pdf: &[u8], page_number: u32, dpi: u32)
    -> Result<PageImage, CapabilityError>;
}

/// Recognizes text in a page image.
pub trait OcrEngine: Send + Sync {
    /// Return the text recognized in `image`.
    fn recognize(&self, image: &PageImage) -> Result<String, CapabilityError>;
}

/// Rasterizer plus recognizer, applied to one page at a time.
#[derive(Clone)]
pub struct PageOcr {
    rasterizer: Arc<dyn PageRasterizer>,
    engine: Arc<dyn OcrEngine>,
    dpi: u32,
}

impl PageOcr {
    /// Combine a rasterizer and an engine at a fixed resolution.
    pub fn new(rasterizer: Arc<dyn PageRasterizer>, engine: Arc<dyn OcrEngine>, dpi: u32) -> Self {
        Self {
            rasterizer,
            engine,
            dpi,
        }
    }

    /// Default poppler + tesseract pipeline.
    pub fn tesseract(dpi: u32, language: impl Into<String>) -> Self {
        Self::new(
            Arc::new(PdftoppmRasterizer),
            Arc::new(TesseractEngine::new(language)),
            dpi,
        )
    }

    /// Rasterize and recognize a single page.
    pub fn recognize_page(&self, pdf: &[u8], page_number: u32) -> Result<String, CapabilityError> {
        let image = self.rasterizer.rasterize(pdf, page_number, self.dpi)?;
        self.engine.recognize(&image)
    }
}

/// Rasterizer backed by poppler's `pdftoppm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdftoppmRasterizer;

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(
        &self,
        pdf: &[u8],
        page_number: u32,
        dpi: u32,
    ) -> Result<PageImage, CapabilityError> {
        let workdir = tempfile::tempdir().map_err(|error| {
            CapabilityError::Failed(format!("failed to create OCR workspace: {error}"))
        })?;
        let input = workdir.path().join("input.pdf");
        std::fs::write(&input, pdf).map_err(|error| {
            CapabilityError::Failed(format!("failed to stage PDF for rasterization: {error}"))
        })?;
        let prefix = workdir.path().join("page");
        let page = page_number.to_string();

        let output = Command::new("pdftoppm")
            .arg("-r")
            .arg(dpi.to_string())
            .args(["-f", &page, "-l", &page, "-png", "-singlefile"])
            .arg(&input)
            .arg(&prefix)
            .output();
        check_output("pdftoppm", output)?;

        let png = std::fs::read(prefix.with_extension("png")).map_err(|error| {
            CapabilityError::InvalidResponse(format!(
                "pdftoppm produced no image for page {page_number}: {error}"
            ))
        })?;
        Ok(PageImage { page_number, png })
    }
}

/// OCR engine backed by the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language: String,
}

impl TesseractEngine {
    /// Create an engine for the given tesseract language code (for example `eng`).
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &PageImage) -> Result<String, CapabilityError> {
        let workdir = tempfile::tempdir().map_err(|error| {
            CapabilityError::Failed(format!("failed to create OCR workspace: {error}"))
        })?;
        let path = workdir.path().join("page.png");
        std::fs::write(&path, &image.png).map_err(|error| {
            CapabilityError::Failed(format!("failed to stage page image: {error}"))
        })?;

        let output = run_tesseract(&path, &self.language);
        let output = check_output("tesseract", output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn run_tesseract(image: &Path, language: &str) -> std::io::Result<Output> {
    Command::new("tesseract")
        .arg(image)
        .arg("stdout")
        .args(["-l", language])
        .output()
}

fn check_output(tool: &str, output: std::io::Result<Output>) -> Result<Output, CapabilityError> {
    match output {
        Ok(output) if output.status.success() => Ok(output),
        Ok(output) => Err(CapabilityError::Failed(format!(
            "{tool} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
        Err(error) if error.kind() == ErrorKind::NotFound => Err(CapabilityError::Unavailable(
            format!("{tool} is not installed"),
        )),
        Err(error) => Err(CapabilityError::Failed(format!(
            "failed to launch {tool}: {error}"
        ))),
    }
}
