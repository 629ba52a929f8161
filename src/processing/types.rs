//! Core data types and error definitions for the processing pipeline.

use crate::extraction::ExtractionError;
use serde::Serialize;
use thiserror::Error;

/// Errors produced while splitting text into windows.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// Caller configured an impossible window size.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the document processing pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Text could not be recovered from the upload.
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    /// Chunking step rejected its parameters.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// No document is registered under the requested id.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    /// Upload exceeded the configured byte limit.
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    UploadTooLarge {
        /// Size of the rejected upload.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
    /// Blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    /// Identifier assigned to the stored document.
    pub document_id: String,
    /// Number of characters recovered from the upload.
    pub num_characters: usize,
    /// Whether any page needed OCR.
    pub ocr_used: bool,
}

/// Result of summarizing a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryOutcome {
    /// Identifier of the summarized document.
    pub document_id: String,
    /// Bullet points, at most ten.
    pub summary: Vec<String>,
    /// Tier that produced the summary.
    pub model_name: String,
}

/// Result of answering a question about a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatOutcome {
    /// Answer text; always present, even when nothing matched.
    pub answer: String,
    /// Tier that produced the answer.
    pub model_name: String,
}
