//! Contract processing pipeline: chunking, summarization, search, and the service facade.

pub mod chunking;
pub mod sanitize;
pub mod search;
mod service;
pub mod summarize;
pub mod types;

pub use service::{ContractApi, ContractService};
pub use summarize::{Summarizer, Summary, fallback_summary, merge_bullets, merge_summaries};
pub use types::{ChatOutcome, ChunkingError, ProcessingError, SummaryOutcome, UploadOutcome};
