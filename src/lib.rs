#![deny(missing_docs)]

//! Core library for Contract Assistant: contract ingestion, summaries, and question answering.

/// Question answering: provider chain, keyword routing, and fuzzy retrieval.
pub mod answer;
/// HTTP routing and REST handlers.
pub mod api;
/// Optional capability handles and their error type.
pub mod capability;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction for PDF, DOCX, and TXT uploads.
pub mod extraction;
/// Hosted text-generation providers.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Activity metrics helpers.
pub mod metrics;
/// Contract processing pipeline utilities.
pub mod processing;
/// In-memory document registry.
pub mod store;
/// Translation capability for bilingual answers.
pub mod translation;
