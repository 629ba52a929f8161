//! Contract service coordinating extraction, storage, summarization, and question answering.

use crate::{
    answer::{AnswerEngine, TokenSetRatio},
    capability::Capability,
    config::Config,
    extraction::{DocumentFormat, Extractor, PageOcr, PdfExtractor},
    generation::providers_from_config,
    metrics::{MetricsSnapshot, ServiceMetrics},
    processing::{
        sanitize::{sanitize_document_id, upload_extension},
        search,
        summarize::Summarizer,
        types::{ChatOutcome, ProcessingError, SummaryOutcome, UploadOutcome},
    },
    store::DocumentStore,
    translation::translator_from_config,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Coordinates the contract pipeline: upload extraction, in-memory storage, summaries, answers.
///
/// The service owns long-lived handles to the extractor, capability clients, document store, and
/// metrics so that both the HTTP surface and the CLI reuse the same components. Construct it once
/// near process start and share it through an `Arc`.
pub struct ContractService {
    extractor: Arc<Extractor>,
    store: DocumentStore,
    summarizer: Summarizer,
    answers: AnswerEngine,
    metrics: ServiceMetrics,
    max_upload_bytes: usize,
}

/// Abstraction over the contract pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait ContractApi: Send + Sync {
    /// Extract and store an uploaded file, returning its new identifier.
    async fn upload(
        &self,
        filename: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadOutcome, ProcessingError>;

    /// Summarize a stored document and remember the bullets for later questions.
    async fn summarize(&self, document_id: &str) -> Result<SummaryOutcome, ProcessingError>;

    /// Answer a question about a stored document.
    async fn ask(&self, document_id: &str, question: &str)
    -> Result<ChatOutcome, ProcessingError>;

    /// Keyword-in-context search over a stored document.
    async fn search(&self, document_id: &str, query: &str) -> Result<Vec<String>, ProcessingError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl ContractService {
    /// Assemble a service from explicit components.
    pub fn new(
        extractor: Extractor,
        summarizer: Summarizer,
        answers: AnswerEngine,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            extractor: Arc::new(extractor),
            store: DocumentStore::new(),
            summarizer,
            answers,
            metrics: ServiceMetrics::new(),
            max_upload_bytes,
        }
    }

    /// Build a service whose capabilities follow `config`.
    pub fn from_config(config: &Config) -> Self {
        let ocr: Capability<PageOcr> = if config.enable_ocr {
            tracing::info!(dpi = config.ocr_dpi, language = %config.ocr_language, "OCR fallback enabled");
            Capability::Available(PageOcr::tesseract(config.ocr_dpi, config.ocr_language.clone()))
        } else {
            Capability::Unavailable
        };
        let providers = providers_from_config(config);
        let translator = translator_from_config(config);
        let summarizer = Summarizer::new(
            providers.clone(),
            config.summary_chunk_chars,
            config.summary_chunk_overlap,
        );
        let answers = AnswerEngine::new(providers, translator, Arc::new(TokenSetRatio));

        Self::new(
            Extractor::new(PdfExtractor::with_ocr(ocr)),
            summarizer,
            answers,
            config.max_upload_bytes(),
        )
    }

    /// Stored text of a document, if present.
    pub fn document_text(&self, document_id: &str) -> Option<String> {
        self.store.get_text(&sanitize_document_id(document_id))
    }

    fn require_text(&self, document_id: &str) -> Result<(String, String), ProcessingError> {
        let id = sanitize_document_id(document_id);
        match self.store.get_text(&id) {
            Some(text) => Ok((id, text)),
            None => {
                tracing::debug!(document_id = %id, "Unknown document requested");
                Err(ProcessingError::DocumentNotFound(id))
            }
        }
    }

    /// Extract text from an upload and store it under a fresh identifier.
    pub async fn upload(
        &self,
        filename: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadOutcome, ProcessingError> {
        let extension = upload_extension(filename);
        // Reject unknown types before looking at the payload size.
        extension.parse::<DocumentFormat>()?;
        if bytes.len() > self.max_upload_bytes {
            tracing::warn!(size = bytes.len(), limit = self.max_upload_bytes, "Upload rejected");
            return Err(ProcessingError::UploadTooLarge {
                size: bytes.len(),
                limit: self.max_upload_bytes,
            });
        }

        let extractor = Arc::clone(&self.extractor);
        let extraction =
            tokio::task::spawn_blocking(move || extractor.extract(&bytes, &extension)).await??;

        let document_id = uuid::Uuid::new_v4().to_string();
        let num_characters = extraction.text.chars().count();
        self.store.put(&document_id, extraction.text);
        self.metrics.record_document(extraction.used_fallback_ocr);
        tracing::info!(
            document_id = %document_id,
            num_characters,
            ocr_used = extraction.used_fallback_ocr,
            documents = self.store.len(),
            "Document stored"
        );

        Ok(UploadOutcome {
            document_id,
            num_characters,
            ocr_used: extraction.used_fallback_ocr,
        })
    }

    /// Summarize a stored document.
    pub async fn summarize(&self, document_id: &str) -> Result<SummaryOutcome, ProcessingError> {
        let (document_id, text) = self.require_text(document_id)?;
        let summary = self.summarizer.summarize(&text).await?;
        self.store.put_summary(&document_id, summary.bullets.clone());
        self.metrics.record_summary();
        tracing::info!(
            document_id = %document_id,
            bullets = summary.bullets.len(),
            model = %summary.model_name,
            "Document summarized"
        );

        Ok(SummaryOutcome {
            document_id,
            summary: summary.bullets,
            model_name: summary.model_name,
        })
    }

    /// Answer a question about a stored document, using its summary when one exists.
    pub async fn ask(
        &self,
        document_id: &str,
        question: &str,
    ) -> Result<ChatOutcome, ProcessingError> {
        let (document_id, text) = self.require_text(document_id)?;
        let summary = self.store.get_summary(&document_id).unwrap_or_default();
        let answer = self.answers.answer(question, &text, &summary).await;
        self.metrics.record_answer(answer.from_provider());
        tracing::info!(document_id = %document_id, model = %answer.model_name, "Question answered");

        Ok(ChatOutcome {
            answer: answer.text,
            model_name: answer.model_name,
        })
    }

    /// Keyword-in-context search over a stored document.
    pub async fn search(
        &self,
        document_id: &str,
        query: &str,
    ) -> Result<Vec<String>, ProcessingError> {
        let (document_id, text) = self.require_text(document_id)?;
        let results = search::snippets(&text, query);
        tracing::debug!(document_id = %document_id, hits = results.len(), "Search finished");
        Ok(results)
    }

    /// Return the current activity metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl ContractApi for ContractService {
    async fn upload(
        &self,
        filename: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadOutcome, ProcessingError> {
        ContractService::upload(self, filename, bytes).await
    }

    async fn summarize(&self, document_id: &str) -> Result<SummaryOutcome, ProcessingError> {
        ContractService::summarize(self, document_id).await
    }

    async fn ask(
        &self,
        document_id: &str,
        question: &str,
    ) -> Result<ChatOutcome, ProcessingError> {
        ContractService::ask(self, document_id, question).await
    }

    async fn search(&self, document_id: &str, query: &str) -> Result<Vec<String>, ProcessingError> {
        ContractService::search(self, document_id, query).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        ContractService::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionError;

    fn service(max_upload_bytes: usize) -> ContractService {
        ContractService::new(
            Extractor::new(PdfExtractor::with_ocr(Capability::Unavailable)),
            Summarizer::new(Vec::new(), 6000, 400),
            AnswerEngine::local_only(),
            max_upload_bytes,
        )
    }

    #[tokio::test]
    async fn upload_rejects_unknown_extension_before_size() {
        let error = service(1)
            .upload(Some("notes.md"), vec![b'x'; 10])
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ProcessingError::Extraction(ExtractionError::UnsupportedFormat(ref ext)) if ext == "md"
        ));
    }

    #[tokio::test]
    async fn upload_enforces_size_limit() {
        let error = service(4)
            .upload(Some("notes.txt"), b"hello".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ProcessingError::UploadTooLarge { size: 5, limit: 4 }
        ));
    }

    #[tokio::test]
    async fn upload_counts_characters_not_bytes() {
        let service = service(1024);
        let outcome = service
            .upload(Some("Lease.TXT"), "किराया".as_bytes().to_vec())
            .await
            .unwrap();
        assert_eq!(outcome.num_characters, 6);
        assert!(!outcome.ocr_used);
        assert!(uuid::Uuid::parse_str(&outcome.document_id).is_ok());
        assert_eq!(service.document_text(&outcome.document_id).as_deref(), Some("किराया"));
        assert_eq!(service.metrics_snapshot().documents_ingested, 1);
    }

    #[tokio::test]
    async fn blank_upload_is_rejected_as_empty() {
        let error = service(1024)
            .upload(Some("blank.txt"), b"  \n ".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ProcessingError::Extraction(ExtractionError::EmptyDocument)
        ));
    }

    #[tokio::test]
    async fn unknown_document_is_reported() {
        let service = service(1024);
        assert!(matches!(
            service.summarize("missing").await,
            Err(ProcessingError::DocumentNotFound(ref id)) if id == "missing"
        ));
        assert!(matches!(
            service.ask("missing", "Who?").await,
            Err(ProcessingError::DocumentNotFound(_))
        ));
        assert!(matches!(
            service.search("missing", "x").await,
            Err(ProcessingError::DocumentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn summary_is_stored_and_used_by_answers() {
        let service = service(1024);
        let outcome = service
            .upload(Some("lease.txt"), b"Pets are not allowed on the property.".to_vec())
            .await
            .unwrap();

        let summary = service.summarize(&outcome.document_id).await.unwrap();
        assert_eq!(summary.summary.len(), 5);
        assert_eq!(summary.model_name, "local");

        let chat = service
            .ask(&outcome.document_id, "Are pets allowed on the property?")
            .await
            .unwrap();
        assert!(chat.answer.contains("Key contract points:"));
        assert_eq!(chat.model_name, "local");

        let metrics = service.metrics_snapshot();
        assert_eq!(metrics.summaries_generated, 1);
        assert_eq!(metrics.questions_answered, 1);
        assert_eq!(metrics.local_answers, 1);
    }

    #[tokio::test]
    async fn search_returns_snippets() {
        let service = service(1024);
        let outcome = service
            .upload(Some("lease.txt"), b"Rent is due monthly.".to_vec())
            .await
            .unwrap();
        let results = service.search(&outcome.document_id, "DUE").await.unwrap();
        assert_eq!(results, vec!["Rent is due monthly."]);
    }
}
