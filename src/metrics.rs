use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing document and question activity.
#[derive(Default)]
pub struct ServiceMetrics {
    documents_ingested: AtomicU64,
    ocr_documents: AtomicU64,
    summaries_generated: AtomicU64,
    provider_answers: AtomicU64,
    local_answers: AtomicU64,
}

impl ServiceMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an ingested document and whether OCR was needed to read it.
    pub fn record_document(&self, used_ocr: bool) {
        self.documents_ingested.fetch_add(1, Ordering::Relaxed);
        if used_ocr {
            self.ocr_documents.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a completed summary.
    pub fn record_summary(&self) {
        self.summaries_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an answered question, split by whether a hosted provider produced it.
    pub fn record_answer(&self, from_provider: bool) {
        let counter = if from_provider {
            &self.provider_answers
        } else {
            &self.local_answers
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let provider_answers = self.provider_answers.load(Ordering::Relaxed);
        let local_answers = self.local_answers.load(Ordering::Relaxed);
        MetricsSnapshot {
            documents_ingested: self.documents_ingested.load(Ordering::Relaxed),
            ocr_documents: self.ocr_documents.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            questions_answered: provider_answers + local_answers,
            local_answers,
        }
    }
}

/// Immutable view of activity counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents that have been ingested since startup.
    pub documents_ingested: u64,
    /// Ingested documents that needed OCR for at least one page.
    pub ocr_documents: u64,
    /// Number of summaries produced.
    pub summaries_generated: u64,
    /// Number of questions answered by any tier.
    pub questions_answered: u64,
    /// Questions answered by the local fuzzy-match tier.
    pub local_answers: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_and_ocr_usage() {
        let metrics = ServiceMetrics::new();
        metrics.record_document(false);
        metrics.record_document(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_ingested, 2);
        assert_eq!(snapshot.ocr_documents, 1);
    }

    #[test]
    fn answers_are_split_by_tier() {
        let metrics = ServiceMetrics::new();
        metrics.record_answer(true);
        metrics.record_answer(false);
        metrics.record_answer(false);
        metrics.record_summary();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.questions_answered, 3);
        assert_eq!(snapshot.local_answers, 2);
        assert_eq!(snapshot.summaries_generated, 1);
    }

    #[test]
    fn snapshot_is_consistent() {
        let metrics = ServiceMetrics::new();
        assert_eq!(metrics.snapshot().documents_ingested, 0);
        assert_eq!(metrics.snapshot().questions_answered, 0);
    }
}
