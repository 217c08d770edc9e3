use crate::error::{PersistenceError, PersistenceResult};
use async_trait::async_trait;
use blockpage_layout::{LayoutDocument, PersistenceEnvelope};
use std::collections::HashMap;
use std::sync::Mutex;

/// Durable storage for layout documents.
///
/// Implementations must not panic when their backend is missing: an
/// unconfigured adapter answers `Ok(None)` to loads and
/// `Err(PersistenceError::NotConfigured)` to saves.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Short backend name used in logs and hydration reports
    fn name(&self) -> &'static str;

    /// Whether a backend is actually behind this adapter
    fn is_configured(&self) -> bool {
        true
    }

    async fn load(&self, page_key: &str) -> PersistenceResult<Option<LayoutDocument>>;

    async fn save(&self, envelope: &PersistenceEnvelope) -> PersistenceResult<()>;
}

/// In-memory adapter for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    documents: Mutex<HashMap<String, LayoutDocument>>,
    writes: Mutex<Vec<PersistenceEnvelope>>,
    failures: Mutex<usize>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the stored document for a page
    pub fn with_document(self, page_key: &str, document: LayoutDocument) -> Self {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(page_key.to_string(), document);
        }
        self
    }

    /// Make the next `count` saves fail
    pub fn fail_next_saves(&self, count: usize) {
        if let Ok(mut failures) = self.failures.lock() {
            *failures = count;
        }
    }

    /// Every envelope successfully written, oldest first
    pub fn writes(&self) -> Vec<PersistenceEnvelope> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|writes| writes.len()).unwrap_or(0)
    }
}

fn poisoned<T>(_: T) -> PersistenceError {
    PersistenceError::Rejected("memory store lock poisoned".to_string())
}

#[async_trait]
impl PersistenceAdapter for MemoryAdapter {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, page_key: &str) -> PersistenceResult<Option<LayoutDocument>> {
        let documents = self.documents.lock().map_err(poisoned)?;
        Ok(documents.get(page_key).cloned())
    }

    async fn save(&self, envelope: &PersistenceEnvelope) -> PersistenceResult<()> {
        {
            let mut failures = self.failures.lock().map_err(poisoned)?;
            if *failures > 0 {
                *failures -= 1;
                return Err(PersistenceError::Rejected("injected failure".to_string()));
            }
        }

        self.documents
            .lock()
            .map_err(poisoned)?
            .insert(envelope.page_key.clone(), envelope.document.clone());
        self.writes.lock().map_err(poisoned)?.push(envelope.clone());
        Ok(())
    }
}
