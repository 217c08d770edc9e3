//! Three-tier layout hydration: remote, then local, then the built-in default

use crate::adapter::PersistenceAdapter;
use blockpage_layout::LayoutDocument;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Remote,
    Local,
    Default,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Remote => write!(f, "remote"),
            Tier::Local => write!(f, "local"),
            Tier::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "camelCase")]
pub enum TierOutcome {
    Served,
    /// Backend answered but holds nothing for this page
    Absent,
    /// No backend configured for this tier
    Unavailable,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierAttempt {
    pub tier: Tier,
    pub outcome: TierOutcome,
}

/// Result of hydration. Always carries a document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hydration {
    pub document: LayoutDocument,
    pub source: Tier,
    pub attempts: Vec<TierAttempt>,
}

#[derive(Clone, Default)]
pub struct Hydrator {
    remote: Option<Arc<dyn PersistenceAdapter>>,
    local: Option<Arc<dyn PersistenceAdapter>>,
}

impl Hydrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remote(mut self, adapter: Arc<dyn PersistenceAdapter>) -> Self {
        self.remote = Some(adapter);
        self
    }

    pub fn with_local(mut self, adapter: Arc<dyn PersistenceAdapter>) -> Self {
        self.local = Some(adapter);
        self
    }

    /// Never fails: every tier failure falls through to the next one and is
    /// recorded in [`Hydration::attempts`].
    pub async fn hydrate(&self, page_key: &str) -> Hydration {
        let mut attempts = Vec::with_capacity(3);

        for (tier, adapter) in [(Tier::Remote, &self.remote), (Tier::Local, &self.local)] {
            let outcome = match adapter {
                Some(adapter) if adapter.is_configured() => {
                    match try_tier(adapter.as_ref(), page_key).await {
                        Ok(Some(document)) => {
                            tracing::info!(
                                "Hydrated {} from {} ({} components)",
                                page_key,
                                tier,
                                document.components.len()
                            );
                            attempts.push(TierAttempt {
                                tier,
                                outcome: TierOutcome::Served,
                            });
                            return Hydration {
                                document,
                                source: tier,
                                attempts,
                            };
                        }
                        Ok(None) => TierOutcome::Absent,
                        Err(message) => {
                            tracing::warn!("{} hydration failed for {}: {}", tier, page_key, message);
                            TierOutcome::Failed(message)
                        }
                    }
                }
                _ => TierOutcome::Unavailable,
            };
            attempts.push(TierAttempt { tier, outcome });
        }

        tracing::info!("Hydrated {} from built-in default", page_key);
        attempts.push(TierAttempt {
            tier: Tier::Default,
            outcome: TierOutcome::Served,
        });
        Hydration {
            document: LayoutDocument::default_page(),
            source: Tier::Default,
            attempts,
        }
    }
}

async fn try_tier(
    adapter: &dyn PersistenceAdapter,
    page_key: &str,
) -> Result<Option<LayoutDocument>, String> {
    let document = adapter.load(page_key).await.map_err(|e| e.to_string())?;
    match document {
        Some(document) => {
            document.validate().map_err(|e| e.to_string())?;
            Ok(Some(document))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MemoryAdapter;
    use crate::remote::RemoteAdapter;
    use blockpage_layout::{Component, ComponentData, ComponentType};

    fn single_hero(id: &str) -> LayoutDocument {
        let kind = ComponentType::Hero;
        let data = ComponentData::placeholder(&kind);
        LayoutDocument::from_components(vec![Component::new(id, kind, data)], "test")
    }

    #[tokio::test]
    async fn test_remote_wins() {
        let remote = MemoryAdapter::new().with_document("page-1", single_hero("from-remote"));
        let local = MemoryAdapter::new().with_document("page-1", single_hero("from-local"));

        let hydration = Hydrator::new()
            .with_remote(Arc::new(remote))
            .with_local(Arc::new(local))
            .hydrate("page-1")
            .await;

        assert_eq!(hydration.source, Tier::Remote);
        assert_eq!(hydration.document.components[0].id, "from-remote");
        assert_eq!(hydration.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_remote_falls_to_local() {
        let local = MemoryAdapter::new().with_document("page-1", single_hero("from-local"));

        let hydration = Hydrator::new()
            .with_remote(Arc::new(RemoteAdapter::unconfigured()))
            .with_local(Arc::new(local))
            .hydrate("page-1")
            .await;

        assert_eq!(hydration.source, Tier::Local);
        assert_eq!(hydration.attempts[0].outcome, TierOutcome::Unavailable);
        assert_eq!(hydration.document.components[0].id, "from-local");
    }

    #[tokio::test]
    async fn test_default_when_nothing_stored() {
        let hydration = Hydrator::new()
            .with_local(Arc::new(MemoryAdapter::new()))
            .hydrate("page-1")
            .await;

        assert_eq!(hydration.source, Tier::Default);
        assert_eq!(hydration.document.components.len(), 3);
        assert_eq!(
            hydration.attempts.iter().map(|a| a.outcome.clone()).collect::<Vec<_>>(),
            vec![
                TierOutcome::Unavailable,
                TierOutcome::Absent,
                TierOutcome::Served
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_document_is_a_failure() {
        let mut broken = single_hero("dup");
        broken.components.push(broken.components[0].clone());
        let local = MemoryAdapter::new().with_document("page-1", broken);

        let hydration = Hydrator::new()
            .with_local(Arc::new(local))
            .hydrate("page-1")
            .await;

        assert_eq!(hydration.source, Tier::Default);
        assert!(matches!(hydration.attempts[1].outcome, TierOutcome::Failed(_)));
    }
}
