use crate::error::{WorkspaceError, WorkspaceResult};
use crate::save_coordinator::SaveOutcome;
use crate::session::{EditorSession, SessionConfig};
use blockpage_compiler_html::{render_page, RenderOptions, RenderOutput};
use blockpage_persistence::{Hydration, Hydrator, PersistenceAdapter, RemoteAdapter};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

type SessionSlot = Arc<OnceCell<Arc<EditorSession>>>;

/// Shared state behind the HTTP API: storage backends plus one editor
/// session per open page
pub struct WorkspaceState {
    remote: Arc<RemoteAdapter>,
    local: Arc<dyn PersistenceAdapter>,
    hydrator: Hydrator,
    config: SessionConfig,
    render_options: RenderOptions,
    /// Per-slug slots; the map lock is never held while a page hydrates
    sessions: RwLock<HashMap<String, SessionSlot>>,
}

impl WorkspaceState {
    pub fn new(
        remote: Arc<RemoteAdapter>,
        local: Arc<dyn PersistenceAdapter>,
        config: SessionConfig,
    ) -> Self {
        let hydrator = Hydrator::new()
            .with_remote(remote.clone())
            .with_local(local.clone());

        Self {
            remote,
            local,
            hydrator,
            config,
            render_options: RenderOptions::default(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Saves go to the CMS when it is configured, otherwise to local storage
    pub fn save_target(&self) -> Arc<dyn PersistenceAdapter> {
        if self.remote.is_configured() {
            self.remote.clone()
        } else {
            self.local.clone()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Existing session for `slug`, or a freshly hydrated one.
    ///
    /// Only callers asking for the same slug wait on its hydration.
    pub async fn session(&self, slug: &str) -> WorkspaceResult<Arc<EditorSession>> {
        validate_slug(slug)?;

        let slot = self.slot(slug).await;
        let session = slot
            .get_or_try_init(|| async {
                EditorSession::open(slug, &self.hydrator, self.save_target(), &self.config)
                    .await
                    .map(Arc::new)
            })
            .await?;
        Ok(session.clone())
    }

    async fn slot(&self, slug: &str) -> SessionSlot {
        if let Some(slot) = self.sessions.read().await.get(slug) {
            return slot.clone();
        }

        self.sessions
            .write()
            .await
            .entry(slug.to_string())
            .or_default()
            .clone()
    }

    pub async fn open_sessions(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self
            .sessions
            .read()
            .await
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(slug, _)| slug.clone())
            .collect();
        slugs.sort();
        slugs
    }

    /// Durable layout for `slug`, bypassing any open session
    pub async fn hydrate(&self, slug: &str) -> WorkspaceResult<Hydration> {
        validate_slug(slug)?;
        Ok(self.hydrator.hydrate(slug).await)
    }

    /// Public landing page HTML built from durable storage
    pub async fn render_landing(&self, slug: &str) -> WorkspaceResult<RenderOutput> {
        validate_slug(slug)?;

        let page = self
            .remote
            .landing_page(slug)
            .await
            .ok_or_else(|| WorkspaceError::PageNotFound(slug.to_string()))?;
        let hydration = self.hydrator.hydrate(slug).await;

        Ok(render_page(
            &page,
            &hydration.document,
            self.render_options.clone(),
        ))
    }

    /// Flush and stop every session
    pub async fn close_all(&self) -> Vec<(String, WorkspaceResult<SaveOutcome>)> {
        let sessions: Vec<(String, Arc<EditorSession>)> = self
            .sessions
            .write()
            .await
            .drain()
            .filter_map(|(slug, slot)| slot.get().cloned().map(|session| (slug, session)))
            .collect();

        let mut results = Vec::with_capacity(sessions.len());
        for (slug, session) in sessions {
            let outcome = session.close().await;
            if let Err(e) = &outcome {
                tracing::error!("Failed to close session {}: {}", slug, e);
            }
            results.push((slug, outcome));
        }
        results
    }
}

fn validate_slug(slug: &str) -> WorkspaceResult<()> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(WorkspaceError::PageNotFound(slug.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blockpage_editor::LayoutMutation;
    use blockpage_layout::{LayoutDocument, PersistenceEnvelope};
    use blockpage_persistence::{MemoryAdapter, PersistenceResult};
    use std::time::Duration;
    use tokio::time::Instant;

    /// Local storage whose reads take a while
    struct SlowLoad {
        inner: MemoryAdapter,
        delay: Duration,
    }

    #[async_trait]
    impl PersistenceAdapter for SlowLoad {
        fn name(&self) -> &'static str {
            "slow-load"
        }

        async fn load(&self, page_key: &str) -> PersistenceResult<Option<LayoutDocument>> {
            tokio::time::sleep(self.delay).await;
            self.inner.load(page_key).await
        }

        async fn save(&self, envelope: &PersistenceEnvelope) -> PersistenceResult<()> {
            self.inner.save(envelope).await
        }
    }

    fn slow_state() -> Arc<WorkspaceState> {
        let local = Arc::new(SlowLoad {
            inner: MemoryAdapter::new(),
            delay: Duration::from_secs(5),
        });
        Arc::new(WorkspaceState::new(
            Arc::new(RemoteAdapter::unconfigured()),
            local,
            SessionConfig::default(),
        ))
    }

    fn state() -> (WorkspaceState, Arc<MemoryAdapter>) {
        let local = Arc::new(MemoryAdapter::new());
        let state = WorkspaceState::new(
            Arc::new(RemoteAdapter::unconfigured()),
            local.clone(),
            SessionConfig::default(),
        );
        (state, local)
    }

    #[tokio::test]
    async fn test_sessions_are_reused() {
        let (state, _) = state();

        let first = state.session("page-1").await.unwrap();
        first
            .apply(LayoutMutation::RemoveComponent {
                id: "hero-default".to_string(),
            })
            .unwrap();

        let second = state.session("page-1").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.state().unwrap().components.len(), 2);
        assert_eq!(state.open_sessions().await, vec!["page-1"]);
    }

    #[tokio::test]
    async fn test_rejects_bad_slugs() {
        let (state, _) = state();
        assert!(matches!(
            state.session("../etc").await,
            Err(WorkspaceError::PageNotFound(_))
        ));
        assert!(state.session("").await.is_err());
    }

    #[tokio::test]
    async fn test_close_all_flushes() {
        let (state, local) = state();
        let session = state.session("page-2").await.unwrap();
        session.apply(LayoutMutation::Undo).unwrap();
        session
            .apply(LayoutMutation::ReorderComponents {
                source_index: 2,
                destination_index: 0,
            })
            .unwrap();

        let results = state.close_all().await;
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].1, Ok(SaveOutcome::Saved)));
        assert_eq!(local.write_count(), 1);
        assert!(state.open_sessions().await.is_empty());
    }

    #[tokio::test]
    async fn test_render_landing_uses_placeholder_page() {
        let (state, _) = state();
        let output = state.render_landing("page-2").await.unwrap();

        assert!(output.html.contains("<title>Demo Landing Page 2</title>"));
        assert_eq!(output.rendered.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_page_not_blocked_by_hydrating_page() {
        let state = slow_state();
        state.session("page-1").await.unwrap();

        let opening = tokio::spawn({
            let state = state.clone();
            async move { state.session("page-2").await.map(|_| ()) }
        });
        tokio::task::yield_now().await;

        let start = Instant::now();
        let session = state.session("page-1").await.unwrap();
        session
            .apply(LayoutMutation::RemoveComponent {
                id: "hero-default".to_string(),
            })
            .unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(state.open_sessions().await, vec!["page-1"]);

        opening.await.unwrap().unwrap();
        assert_eq!(state.open_sessions().await, vec!["page-1", "page-2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_opens_share_one_session() {
        let state = slow_state();

        let (first, second) = tokio::join!(state.session("page-3"), state.session("page-3"));
        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
        assert_eq!(state.open_sessions().await, vec!["page-3"]);
    }
}
