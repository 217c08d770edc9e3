//! Remote CMS adapter over GraphQL
//!
//! The layout lives on the landing-page entry as a JSON string field
//! (`layoutConfig`). Loads read it by slug; saves look the entry up once and
//! write the field back with a mutation.

use crate::adapter::PersistenceAdapter;
use crate::error::{PersistenceError, PersistenceResult};
use async_trait::async_trait;
use blockpage_layout::{LandingPage, LayoutDocument, PersistenceEnvelope};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const SPACE_ID_ENV: &str = "CONTENTFUL_SPACE_ID";
pub const ACCESS_TOKEN_ENV: &str = "CONTENTFUL_ACCESS_TOKEN";

const DEFAULT_ENDPOINT: &str = "https://graphql.contentful.com/content/v1/spaces";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const LANDING_PAGE_QUERY: &str = r#"
  query LandingPage($slug: String!) {
    landingPageCollection(where: { slug: $slug }, limit: 1) {
      items {
        sys {
          id
        }
        title
        slug
        layoutConfig
      }
    }
  }
"#;

pub const UPDATE_LAYOUT_CONFIG_MUTATION: &str = r#"
  mutation UpdateLayoutConfig($id: String!, $layoutConfig: String!) {
    updateLandingPage(id: $id, data: { layoutConfig: $layoutConfig }) {
      sys {
        id
      }
      layoutConfig
    }
  }
"#;

/// Connection settings for the CMS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    pub space_id: String,
    pub access_token: String,

    #[serde(default = "default_environment")]
    pub environment: String,

    /// Base URL override, mostly for self-hosted gateways
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_environment() -> String {
    "master".to_string()
}

impl RemoteConfig {
    pub fn new(space_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            access_token: access_token.into(),
            environment: default_environment(),
            endpoint: None,
        }
    }

    /// Read credentials from the environment; `None` unless both are set
    pub fn from_env() -> Option<Self> {
        let space_id = std::env::var(SPACE_ID_ENV).ok().filter(|v| !v.is_empty())?;
        let access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self::new(space_id, access_token))
    }

    pub fn graphql_url(&self) -> String {
        let base = self
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/');
        if self.environment == "master" {
            format!("{}/{}", base, self.space_id)
        } else {
            format!(
                "{}/{}/environments/{}",
                base, self.space_id, self.environment
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LandingPageData {
    landing_page_collection: Collection<LandingPageItem>,
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LandingPageItem {
    sys: Sys,
    title: String,
    slug: String,
    layout_config: Option<String>,
}

/// A landing page entry plus its raw stored layout
#[derive(Debug, Clone)]
pub struct RemotePage {
    pub page: LandingPage,
    pub layout_config: Option<String>,
}

/// Thin GraphQL client
pub struct ContentfulClient {
    url: String,
    access_token: String,
    client: reqwest::Client,
}

impl ContentfulClient {
    pub fn new(config: &RemoteConfig) -> PersistenceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            url: config.graphql_url(),
            access_token: config.access_token.clone(),
            client,
        })
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> PersistenceResult<T> {
        let response: GraphqlResponse<T> = self
            .client
            .post(&self.url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.errors.is_empty() {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(PersistenceError::Graphql(messages.join("; ")));
        }

        response
            .data
            .ok_or_else(|| PersistenceError::Graphql("response carried no data".to_string()))
    }

    pub async fn landing_page(&self, slug: &str) -> PersistenceResult<Option<RemotePage>> {
        let data: LandingPageData = self
            .request(LANDING_PAGE_QUERY, json!({ "slug": slug }))
            .await?;

        Ok(data
            .landing_page_collection
            .items
            .into_iter()
            .next()
            .map(|item| RemotePage {
                page: LandingPage {
                    id: item.sys.id,
                    title: item.title,
                    slug: item.slug,
                },
                layout_config: item.layout_config,
            }))
    }

    pub async fn update_layout_config(
        &self,
        entry_id: &str,
        layout_config: &str,
    ) -> PersistenceResult<()> {
        let _: Value = self
            .request(
                UPDATE_LAYOUT_CONFIG_MUTATION,
                json!({ "id": entry_id, "layoutConfig": layout_config }),
            )
            .await?;
        Ok(())
    }
}

/// Layout adapter backed by the CMS
///
/// Without credentials every read reports "nothing stored" and every write
/// fails with [`PersistenceError::NotConfigured`].
pub struct RemoteAdapter {
    client: Option<ContentfulClient>,
    entry_ids: Mutex<HashMap<String, String>>,
}

impl RemoteAdapter {
    pub fn new(config: Option<RemoteConfig>) -> PersistenceResult<Self> {
        let client = match config {
            Some(config) => Some(ContentfulClient::new(&config)?),
            None => None,
        };

        Ok(Self {
            client,
            entry_ids: Mutex::new(HashMap::new()),
        })
    }

    pub fn unconfigured() -> Self {
        Self {
            client: None,
            entry_ids: Mutex::new(HashMap::new()),
        }
    }

    /// Page metadata for rendering. Degrades to a placeholder page when the
    /// CMS is absent (`mock-<slug>`) or failing (`fallback-<slug>`); `None`
    /// only when the CMS answered and has no such page.
    pub async fn landing_page(&self, slug: &str) -> Option<LandingPage> {
        let Some(client) = &self.client else {
            return Some(LandingPage::placeholder(slug, "mock"));
        };

        match client.landing_page(slug).await {
            Ok(Some(remote)) => {
                self.remember_entry(slug, &remote.page.id);
                Some(remote.page)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to fetch landing page {}: {}", slug, e);
                Some(LandingPage::placeholder(slug, "fallback"))
            }
        }
    }

    fn remember_entry(&self, slug: &str, entry_id: &str) {
        if let Ok(mut ids) = self.entry_ids.lock() {
            ids.insert(slug.to_string(), entry_id.to_string());
        }
    }

    fn cached_entry(&self, slug: &str) -> Option<String> {
        self.entry_ids
            .lock()
            .ok()
            .and_then(|ids| ids.get(slug).cloned())
    }

    async fn entry_id(&self, client: &ContentfulClient, slug: &str) -> PersistenceResult<String> {
        if let Some(id) = self.cached_entry(slug) {
            return Ok(id);
        }

        let remote = client
            .landing_page(slug)
            .await?
            .ok_or_else(|| PersistenceError::PageNotFound(slug.to_string()))?;
        self.remember_entry(slug, &remote.page.id);
        Ok(remote.page.id)
    }
}

#[async_trait]
impl PersistenceAdapter for RemoteAdapter {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn load(&self, page_key: &str) -> PersistenceResult<Option<LayoutDocument>> {
        let Some(client) = &self.client else {
            return Ok(None);
        };

        let Some(remote) = client.landing_page(page_key).await? else {
            tracing::debug!("No landing page {} in the CMS", page_key);
            return Ok(None);
        };
        self.remember_entry(page_key, &remote.page.id);

        match remote.layout_config {
            Some(raw) if !raw.trim().is_empty() => {
                let document: LayoutDocument = serde_json::from_str(&raw)?;
                Ok(Some(document))
            }
            _ => Ok(None),
        }
    }

    async fn save(&self, envelope: &PersistenceEnvelope) -> PersistenceResult<()> {
        let client = self
            .client
            .as_ref()
            .ok_or(PersistenceError::NotConfigured("remote"))?;

        let entry_id = self.entry_id(client, &envelope.page_key).await?;
        let layout_config = serde_json::to_string(&envelope.document)?;
        client.update_layout_config(&entry_id, &layout_config).await?;

        tracing::info!(
            "Saved layout for {} to CMS entry {}",
            envelope.page_key,
            entry_id
        );
        Ok(())
    }
}
