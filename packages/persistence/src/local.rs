//! Local key/value storage with rotating backups
//!
//! Every save writes the document under a fixed key and also drops a
//! timestamped backup next to it. Only the newest backups are kept.

use crate::adapter::PersistenceAdapter;
use crate::error::{PersistenceError, PersistenceResult};
use async_trait::async_trait;
use blockpage_layout::{LayoutDocument, PersistenceEnvelope};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const LAYOUT_KEY: &str = "layout-config";
pub const BACKUP_PREFIX: &str = "layout-backup-";
pub const DEFAULT_BACKUP_LIMIT: usize = 5;

/// Directory-backed string store, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PersistenceResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }

    pub async fn get_item(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temp file so readers never see a partial value
    pub async fn set_item(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).await?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    pub async fn remove_item(&self, key: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn keys(&self) -> PersistenceResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(key) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Layout adapter over [`LocalStorage`]
///
/// All pages share the one storage key, matching a single-page editor.
#[derive(Debug, Clone)]
pub struct LocalStorageAdapter {
    storage: LocalStorage,
    backup_limit: usize,
}

impl LocalStorageAdapter {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            backup_limit: DEFAULT_BACKUP_LIMIT,
        }
    }

    pub fn with_backup_limit(mut self, limit: usize) -> Self {
        self.backup_limit = limit;
        self
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Backup keys, newest first
    pub async fn backups(&self) -> PersistenceResult<Vec<String>> {
        let mut backups: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|key| key.starts_with(BACKUP_PREFIX))
            .collect();
        backups.sort_by(|a, b| b.cmp(a));
        Ok(backups)
    }

    /// Read a single backup back as a document
    pub async fn load_backup(&self, key: &str) -> PersistenceResult<Option<LayoutDocument>> {
        if !key.starts_with(BACKUP_PREFIX) {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        self.read_document(key).await
    }

    async fn read_document(&self, key: &str) -> PersistenceResult<Option<LayoutDocument>> {
        match self.storage.get_item(key).await? {
            Some(raw) => {
                let document: LayoutDocument = serde_json::from_str(&raw)?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn prune_backups(&self) -> PersistenceResult<()> {
        let backups = self.backups().await?;
        for stale in backups.iter().skip(self.backup_limit) {
            tracing::debug!("Removing stale backup {}", stale);
            self.storage.remove_item(stale).await?;
        }
        Ok(())
    }
}

/// Zero-padded so lexical order is chronological
fn backup_key(envelope: &PersistenceEnvelope) -> String {
    format!(
        "{}{:013}",
        BACKUP_PREFIX,
        envelope.saved_at.timestamp_millis().max(0)
    )
}

#[async_trait]
impl PersistenceAdapter for LocalStorageAdapter {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn load(&self, page_key: &str) -> PersistenceResult<Option<LayoutDocument>> {
        tracing::debug!("Loading layout for {} from {}", page_key, LAYOUT_KEY);
        self.read_document(LAYOUT_KEY).await
    }

    async fn save(&self, envelope: &PersistenceEnvelope) -> PersistenceResult<()> {
        let raw = serde_json::to_string(envelope)?;

        self.storage.set_item(LAYOUT_KEY, &raw).await?;
        self.storage.set_item(&backup_key(envelope), &raw).await?;
        self.prune_backups().await?;

        tracing::debug!(
            "Saved {} components locally for {}",
            envelope.document.components.len(),
            envelope.page_key
        );
        Ok(())
    }
}
