//! # Blockpage Persistence
//!
//! Storage backends for layout documents and the hydration chain that picks
//! between them.
//!
//! - [`LocalStorageAdapter`]: fixed-key local store with rotating backups
//! - [`RemoteAdapter`]: GraphQL CMS entry field
//! - [`MemoryAdapter`]: in-process store for tests
//! - [`Hydrator`]: remote, then local, then the built-in default page

mod adapter;
mod error;
mod hydrate;
mod local;
mod remote;

pub use adapter::{MemoryAdapter, PersistenceAdapter};
pub use error::{PersistenceError, PersistenceResult};
pub use hydrate::{Hydration, Hydrator, Tier, TierAttempt, TierOutcome};
pub use local::{
    LocalStorage, LocalStorageAdapter, BACKUP_PREFIX, DEFAULT_BACKUP_LIMIT, LAYOUT_KEY,
};
pub use remote::{
    ContentfulClient, RemoteAdapter, RemoteConfig, RemotePage, ACCESS_TOKEN_ENV,
    LANDING_PAGE_QUERY, SPACE_ID_ENV, UPDATE_LAYOUT_CONFIG_MUTATION,
};
