//! # Blockpage Layout
//!
//! Data model shared by every Blockpage crate: placed components, the layout
//! document that orders them, and the envelope handed to storage.
//!
//! ```rust,ignore
//! use blockpage_layout::{Component, ComponentType, LayoutDocument};
//!
//! let doc: LayoutDocument = serde_json::from_str(&json)?;
//! for component in doc.ordered_components() {
//!     println!("{} ({})", component.id, component.kind);
//! }
//! ```

mod component;
mod defaults;
mod document;
mod page;

pub use component::{
    Block, Component, ComponentData, ComponentType, HeroData, ImageAsset, ImageGridData, SysRef,
    TwoColumnData,
};
pub use defaults::DEFAULT_CONFIG;
pub use document::{
    LayoutDocument, LayoutError, LayoutMetadata, LayoutStats, PersistenceEnvelope, LAYOUT_VERSION,
    PAGE_BUILDER,
};
pub use page::LandingPage;
