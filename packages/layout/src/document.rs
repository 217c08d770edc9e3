//! # Layout Document
//!
//! The persisted and in-memory form of one page: an ordered list of
//! components plus version metadata. Pure data, no editing behaviour.
//!
//! ```text
//! LayoutDocument ──(+ savedAt, page key)──▶ PersistenceEnvelope ──▶ adapter
//! ```

use crate::{Component, ComponentType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Schema version written by this crate
pub const LAYOUT_VERSION: &str = "1.0";

/// Editor name recorded in `metadata.lastModifiedBy`
pub const PAGE_BUILDER: &str = "page-builder";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Component id must not be empty")]
    EmptyId,

    #[error("Duplicate component id: {0}")]
    DuplicateId(String),

    #[error("Version tag must not be empty")]
    MissingVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    pub components: Vec<Component>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LayoutMetadata>,
}

fn default_version() -> String {
    LAYOUT_VERSION.to_string()
}

/// Derived summary of a component list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetadata {
    pub total_components: usize,
    pub component_types: Vec<ComponentType>,
    pub last_modified_by: String,
}

impl LayoutMetadata {
    /// Recompute the summary from the live component list
    pub fn from_components(components: &[Component], last_modified_by: &str) -> Self {
        Self {
            total_components: components.len(),
            component_types: distinct_types(components),
            last_modified_by: last_modified_by.to_string(),
        }
    }
}

/// Quick summary used by tooling (`blockpage render --stats`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    pub total_components: usize,
    pub component_types: Vec<ComponentType>,
    pub last_updated: DateTime<Utc>,
    pub version: String,
}

impl LayoutDocument {
    /// Empty document at the current schema version
    pub fn empty() -> Self {
        Self::from_components(Vec::new(), PAGE_BUILDER)
    }

    /// Build a document around a component list, stamping fresh metadata
    pub fn from_components(components: Vec<Component>, last_modified_by: &str) -> Self {
        let metadata = LayoutMetadata::from_components(&components, last_modified_by);
        Self {
            components,
            updated_at: Utc::now(),
            version: default_version(),
            metadata: Some(metadata),
        }
    }

    /// Components sorted by `order`; ties keep array position
    pub fn ordered_components(&self) -> Vec<&Component> {
        let mut ordered: Vec<&Component> = self.components.iter().collect();
        ordered.sort_by_key(|component| component.order);
        ordered
    }

    pub fn stats(&self) -> LayoutStats {
        LayoutStats {
            total_components: self.components.len(),
            component_types: distinct_types(&self.components),
            last_updated: self.updated_at,
            version: self.version.clone(),
        }
    }

    /// Structural checks applied to documents coming from storage
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.version.trim().is_empty() {
            return Err(LayoutError::MissingVersion);
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if component.id.is_empty() {
                return Err(LayoutError::EmptyId);
            }
            if !seen.insert(component.id.as_str()) {
                return Err(LayoutError::DuplicateId(component.id.clone()));
            }
        }

        Ok(())
    }
}

fn distinct_types(components: &[Component]) -> Vec<ComponentType> {
    let mut types: Vec<ComponentType> = Vec::new();
    for component in components {
        if !types.contains(&component.kind) {
            types.push(component.kind.clone());
        }
    }
    types
}

/// What gets handed to a persistence adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceEnvelope {
    /// Page the document belongs to (slug)
    #[serde(skip)]
    pub page_key: String,

    #[serde(flatten)]
    pub document: LayoutDocument,

    pub saved_at: DateTime<Utc>,
}

impl PersistenceEnvelope {
    pub fn new(page_key: impl Into<String>, document: LayoutDocument) -> Self {
        Self {
            page_key: page_key.into(),
            document,
            saved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComponentData;
    use serde_json::json;

    fn component(id: &str, kind: ComponentType, order: usize) -> Component {
        let mut component = Component::new(id, kind.clone(), ComponentData::placeholder(&kind));
        component.order = order;
        component
    }

    #[test]
    fn test_metadata_is_recomputed() {
        let components = vec![
            component("a", ComponentType::Hero, 0),
            component("b", ComponentType::ImageGrid, 1),
            component("c", ComponentType::Hero, 2),
        ];

        let metadata = LayoutMetadata::from_components(&components, PAGE_BUILDER);
        assert_eq!(metadata.total_components, 3);
        assert_eq!(
            metadata.component_types,
            vec![ComponentType::Hero, ComponentType::ImageGrid]
        );
        assert_eq!(metadata.last_modified_by, "page-builder");
    }

    #[test]
    fn test_ordered_components_sorts_by_order() {
        let doc = LayoutDocument::from_components(
            vec![
                component("late", ComponentType::Hero, 2),
                component("early", ComponentType::TwoColumn, 0),
                component("middle", ComponentType::ImageGrid, 1),
            ],
            PAGE_BUILDER,
        );

        let ids: Vec<&str> = doc.ordered_components().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let doc = LayoutDocument::from_components(
            vec![
                component("dup", ComponentType::Hero, 0),
                component("dup", ComponentType::Hero, 1),
            ],
            PAGE_BUILDER,
        );
        assert_eq!(doc.validate(), Err(LayoutError::DuplicateId("dup".into())));
    }

    #[test]
    fn test_minimal_json_gets_defaults() {
        let doc: LayoutDocument = serde_json::from_value(json!({ "components": [] })).unwrap();
        assert_eq!(doc.version, LAYOUT_VERSION);
        assert!(doc.metadata.is_none());
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_missing_components_is_malformed() {
        let result: Result<LayoutDocument, _> =
            serde_json::from_value(json!({ "version": "1.0" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_envelope_flattens_document() {
        let envelope = PersistenceEnvelope::new("page-1", LayoutDocument::empty());
        let value = serde_json::to_value(&envelope).unwrap();

        assert!(value.get("components").is_some());
        assert!(value.get("savedAt").is_some());
        assert!(value.get("pageKey").is_none());

        // An envelope reads back as a plain document
        let doc: LayoutDocument = serde_json::from_value(value).unwrap();
        assert_eq!(doc.components.len(), 0);
    }
}
