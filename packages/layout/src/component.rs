use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content block placed on a page.
///
/// The set is closed, but documents written by other tools may carry type
/// strings we do not know. Those decode to `Unknown` (keeping the original
/// string) so a single bad block never poisons the whole layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Hero,
    TwoColumn,
    ImageGrid,
    Unknown(String),
}

impl ComponentType {
    /// Block types offered by the editor palette, in display order
    pub const PALETTE: [ComponentType; 3] = [
        ComponentType::Hero,
        ComponentType::TwoColumn,
        ComponentType::ImageGrid,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Hero => "hero",
            ComponentType::TwoColumn => "twoColumn",
            ComponentType::ImageGrid => "imageGrid",
            ComponentType::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ComponentType::Unknown(_))
    }

    /// Human readable name shown in the palette
    pub fn display_name(&self) -> &str {
        match self {
            ComponentType::Hero => "Hero Block",
            ComponentType::TwoColumn => "Two Column Row",
            ComponentType::ImageGrid => "2x2 Image Grid",
            ComponentType::Unknown(name) => name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ComponentType::Hero => "Large banner with heading, subtitle, and CTA",
            ComponentType::TwoColumn => "Content on left, image on right",
            ComponentType::ImageGrid => "Four images in a grid layout",
            ComponentType::Unknown(_) => "Unsupported block",
        }
    }
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "hero" => ComponentType::Hero,
            "twoColumn" => ComponentType::TwoColumn,
            "imageGrid" => ComponentType::ImageGrid,
            _ => ComponentType::Unknown(value),
        }
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        match value {
            ComponentType::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier wrapper used by the CMS (`{"sys": {"id": "..."}}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysRef {
    pub id: String,
}

/// Image reference carried by block payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub sys: SysRef,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub content_type: String,
}

impl ImageAsset {
    pub fn new(id: &str, title: &str, url: &str, width: u32, height: u32) -> Self {
        Self {
            sys: SysRef { id: id.to_string() },
            title: title.to_string(),
            description: None,
            url: url.to_string(),
            width,
            height,
            content_type: "image/jpeg".to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    pub heading: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_url: String,
    pub background_image: ImageAsset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoColumnData {
    pub left_heading: String,
    pub left_subtitle: String,
    pub left_cta_text: String,
    pub left_cta_url: String,
    pub right_image: ImageAsset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGridData {
    pub images: Vec<ImageAsset>,
}

/// Block payload. The JSON carries no tag of its own (the owning component's
/// `type` says what it should be), so decoding tries each shape in turn and
/// keeps anything unrecognized as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentData {
    Hero(HeroData),
    TwoColumn(TwoColumnData),
    ImageGrid(ImageGridData),
    Other(serde_json::Value),
}

/// A placed block instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ComponentType,

    /// Dense 0-based rank among siblings
    #[serde(default)]
    pub order: usize,

    pub data: ComponentData,
}

/// Borrowed view of a component whose `type` and payload agree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Block<'a> {
    Hero(&'a HeroData),
    TwoColumn(&'a TwoColumnData),
    ImageGrid(&'a ImageGridData),
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentType, data: ComponentData) -> Self {
        Self {
            id: id.into(),
            kind,
            order: 0,
            data,
        }
    }

    /// Typed payload, or `None` when the type is unknown or the payload does
    /// not have the shape the type requires.
    pub fn block(&self) -> Option<Block<'_>> {
        match (&self.kind, &self.data) {
            (ComponentType::Hero, ComponentData::Hero(data)) => Some(Block::Hero(data)),
            (ComponentType::TwoColumn, ComponentData::TwoColumn(data)) => {
                Some(Block::TwoColumn(data))
            }
            (ComponentType::ImageGrid, ComponentData::ImageGrid(data)) => {
                Some(Block::ImageGrid(data))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_hero_component() {
        let value = json!({
            "id": "hero-1",
            "type": "hero",
            "order": 0,
            "data": {
                "heading": "Hello",
                "subtitle": "World",
                "ctaText": "Go",
                "ctaUrl": "#",
                "backgroundImage": {
                    "sys": { "id": "bg" },
                    "title": "Background",
                    "url": "https://example.com/bg.jpg",
                    "width": 1200,
                    "height": 600,
                    "contentType": "image/jpeg"
                }
            }
        });

        let component: Component = serde_json::from_value(value).unwrap();
        assert_eq!(component.kind, ComponentType::Hero);
        match component.block() {
            Some(Block::Hero(hero)) => {
                assert_eq!(hero.heading, "Hello");
                assert_eq!(hero.background_image.id(), "bg");
                assert_eq!(hero.background_image.description, None);
            }
            other => panic!("expected hero block, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let value = json!({
            "id": "video-1",
            "type": "video",
            "order": 3,
            "data": { "src": "movie.mp4" }
        });

        let component: Component = serde_json::from_value(value).unwrap();
        assert_eq!(component.kind, ComponentType::Unknown("video".to_string()));
        assert!(matches!(component.data, ComponentData::Other(_)));
        assert!(component.block().is_none());

        // Original type string survives a round trip
        let encoded = serde_json::to_value(&component).unwrap();
        assert_eq!(encoded["type"], "video");
    }

    #[test]
    fn test_mismatched_payload_has_no_block() {
        let component = Component::new(
            "grid-1",
            ComponentType::ImageGrid,
            ComponentData::Other(json!({ "heading": "not a grid" })),
        );
        assert!(component.block().is_none());
    }

    #[test]
    fn test_type_strings() {
        assert_eq!(ComponentType::TwoColumn.to_string(), "twoColumn");
        assert_eq!(ComponentType::from("imageGrid".to_string()), ComponentType::ImageGrid);
        assert!(!ComponentType::Unknown("x".into()).is_known());
    }
}
