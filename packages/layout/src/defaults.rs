//! Built-in content: placeholder payloads for freshly dropped blocks and the
//! default page served when no storage tier has a layout.

use crate::{
    Component, ComponentData, ComponentType, HeroData, ImageAsset, ImageGridData, LayoutDocument,
    LayoutMetadata, TwoColumnData,
};
use chrono::Utc;

const HERO_IMAGE: &str =
    "https://images.pexels.com/photos/1591056/pexels-photo-1591056.jpeg?auto=compress&cs=tinysrgb&w=1200";
const FEATURE_IMAGE: &str =
    "https://images.pexels.com/photos/3184291/pexels-photo-3184291.jpeg?auto=compress&cs=tinysrgb&w=800";
const GRID_IMAGES: [&str; 4] = [
    "https://images.pexels.com/photos/3184360/pexels-photo-3184360.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/3184317/pexels-photo-3184317.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/3184321/pexels-photo-3184321.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/3184339/pexels-photo-3184339.jpeg?auto=compress&cs=tinysrgb&w=400",
];

/// Name recorded as the editor of the built-in page
pub const DEFAULT_CONFIG: &str = "default-config";

impl ComponentData {
    /// Payload given to a block dropped from the palette
    pub fn placeholder(kind: &ComponentType) -> Self {
        match kind {
            ComponentType::Hero => ComponentData::Hero(HeroData {
                heading: "Hero Heading".to_string(),
                subtitle: "Hero subtitle text goes here".to_string(),
                cta_text: "Get Started".to_string(),
                cta_url: "#".to_string(),
                background_image: ImageAsset::new(
                    "placeholder",
                    "Placeholder Image",
                    HERO_IMAGE,
                    1200,
                    600,
                ),
            }),
            ComponentType::TwoColumn => ComponentData::TwoColumn(TwoColumnData {
                left_heading: "Two Column Heading".to_string(),
                left_subtitle: "Description text for the left column".to_string(),
                left_cta_text: "Learn More".to_string(),
                left_cta_url: "#".to_string(),
                right_image: ImageAsset::new(
                    "placeholder",
                    "Placeholder Image",
                    FEATURE_IMAGE,
                    800,
                    600,
                ),
            }),
            ComponentType::ImageGrid => ComponentData::ImageGrid(ImageGridData {
                images: grid_images("placeholder", "Grid Image"),
            }),
            ComponentType::Unknown(_) => ComponentData::Other(serde_json::Value::Object(
                serde_json::Map::new(),
            )),
        }
    }
}

impl Component {
    /// New block of `kind` with placeholder content and a time-based id
    /// (`hero-1718000000000`)
    pub fn placeholder(kind: ComponentType) -> Self {
        let id = format!("{}-{}", kind, Utc::now().timestamp_millis());
        let data = ComponentData::placeholder(&kind);
        Component::new(id, kind, data)
    }
}

fn grid_images(id_prefix: &str, title_prefix: &str) -> Vec<ImageAsset> {
    GRID_IMAGES
        .iter()
        .enumerate()
        .map(|(i, url)| {
            ImageAsset::new(
                &format!("{}-{}", id_prefix, i + 1),
                &format!("{} {}", title_prefix, i + 1),
                url,
                400,
                400,
            )
        })
        .collect()
}

impl LayoutDocument {
    /// Page served when neither the remote CMS nor local storage has a layout
    pub fn default_page() -> Self {
        let hero = Component {
            id: "hero-default".to_string(),
            kind: ComponentType::Hero,
            order: 0,
            data: ComponentData::Hero(HeroData {
                heading: "Welcome to Our Landing Page".to_string(),
                subtitle: "This is a beautiful landing page built with our drag-and-drop page builder. Experience the power of visual content creation.".to_string(),
                cta_text: "Get Started".to_string(),
                cta_url: "#".to_string(),
                background_image: ImageAsset::new("hero-bg", "Hero Background", HERO_IMAGE, 1200, 600),
            }),
        };

        let two_column = Component {
            id: "two-col-default".to_string(),
            kind: ComponentType::TwoColumn,
            order: 1,
            data: ComponentData::TwoColumn(TwoColumnData {
                left_heading: "Build Beautiful Pages".to_string(),
                left_subtitle: "Our intuitive page builder makes it easy to create stunning landing pages without any coding knowledge. Drag, drop, and publish in minutes.".to_string(),
                left_cta_text: "Learn More".to_string(),
                left_cta_url: "#".to_string(),
                right_image: ImageAsset::new("feature-img", "Feature Image", FEATURE_IMAGE, 800, 600),
            }),
        };

        let grid = Component {
            id: "grid-default".to_string(),
            kind: ComponentType::ImageGrid,
            order: 2,
            data: ComponentData::ImageGrid(ImageGridData {
                images: grid_images("grid", "Gallery Image"),
            }),
        };

        let components = vec![hero, two_column, grid];
        let metadata = LayoutMetadata::from_components(&components, DEFAULT_CONFIG);

        LayoutDocument {
            components,
            metadata: Some(metadata),
            ..LayoutDocument::empty()
        }
    }
}
