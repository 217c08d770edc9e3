use crate::{render_document, render_page, RenderOptions, SkipReason};
use blockpage_layout::{
    Component, ComponentData, ComponentType, ImageAsset, ImageGridData, LandingPage,
    LayoutDocument,
};
use serde_json::json;

fn grid_with(count: usize) -> Component {
    let images = (0..count)
        .map(|i| {
            ImageAsset::new(
                &format!("img-{}", i),
                &format!("Image {}", i),
                &format!("https://example.com/{}.jpg", i),
                400,
                400,
            )
        })
        .collect();
    Component::new(
        "grid-1",
        ComponentType::ImageGrid,
        ComponentData::ImageGrid(ImageGridData { images }),
    )
}

#[test]
fn test_render_default_page_in_order() {
    let mut document = LayoutDocument::default_page();
    // Stored order wins over array position
    document.components.reverse();

    let output = render_document(&document, RenderOptions::default());

    println!("Generated HTML:\n{}", output.html);

    assert_eq!(
        output.rendered,
        vec!["hero-default", "two-col-default", "grid-default"]
    );
    assert!(output.skipped.is_empty());

    let hero = output.html.find("class=\"hero\"").unwrap();
    let two_column = output.html.find("class=\"two-column\"").unwrap();
    let grid = output.html.find("class=\"image-grid\"").unwrap();
    assert!(hero < two_column && two_column < grid);
    assert!(output.html.contains("Welcome to Our Landing Page"));
}

#[test]
fn test_unknown_type_is_skipped() {
    let document: LayoutDocument = serde_json::from_value(json!({
        "components": [
            { "id": "v1", "type": "video", "order": 0, "data": { "src": "clip.mp4" } },
            { "id": "g1", "type": "imageGrid", "order": 1, "data": { "images": [] } }
        ]
    }))
    .unwrap();

    let output = render_document(&document, RenderOptions::default());

    assert_eq!(output.rendered, vec!["g1"]);
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].id, "v1");
    assert_eq!(output.skipped[0].kind, "video");
    assert_eq!(output.skipped[0].reason, SkipReason::UnknownType);
    assert!(!output.html.contains("clip.mp4"));
}

#[test]
fn test_mismatched_data_is_skipped() {
    let mut component = grid_with(1);
    component.kind = ComponentType::Hero;
    let document = LayoutDocument::from_components(vec![component], "test");

    let output = render_document(&document, RenderOptions::default());
    assert!(output.rendered.is_empty());
    assert_eq!(output.skipped[0].reason, SkipReason::DataMismatch);
}

#[test]
fn test_grid_renders_at_most_four_images() {
    let document = LayoutDocument::from_components(vec![grid_with(6)], "test");
    let output = render_document(&document, RenderOptions::default());

    assert_eq!(output.html.matches("<img ").count(), 4);
    assert!(output.html.contains("img-3"));
    assert!(!output.html.contains("img-4"));
}

#[test]
fn test_text_is_escaped() {
    let kind = ComponentType::Hero;
    let mut component = Component::new("h1", kind.clone(), ComponentData::placeholder(&kind));
    if let ComponentData::Hero(hero) = &mut component.data {
        hero.heading = "<script>alert('x')</script> & more".to_string();
    }
    let document = LayoutDocument::from_components(vec![component], "test");

    let output = render_document(&document, RenderOptions::default());
    assert!(output
        .html
        .contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
    assert!(!output.html.contains("<script>"));
}

#[test]
fn test_full_page_metadata() {
    let page = LandingPage::placeholder("page-1", "mock");
    let output = render_page(&page, &LayoutDocument::default_page(), RenderOptions::default());

    assert!(output.html.starts_with("<!DOCTYPE html>"));
    assert!(output.html.contains("<title>Demo Landing Page 1</title>"));
    assert!(output
        .html
        .contains("Demo Landing Page 1 - Built with our page builder"));
    assert!(output.html.contains("application/ld+json"));
    assert!(output.html.contains("\"BreadcrumbList\""));
    assert!(output
        .html
        .contains("http://localhost:3000/landing/page-1"));
    assert!(!output.html.contains("No components configured"));
    assert_eq!(output.rendered.len(), 3);
}

#[test]
fn test_empty_page_shows_message() {
    let page = LandingPage::placeholder("page-2", "mock");
    let output = render_page(&page, &LayoutDocument::empty(), RenderOptions::default());

    assert!(output.html.contains("<title>Demo Landing Page 2</title>"));
    assert!(output.html.contains("No components configured"));
    assert!(output.rendered.is_empty());
}

#[test]
fn test_compact_output() {
    let options = RenderOptions {
        pretty: false,
        ..RenderOptions::default()
    };
    let output = render_document(&LayoutDocument::default_page(), options);
    assert!(!output.html.contains('\n'));
}
