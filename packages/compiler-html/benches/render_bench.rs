use blockpage_compiler_html::{render_page, RenderOptions};
use blockpage_layout::{Component, ComponentType, LandingPage, LayoutDocument};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_render_default_page(c: &mut Criterion) {
    let page = LandingPage::placeholder("page-1", "mock");
    let document = LayoutDocument::default_page();

    c.bench_function("render_default_page", |b| {
        b.iter(|| render_page(black_box(&page), black_box(&document), RenderOptions::default()))
    });
}

fn bench_render_long_page(c: &mut Criterion) {
    let page = LandingPage::placeholder("page-2", "mock");
    let components = (0..60)
        .map(|i| {
            let kind = ComponentType::PALETTE[i % 3].clone();
            let mut component = Component::placeholder(kind);
            component.id = format!("block-{}", i);
            component.order = i;
            component
        })
        .collect();
    let document = LayoutDocument::from_components(components, "bench");

    c.bench_function("render_60_blocks", |b| {
        b.iter(|| render_page(black_box(&page), black_box(&document), RenderOptions::default()))
    });
}

criterion_group!(benches, bench_render_default_page, bench_render_long_page);
criterion_main!(benches);
