use blockpage_editor::LayoutStore;
use blockpage_layout::{Component, ComponentData, ComponentType};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn block(i: usize) -> Component {
    let kind = match i % 3 {
        0 => ComponentType::Hero,
        1 => ComponentType::TwoColumn,
        _ => ComponentType::ImageGrid,
    };
    let data = ComponentData::placeholder(&kind);
    Component::new(format!("c{}", i), kind, data)
}

fn add_and_reorder(c: &mut Criterion) {
    c.bench_function("add_and_reorder_20", |b| {
        b.iter(|| {
            let mut store = LayoutStore::new();
            for i in 0..20 {
                store.add_component(block(i)).unwrap();
            }
            for i in 0..20 {
                store.reorder_components(i, 19 - i).unwrap();
            }
            black_box(store.revision())
        })
    });
}

fn undo_redo_full_history(c: &mut Criterion) {
    let mut store = LayoutStore::new();
    for i in 0..60 {
        store.add_component(block(i)).unwrap();
    }

    c.bench_function("undo_redo_50", |b| {
        b.iter(|| {
            while store.undo() {}
            while store.redo() {}
            black_box(store.components().len())
        })
    });
}

criterion_group!(benches, add_and_reorder, undo_redo_full_history);
criterion_main!(benches);
