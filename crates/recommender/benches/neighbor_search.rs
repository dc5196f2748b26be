//! Benchmarks for model fitting and neighbor search
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic library so it runs without the snapshot files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::LibraryEntry;
use recommender::{ItemModel, NeighborSearch};

fn synthetic_library(items: u32, users: u32) -> Vec<LibraryEntry> {
    let mut library = Vec::new();
    for user in 0..users {
        // Each user owns roughly 2% of the catalog
        for item in (user % 50..items).step_by(50) {
            library.push(LibraryEntry {
                user_id: format!("user{}", user),
                item_id: item,
                playtime_forever: ((item * 31 + user * 17) % 600) as f64,
            });
        }
    }
    library
}

fn bench_fit_model(c: &mut Criterion) {
    let library = synthetic_library(5_000, 2_000);

    c.bench_function("fit_item_model", |b| {
        b.iter(|| {
            let model = ItemModel::from_library(black_box(&library));
            black_box(model)
        })
    });
}

fn bench_neighbors_of_row(c: &mut Criterion) {
    let library = synthetic_library(5_000, 2_000);
    let model = ItemModel::from_library(&library);

    c.bench_function("neighbors_of_row_k6", |b| {
        b.iter(|| {
            let hits = model.index().neighbors_of_row(black_box(42), black_box(6));
            black_box(hits)
        })
    });
}

criterion_group!(benches, bench_fit_model, bench_neighbors_of_row);
criterion_main!(benches);
