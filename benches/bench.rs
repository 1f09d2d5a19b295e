// Criterion benchmarks for MediQuery

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mediquery::core::{build_feature_query, normalize_features};
use mediquery::models::{Coordinates, FeatureCenter, RawFeature, TagFilter};
use std::collections::HashMap;

fn create_feature(id: u64) -> RawFeature {
    let mut tags = HashMap::new();
    if id % 3 != 0 {
        tags.insert("name".to_string(), format!("Pharmacy {}", id));
    }
    if id % 2 == 0 {
        tags.insert("contact:phone".to_string(), format!("+91 80 {:06}", id));
    }

    // Every fourth element is a way located only by its center
    if id % 4 == 0 {
        RawFeature {
            id,
            element_type: Some("way".to_string()),
            tags,
            lat: None,
            lon: None,
            center: Some(FeatureCenter { lat: 12.9 + id as f64 * 0.0001, lon: 77.5 }),
        }
    } else {
        RawFeature {
            id,
            element_type: Some("node".to_string()),
            tags,
            lat: Some(12.9 + id as f64 * 0.0001),
            lon: Some(77.5),
            center: None,
        }
    }
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_features");

    for size in [10, 100, 1000].iter() {
        let features: Vec<RawFeature> = (0..*size).map(create_feature).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &features, |b, features| {
            b.iter(|| normalize_features(black_box(features)))
        });
    }

    group.finish();
}

fn bench_build_query(c: &mut Criterion) {
    let filters = vec![
        TagFilter::new("amenity", "pharmacy"),
        TagFilter::new("healthcare", "pharmacy"),
    ];

    c.bench_function("build_feature_query", |b| {
        b.iter(|| {
            build_feature_query(
                black_box(Coordinates::new(12.9716, 77.5946)),
                black_box(10_000),
                black_box(&filters),
                25,
            )
        })
    });
}

criterion_group!(benches, bench_normalize, bench_build_query);
criterion_main!(benches);
