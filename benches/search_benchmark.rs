// Performance benchmarks for the FaceSeek search pipeline
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use faceseek_core::{
    EmbeddingGallery, FaceRecord, IdentityCentroid, IdentityIndex, SearchPipeline, Vector,
};
use rand::prelude::*;
use std::sync::Arc;

const DIM: usize = 128;

fn random_unit_vector(rng: &mut impl Rng) -> Vector {
    let data: Vec<f32> = (0..DIM).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data).normalized()
}

/// Gallery with `identities` identities of `per_identity` jittered
/// variants each, plus matching centroids.
fn build_fixture(
    identities: usize,
    per_identity: usize,
) -> (Arc<EmbeddingGallery>, Arc<IdentityIndex>, Vector) {
    let mut rng = rand::rng();
    let mut records = Vec::with_capacity(identities * per_identity);
    let mut centroids = Vec::with_capacity(identities);

    for id in 0..identities {
        let base = random_unit_vector(&mut rng);
        centroids.push(IdentityCentroid {
            identity_id: format!("id{id}"),
            vector: base.clone(),
        });
        for v in 0..per_identity {
            let jittered: Vec<f32> = base
                .as_slice()
                .iter()
                .map(|x| x + rng.random_range(-0.05f32..0.05f32))
                .collect();
            records.push(FaceRecord::new(
                format!("id{id}-f{v}"),
                Some(format!("id{id}")),
                Vector::new(jittered).normalized(),
                format!("photos/id{id}/f{v}.jpg"),
            ));
        }
    }

    let query = centroids[0].vector.clone();
    (
        Arc::new(EmbeddingGallery::new(records).unwrap()),
        Arc::new(IdentityIndex::new(centroids)),
        query,
    )
}

fn benchmark_identity_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing");

    for identities in [100, 1000, 10000].iter() {
        let (_, index, query) = build_fixture(*identities, 1);
        group.bench_with_input(
            BenchmarkId::new("top5", identities),
            identities,
            |b, _| {
                b.iter(|| {
                    black_box(index.search(black_box(&query), 5).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn benchmark_search_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for per_identity in [10, 100, 800].iter() {
        let (gallery, index, query) = build_fixture(50, *per_identity);
        let pipeline = SearchPipeline::with_defaults(gallery, index);
        group.bench_with_input(
            BenchmarkId::new("pipeline", per_identity),
            per_identity,
            |b, _| {
                b.iter(|| {
                    black_box(pipeline.search(black_box(&query)).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_identity_routing, benchmark_search_pipeline);
criterion_main!(benches);
