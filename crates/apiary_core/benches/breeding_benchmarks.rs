use apiary_core::{setup, BreedingConfig, BreedingEngine, Genome};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

fn engine() -> BreedingEngine {
    let genetics = setup::standard_registry()
        .and_then(|registry| registry.build())
        .expect("standard registry builds");
    BreedingEngine::new(Arc::new(genetics), BreedingConfig::default())
}

fn parents(engine: &BreedingEngine) -> (Genome, Genome) {
    let genetics = engine.genetics();
    (
        genetics.template_genome("species_forest").expect("forest"),
        genetics.template_genome("species_meadows").expect("meadows"),
    )
}

/// Single breeding of two base species.
fn bench_breed(c: &mut Criterion) {
    let engine = engine();
    let (forest, meadows) = parents(&engine);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("breed_forest_meadows", |b| {
        b.iter(|| {
            let offspring = engine.breed(black_box(&forest), black_box(&meadows), 1.0, &mut rng);
            black_box(offspring)
        })
    });
}

/// Item-level breeding, including decode and encode of both parents.
fn bench_breed_items(c: &mut Criterion) {
    let engine = engine();
    let genetics = Arc::clone(engine.genetics());
    let forest = genetics.species_items("species_forest").expect("forest items");
    let meadows = genetics.species_items("species_meadows").expect("meadows items");
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("breed_items", |b| {
        b.iter(|| {
            let outcome =
                engine.breed_items(black_box(&forest.princess), black_box(&meadows.drone), 1.0, &mut rng);
            black_box(outcome)
        })
    });
}

/// Codec round trip of a template genome.
fn bench_codec_roundtrip(c: &mut Criterion) {
    let engine = engine();
    let (forest, _) = parents(&engine);
    let codec = engine.genetics().codec();

    c.bench_function("codec_roundtrip", |b| {
        b.iter(|| {
            let bytes = codec.encode_bytes(black_box(&forest)).expect("encode");
            black_box(codec.decode_bytes(&bytes))
        })
    });
}

/// Seeded batch of 1000 breedings.
fn bench_breed_batch(c: &mut Criterion) {
    let engine = engine();
    let pairs = vec![parents(&engine); 1000];

    c.bench_function("breed_batch_1000", |b| {
        b.iter(|| black_box(engine.breed_batch(black_box(&pairs), 1.0, 7)))
    });
}

criterion_group!(
    benches,
    bench_breed,
    bench_breed_items,
    bench_codec_roundtrip,
    bench_breed_batch
);
criterion_main!(benches);
