//! Engine Benchmarks
//!
//! Grid generation, ways evaluation and whole free-spins rounds.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mw_slot_lab::{GameConfig, GridSpec, WildReels, evaluate_ways};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const GRIDS: &[(u8, u8)] = &[(5, 4), (6, 4), (6, 7)];

/// Benchmark grid generation across layouts
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_grid");

    for &(reels, rows) in GRIDS {
        let mut config = GameConfig::default();
        config.grid = GridSpec { reels, rows };
        let Ok(model) = config.validate() else {
            continue;
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let label = format!("{reels}x{rows}");

        group.throughput(Throughput::Elements(u64::from(reels) * u64::from(rows)));
        group.bench_with_input(BenchmarkId::new("weighted", &label), &label, |b, _| {
            b.iter(|| black_box(model.generator().generate(&mut rng)))
        });
    }

    group.finish();
}

/// Benchmark ways evaluation with and without wild reels
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_ways");
    let Ok(model) = GameConfig::default().validate() else {
        return;
    };
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let grids: Vec<_> = (0..256).map(|_| model.generator().generate(&mut rng)).collect();

    for (name, wilds) in [
        ("no_wilds", WildReels::NONE),
        ("one_wild", WildReels::from_reels([2])),
        ("three_wilds", WildReels::from_reels([0, 2, 4])),
    ] {
        group.bench_function(name, |b| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % grids.len();
                black_box(evaluate_ways(&grids[i], model.paytable(), wilds))
            })
        });
    }

    group.finish();
}

/// Benchmark complete free-spins rounds
fn bench_free_spins_round(c: &mut Criterion) {
    let Ok(model) = GameConfig::default().validate() else {
        return;
    };
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    c.bench_function("free_spins_round", |b| {
        b.iter(|| {
            let mut session = mw_slot_lab::FreeSpinsSession::running(model.free_spins(), 1.0);
            black_box(session.run_to_completion(&mut rng, &model))
        })
    });
}

criterion_group!(benches, bench_generate, bench_evaluate, bench_free_spins_round);
criterion_main!(benches);
