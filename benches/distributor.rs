//! Benchmarks for the turn distribution engine.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use gol_distributor::{
    Grid,
    compute::step,
    crossbeam_channel::unbounded,
    io::MemoryStore,
    schema::{Params, Seed},
};

const SIZE: usize = 256;
const TURNS: usize = 20;

fn seed() -> Seed {
    Seed::random(0.25, 42)
}

fn bench_threads(c: &mut Criterion) {
    let mut group = c.benchmark_group("distributor_threads");
    group.sample_size(10);

    for threads in [1, 2, 4, 8] {
        let params = Params {
            turns: TURNS,
            threads,
            image_width: SIZE,
            image_height: SIZE,
            tick_interval_ms: 2000,
            emit_cell_flips: false,
        };
        let cells = seed().generate(SIZE, SIZE);

        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, _| {
                b.iter(|| {
                    let store = MemoryStore::with_image(&params.input_name(), SIZE, SIZE, cells.clone());
                    let (events, notifications) = unbounded();
                    let (_signals, control) = unbounded();
                    let summary = gol_distributor::run(params.clone(), store, events, control);
                    // Drain so the stream does not grow across iterations.
                    notifications.try_iter().for_each(drop);
                    black_box(summary)
                });
            },
        );
    }

    group.finish();
}

fn bench_sequential_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_step");

    for size in [64, 256, 512] {
        let cells = seed().generate(size, size);
        let grid = Grid::from_bytes(size, size, &cells).expect("seeded grid");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| step(black_box(&grid)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_threads, bench_sequential_step);
criterion_main!(benches);
