//! Benchmarks for population stepping and the generation boundary.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use dot_evolution::{Population, Scenario};

const TIME_STEP: f32 = 1.0 / 60.0;

fn scenario(size: usize) -> Scenario {
    Scenario {
        size,
        // Keep the benchmark inside one generation.
        generation_time: f32::MAX,
        ..Scenario::default()
    }
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_step");

    for size in [100, 500, 1000] {
        let mut population = Population::new(scenario(size)).expect("valid scenario");

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                population.step(black_box(TIME_STEP));
            });
        });
    }

    group.finish();
}

fn bench_evolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_evolve");

    for size in [100, 500, 1000] {
        let mut population = Population::new(scenario(size)).expect("valid scenario");
        for _ in 0..120 {
            population.step(TIME_STEP);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                population.evolve();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_evolve);
criterion_main!(benches);
