//! Criterion benchmarks for the TSP drivers.
//!
//! Uses random Euclidean instances so only the search overhead and the
//! delta evaluation are measured.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tsp_metaheur::hill_climb::{HillClimbConfig, HillClimbRunner};
use tsp_metaheur::sa::{SaConfig, SaRunner};
use tsp_metaheur::tabu::{TabuConfig, TabuRunner};
use tsp_metaheur::{Neighborhood, Problem, Tour, TourState};

fn instance(n: usize) -> (Problem, Tour) {
    let mut rng = StdRng::seed_from_u64(42);
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
        .collect();
    let problem = Problem::from_points(&points).expect("valid points");
    (problem, Tour::random(n, &mut rng))
}

// ===========================================================================
// Neighborhood scan: n(n-1)/2 O(1) deltas
// ===========================================================================

fn bench_neighborhood_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighborhood_scan");

    for &n in &[50usize, 200, 500] {
        let (problem, tour) = instance(n);
        let state = TourState::new(&problem, tour).expect("sized tour");
        group.bench_with_input(BenchmarkId::from_parameter(n), &state, |b, s| {
            b.iter(|| {
                let best = Neighborhood::Flip
                    .candidates(black_box(s))
                    .map(|c| c.delta)
                    .fold(f64::INFINITY, f64::min);
                black_box(best)
            })
        });
    }
    group.finish();
}

// ===========================================================================
// Drivers
// ===========================================================================

fn bench_hill_climb(c: &mut Criterion) {
    let mut group = c.benchmark_group("hill_climb");
    group.sample_size(10);

    for &n in &[50usize, 100] {
        let (problem, tour) = instance(n);
        let config = HillClimbConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, tour), |b, (p, t)| {
            b.iter(|| {
                let result = HillClimbRunner::run(black_box(p), t.clone(), &config);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_sa(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa");
    group.sample_size(10);

    for &n in &[50usize, 200] {
        let (problem, tour) = instance(n);
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(0.1)
            .with_iterations_per_temperature(n)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, tour), |b, (p, t)| {
            b.iter(|| {
                let result = SaRunner::run(black_box(p), t.clone(), &config);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_tabu(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabu");
    group.sample_size(10);

    for &n in &[50usize, 100] {
        let (problem, tour) = instance(n);
        let config = TabuConfig::default()
            .with_max_iterations(100)
            .with_tabu_tenure(7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, tour), |b, (p, t)| {
            b.iter(|| {
                let result = TabuRunner::run(black_box(p), t.clone(), &config);
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_neighborhood_scan,
    bench_hill_climb,
    bench_sa,
    bench_tabu
);
criterion_main!(benches);
