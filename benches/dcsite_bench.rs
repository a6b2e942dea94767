//! Criterion benchmarks for the dcsite optimizers.
//!
//! Uses seeded synthetic data so runs are comparable across machines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dcsite::cluster::KMeans;
use dcsite::ga::multi_objective::non_dominated_sort;
use dcsite::ga::Nsga2Config;
use dcsite::portfolio::PortfolioProblem;
use dcsite::record::{DatacenterRecord, SiteTable};
use dcsite::select::{
    capacity_model, BranchAndBoundSolver, CapacityWeights, SelectionSolver, SolverConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ===========================================================================
// Synthetic data
// ===========================================================================

fn synthetic_records(n: usize) -> Vec<DatacenterRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|i| DatacenterRecord {
            location: format!("DC-{i}"),
            city: "Synthetic".into(),
            state: "Bench".into(),
            energy_mw: rng.random_range(1.0..150.0),
            area_sqft: rng.random_range(5_000.0..300_000.0),
            it_power_mw: rng.random_range(0.5..100.0),
            pue: rng.random_range(1.1..2.0),
            ixp_count: rng.random_range(0..6) as f64,
            year_operational: rng.random_range(1990..2025),
            full_cabinets: rng.random_bool(0.7),
            partial_cabinets: rng.random_bool(0.6),
            shared_rackspace: rng.random_bool(0.5),
            cages: rng.random_bool(0.6),
            suites: rng.random_bool(0.5),
            build_to_suit: rng.random_bool(0.3),
            footprints: rng.random_bool(0.3),
            remote_hands: rng.random_bool(0.8),
        })
        .collect()
}

fn synthetic_sites(n: usize) -> SiteTable {
    let mut rng = StdRng::seed_from_u64(7);
    let names: Vec<String> = (0..n).map(|i| format!("S{i}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut column = |lo: f64, hi: f64| -> Vec<f64> {
        (0..n).map(|_| rng.random_range(lo..hi)).collect()
    };
    let land = column(50.0, 150.0);
    let energy = column(0.05, 0.15);
    let renewable = column(0.1, 0.9);
    let latency = column(5.0, 40.0);
    let capacity = column(20.0, 120.0);
    SiteTable::from_columns(
        &names,
        &[
            ("LandCost", land.as_slice()),
            ("EnergyCost", energy.as_slice()),
            ("Renewable", renewable.as_slice()),
            ("Latency", latency.as_slice()),
            ("Capacity", capacity.as_slice()),
        ],
    )
    .expect("synthetic table")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_portfolio_nsga2(c: &mut Criterion) {
    let mut group = c.benchmark_group("portfolio_nsga2");
    group.sample_size(10);

    for &n in &[50usize, 200, 500] {
        let records = synthetic_records(n);
        let config = Nsga2Config::fast().with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| {
                let problem = PortfolioProblem::new(black_box(records)).expect("records");
                black_box(problem.optimize(&config).expect("config"))
            })
        });
    }
    group.finish();
}

fn bench_branch_and_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_branch_and_bound");
    group.sample_size(10);

    for &n in &[8usize, 16, 24] {
        let weights = CapacityWeights {
            max_sites: n / 3,
            required_capacity: 40.0 * n as f64 / 4.0,
            ..CapacityWeights::default()
        };
        let model = capacity_model(&synthetic_sites(n), &weights).expect("model");
        let config = SolverConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, m| {
            b.iter(|| black_box(BranchAndBoundSolver::new().solve(black_box(m), &config)))
        });
    }
    group.finish();
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");
    group.sample_size(10);

    for &(rows, k) in &[(100usize, 3usize), (1_000, 5), (5_000, 8)] {
        let mut rng = StdRng::seed_from_u64(3);
        let data: Vec<Vec<f64>> = (0..rows)
            .map(|_| (0..14).map(|_| rng.random_range(-1.0..1.0)).collect())
            .collect();
        let kmeans = KMeans::new(k).with_n_init(3);
        group.bench_with_input(
            BenchmarkId::new(format!("r{rows}_k{k}"), rows),
            &data,
            |b, d| b.iter(|| black_box(kmeans.fit(black_box(d)).expect("fit"))),
        );
    }
    group.finish();
}

fn bench_non_dominated_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("non_dominated_sort");

    for &n in &[100usize, 400] {
        let mut rng = StdRng::seed_from_u64(11);
        let points: Vec<Vec<f64>> = (0..n)
            .map(|_| (0..4).map(|_| rng.random_range(0.0..1.0)).collect())
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, p| {
            b.iter(|| black_box(non_dominated_sort(black_box(p))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_portfolio_nsga2,
    bench_branch_and_bound,
    bench_kmeans,
    bench_non_dominated_sort
);
criterion_main!(benches);
