//! Benchmarks for the channel models
//!
//! Run with: cargo bench -p satchan-core --bench model_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use satchan_core::calibration::{CalibrationEngine, MeasurementPoint};
use satchan_core::{compute_cir, compute_link_budget, Environment, LinkParams, ReceiverConfig};

// ============================================================================
// Link Budget
// ============================================================================

fn bench_link_budget(c: &mut Criterion) {
    let mut group = c.benchmark_group("link_budget");

    for env in Environment::all() {
        let params = LinkParams::builder()
            .frequency_ghz(20.0)
            .rain_rate_mm_h(10.0)
            .environment(*env)
            .sim_time_s(42.0)
            .build();
        group.bench_with_input(BenchmarkId::new("compute", env), &params, |b, p| {
            b.iter(|| compute_link_budget(black_box(p)))
        });
    }

    group.finish();
}

// ============================================================================
// CIR
// ============================================================================

fn bench_cir(c: &mut Criterion) {
    let mut group = c.benchmark_group("cir");

    for env in [Environment::Rural, Environment::Urban, Environment::Maritime] {
        let params = LinkParams::builder()
            .frequency_ghz(1.5)
            .environment(env)
            .sim_time_s(10.0)
            .build();
        group.bench_with_input(BenchmarkId::new("compute", env), &params, |b, p| {
            b.iter(|| compute_cir(black_box(p)))
        });
    }

    group.finish();
}

// ============================================================================
// Calibration
// ============================================================================

fn bench_calibration(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration");

    let points: Vec<MeasurementPoint> = (0..20)
        .map(|i| MeasurementPoint {
            elevation_deg: Some(10.0 + 3.0 * i as f64),
            rain_rate_mm_h: Some((i % 4) as f64 * 5.0),
            cn0_dbhz: Some(80.0 - 0.1 * i as f64),
            rssi_dbm: Some(-85.0 + 0.05 * i as f64),
            attenuation_db: Some(0.5 + 0.2 * (i % 4) as f64),
            ..Default::default()
        })
        .collect();
    let engine = CalibrationEngine::new(
        LinkParams::builder().frequency_ghz(20.0).build(),
        ReceiverConfig::default(),
    );

    group.sample_size(20);
    group.bench_function("fit_20_points", |b| {
        b.iter(|| engine.calibrate(black_box(&points), None))
    });

    group.finish();
}

criterion_group!(benches, bench_link_budget, bench_cir, bench_calibration);
criterion_main!(benches);
