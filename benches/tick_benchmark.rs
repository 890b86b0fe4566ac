/*
 * Pond Simulation Benchmark
 *
 * This file contains benchmarks for the pond simulation to identify
 * performance bottlenecks. It measures the spine solver, the body geometry
 * rebuild, and the overall fixed-timestep tick at several population sizes.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nannou::prelude::*;
use rand::rngs::mock::StepRng;
use std::time::Duration;

use koi_pond::{physics, spine, Koi, KoiVariant, PondParams, World};

const SURFACE_W: f32 = 1600.0;
const SURFACE_H: f32 = 900.0;

// Benchmark the IK spine solver alone
fn bench_spine_solver(c: &mut Criterion) {
    let mut rng = StepRng::new(3, 11);
    let mut koi = Koi::new(
        1,
        KoiVariant::Kohaku,
        55.0,
        vec2(SURFACE_W / 2.0, SURFACE_H / 2.0),
        0.0,
        &mut rng,
    );
    let seg_len = spine::segment_len(koi.size, 1.0);

    c.bench_function("spine_solver", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            // Drag the head along a circle so every joint keeps working
            t += 0.05;
            let head = vec2(
                SURFACE_W / 2.0 + t.cos() * 100.0,
                SURFACE_H / 2.0 + t.sin() * 100.0,
            );
            spine::solve(black_box(&mut koi.spine), head, seg_len);
        });
    });
}

// Benchmark the body geometry rebuild
fn bench_geometry_rebuild(c: &mut Criterion) {
    let mut rng = StepRng::new(3, 11);
    let mut koi = Koi::new(
        1,
        KoiVariant::Kohaku,
        55.0,
        vec2(SURFACE_W / 2.0, SURFACE_H / 2.0),
        0.4,
        &mut rng,
    );
    let (spine_nodes, size) = (koi.spine.clone(), koi.size);

    c.bench_function("geometry_rebuild", |b| {
        let mut phase = 0.0f32;
        b.iter(|| {
            phase += 0.1;
            koi.geo
                .rebuild(black_box(&spine_nodes), phase, size, 1.0);
        });
    });
}

// Benchmark the overall tick at several population sizes
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for fish_count in [1usize, 6, 20, 60].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(fish_count),
            fish_count,
            |b, &n| {
                let params = PondParams::default();
                let mut world = World::new();
                let mut rng = StepRng::new(5, 17);
                world.spawn_kois(n, KoiVariant::Kohaku, SURFACE_W, SURFACE_H, &mut rng);
                // A few pellets so the seeking branch gets exercised too
                world.add_food(vec2(300.0, 300.0));
                world.add_food(vec2(1200.0, 600.0));

                b.iter(|| {
                    physics::tick(
                        black_box(&mut world),
                        SURFACE_W,
                        SURFACE_H,
                        &params,
                        &mut rng,
                    );
                });
            },
        );
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_spine_solver, bench_geometry_rebuild, bench_tick
}

criterion_main!(benches);
