// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use surfgrow::geometry::{compute_normals, Mesh};
use surfgrow::physics::{ConstantNoise, GrowthParams, Integrator};
use surfgrow::spatial::{brute_force_pairs, SpatialGrid};
use surfgrow::{RemeshParams, Remesher, SeedShape};

/// Icosphere-like surface refined to roughly `target` edge length
fn refined_sphere(radius: f64, target: f64) -> Mesh {
    let mut mesh = SeedShape::Icosahedron.to_mesh(radius);
    let remesher = Remesher::new(RemeshParams::with_target_edge_length(target)).unwrap();
    for _ in 0..3 {
        let normals = compute_normals(&mesh.cells, &mesh.positions);
        mesh = remesher.remesh(&mesh, &normals).unwrap().0;
    }
    mesh
}

fn bench_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairs");

    for radius in [4.0, 8.0] {
        let mesh = refined_sphere(radius, 0.5);
        let label = format!("{}v", mesh.vertex_count());

        group.bench_with_input(BenchmarkId::new("grid", &label), &mesh, |b, mesh| {
            let mut grid = SpatialGrid::new(1.0).unwrap();
            b.iter(|| grid.pairs(black_box(&mesh.positions)));
        });

        group.bench_with_input(BenchmarkId::new("grid_parallel", &label), &mesh, |b, mesh| {
            let mut grid = SpatialGrid::new(1.0).unwrap();
            b.iter(|| grid.par_pairs(black_box(&mesh.positions)));
        });

        group.bench_with_input(BenchmarkId::new("brute_force", &label), &mesh, |b, mesh| {
            b.iter(|| brute_force_pairs(black_box(&mesh.positions), 1.0));
        });
    }

    group.finish();
}

fn bench_growth_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth");
    let mesh = refined_sphere(6.0, 0.5);

    group.bench_function("integrate", |b| {
        let mut integrator = Integrator::new(GrowthParams::default()).unwrap();
        b.iter(|| {
            let mut grown = mesh.clone();
            integrator
                .step(black_box(&mut grown), &mut ConstantNoise(0.25))
                .unwrap()
        });
    });

    group.finish();
}

fn bench_remesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("remesh");
    group.sample_size(20);

    let mesh = refined_sphere(6.0, 0.5);
    let normals = compute_normals(&mesh.cells, &mesh.positions);

    for target in [0.4, 0.5, 0.7] {
        let remesher = Remesher::new(RemeshParams::with_target_edge_length(target)).unwrap();
        group.bench_with_input(BenchmarkId::new("sphere", target), &target, |b, _| {
            b.iter(|| remesher.remesh(black_box(&mesh), &normals).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pairs, bench_growth_step, bench_remesh);
criterion_main!(benches);
