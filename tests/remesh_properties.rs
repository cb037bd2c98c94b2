// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Topological guarantees of the remesher

use anyhow::Result;
use std::collections::HashMap;
use surfgrow::geometry::{compute_normals, Mesh};
use surfgrow::remesh::SPLIT_RATIO;
use surfgrow::{
    analyze, GrowthConfig, GrowthError, RemeshParams, Remesher, SeedShape, Simulation,
};

fn remesh(mesh: &Mesh, target: f64) -> surfgrow::Result<Mesh> {
    let normals = compute_normals(&mesh.cells, &mesh.positions);
    let remesher = Remesher::new(RemeshParams::with_target_edge_length(target))?;
    Ok(remesher.remesh(mesh, &normals)?.0)
}

/// Every undirected edge and the number of cells using it
fn edge_use(mesh: &Mesh) -> HashMap<(usize, usize), usize> {
    let mut uses = HashMap::new();
    for cell in &mesh.cells {
        for k in 0..3 {
            let (a, b) = (cell[k], cell[(k + 1) % 3]);
            *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    uses
}

fn assert_closed(mesh: &Mesh) {
    let n = mesh.vertex_count();
    for cell in &mesh.cells {
        assert!(cell.iter().all(|&v| v < n), "cell {:?} out of bounds", cell);
        assert!(
            cell[0] != cell[1] && cell[1] != cell[2] && cell[0] != cell[2],
            "cell {:?} repeats a vertex",
            cell
        );
    }
    for (edge, count) in edge_use(mesh) {
        assert_eq!(count, 2, "edge {:?} used by {} cells", edge, count);
    }
    assert!(mesh.is_finite());
}

#[test]
fn test_output_is_closed_for_every_seed() -> Result<()> {
    for shape in [
        SeedShape::Tetrahedron,
        SeedShape::Octahedron,
        SeedShape::Cube,
        SeedShape::Icosahedron,
    ] {
        for target in [0.4, 0.7, 1.0] {
            let out = remesh(&shape.to_mesh(1.5), target)?;
            let stats = analyze(&out);
            println!(
                "{} @ {}: {} vertices, edges {:.3}..{:.3}",
                shape, target, stats.vertex_count, stats.min_edge_length, stats.max_edge_length
            );
            assert_closed(&out);
            assert_eq!(stats.euler_characteristic, 2, "{} @ {}", shape, target);
        }
    }
    Ok(())
}

#[test]
fn test_second_pass_is_near_fixed_point() -> Result<()> {
    let target = 0.5;
    let once = remesh(&SeedShape::Icosahedron.to_mesh(2.0), target)?;
    let once = remesh(&once, target)?;
    let twice = remesh(&once, target)?;

    let v1 = once.vertex_count() as i64;
    let v2 = twice.vertex_count() as i64;
    println!("Vertex count: {} -> {}", v1, v2);
    assert!(
        (v2 - v1).abs() <= v1 / 5,
        "vertex count jumped from {} to {}",
        v1,
        v2
    );
    Ok(())
}

#[test]
fn test_edges_move_toward_target() -> Result<()> {
    let target = 0.5;
    let mut mesh = SeedShape::Icosahedron.to_mesh(2.0);
    for _ in 0..3 {
        mesh = remesh(&mesh, target)?;
    }

    let within = surfgrow::MeshStats::edge_length_fraction(&mesh, 0.5 * target, 2.0 * target);
    println!("Edges within [L/2, 2L]: {:.1}%", within * 100.0);
    assert!(within > 0.8, "only {:.1}% of edges near target", within * 100.0);
    Ok(())
}

#[test]
fn test_grown_surface_stays_under_split_threshold() -> Result<()> {
    let config = GrowthConfig {
        growth_rate: 0.05,
        rng_seed: Some(21),
        interval_ms: 0,
        ..Default::default()
    };
    let high = config.target_edge_length() * SPLIT_RATIO;
    let mut sim = Simulation::new(config)?;

    for _ in 0..10 {
        sim.advance()?;
        let stats = analyze(sim.mesh());
        assert!(
            stats.max_edge_length <= high + 1e-9,
            "step {}: max edge {} above {}",
            sim.step(),
            stats.max_edge_length,
            high
        );
    }
    Ok(())
}

#[test]
fn test_non_manifold_input_is_rejected() {
    let mut mesh = SeedShape::Cube.to_mesh(1.0);
    let extra = mesh.cells[0];
    mesh.cells.push(extra);

    let normals = compute_normals(&mesh.cells, &mesh.positions);
    let result = Remesher::new(RemeshParams::default())
        .unwrap()
        .remesh(&mesh, &normals);
    assert!(matches!(result, Err(GrowthError::NonManifold(_))));
}

#[test]
fn test_normals_length_mismatch_is_rejected() {
    let mesh = SeedShape::Octahedron.to_mesh(1.0);
    let result = Remesher::new(RemeshParams::default())
        .unwrap()
        .remesh(&mesh, &[]);
    assert!(matches!(result, Err(GrowthError::InvalidMesh(_))));
}
