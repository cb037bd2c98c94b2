// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh statistics

use super::topology::unique_edges;
use super::Mesh;
use crate::utils::math::triangle_area;
use serde::{Deserialize, Serialize};

/// Summary statistics for a mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub cell_count: usize,
    pub edge_count: usize,
    /// V - E + F; 2 for a closed genus-0 surface
    pub euler_characteristic: i64,
    pub surface_area: f64,
    pub min_edge_length: f64,
    pub mean_edge_length: f64,
    pub max_edge_length: f64,
    pub is_closed_manifold: bool,
}

impl MeshStats {
    /// Create empty stats
    pub fn empty() -> Self {
        Self {
            vertex_count: 0,
            cell_count: 0,
            edge_count: 0,
            euler_characteristic: 0,
            surface_area: 0.0,
            min_edge_length: 0.0,
            mean_edge_length: 0.0,
            max_edge_length: 0.0,
            is_closed_manifold: false,
        }
    }

    /// Fraction of edges whose length lies in `[low, high]`
    pub fn edge_length_fraction(mesh: &Mesh, low: f64, high: f64) -> f64 {
        let edges = unique_edges(&mesh.cells);
        if edges.is_empty() {
            return 0.0;
        }
        let inside = edges
            .iter()
            .filter(|&&(a, b)| {
                let len = (mesh.positions[a] - mesh.positions[b]).norm();
                len >= low && len <= high
            })
            .count();
        inside as f64 / edges.len() as f64
    }
}

/// Compute statistics for a mesh
pub fn analyze(mesh: &Mesh) -> MeshStats {
    if mesh.cells.is_empty() {
        return MeshStats {
            vertex_count: mesh.vertex_count(),
            ..MeshStats::empty()
        };
    }

    let surface_area = mesh
        .cells
        .iter()
        .map(|c| triangle_area(&mesh.positions[c[0]], &mesh.positions[c[1]], &mesh.positions[c[2]]))
        .sum();

    let edges = unique_edges(&mesh.cells);
    let lengths: Vec<f64> = edges
        .iter()
        .map(|&(a, b)| (mesh.positions[a] - mesh.positions[b]).norm())
        .collect();
    let min_edge_length = lengths.iter().copied().fold(f64::INFINITY, f64::min);
    let max_edge_length = lengths.iter().copied().fold(0.0, f64::max);
    let mean_edge_length = lengths.iter().sum::<f64>() / lengths.len() as f64;

    MeshStats {
        vertex_count: mesh.vertex_count(),
        cell_count: mesh.cell_count(),
        edge_count: edges.len(),
        euler_characteristic: mesh.vertex_count() as i64 - edges.len() as i64
            + mesh.cell_count() as i64,
        surface_area,
        min_edge_length,
        mean_edge_length,
        max_edge_length,
        is_closed_manifold: mesh.is_closed_manifold(),
    }
}
