// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Owned mesh snapshots handed to consumers

use crate::geometry::{bounding_radius, compute_bounds, compute_normals, Mesh};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Read-only copy of the surface at one growth step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: u64,
    /// Largest absolute x or z coordinate of the bounds
    pub bounding_radius: f64,
    pub positions: Vec<[f64; 3]>,
    pub normals: Vec<[f64; 3]>,
    pub cells: Vec<[usize; 3]>,
}

impl Snapshot {
    pub fn capture(step: u64, mesh: &Mesh) -> Self {
        let radius = compute_bounds(&mesh.positions)
            .as_ref()
            .map(bounding_radius)
            .unwrap_or(0.0);
        let normals = compute_normals(&mesh.cells, &mesh.positions);

        Self {
            step,
            bounding_radius: radius,
            positions: mesh.positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
            normals: normals.iter().map(|n| [n.x, n.y, n.z]).collect(),
            cells: mesh.cells.clone(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Rebuild the mesh this snapshot was taken from
    pub fn to_mesh(&self) -> Mesh {
        Mesh {
            positions: self.positions.iter().map(|&p| Point3::from(p)).collect(),
            cells: self.cells.clone(),
        }
    }
}
