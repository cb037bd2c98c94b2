// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use super::topology;
use crate::error::{GrowthError, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Triangle cell defined by three vertex indices
pub type Cell = [usize; 3];

/// Indexed triangle mesh.
///
/// The vertex index is the vertex id. Ids are only meaningful for the
/// lifetime of one mesh value; remeshing produces a new numbering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Point3<f64>>,
    pub cells: Vec<Cell>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Build a mesh and check that every cell references valid, distinct vertices
    pub fn from_parts(positions: Vec<Point3<f64>>, cells: Vec<Cell>) -> Result<Self> {
        let mesh = Self { positions, cells };
        mesh.validate_indices()?;
        Ok(mesh)
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.positions.len();
        self.positions.push(position);
        index
    }

    /// Add a cell
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get cell count
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check that all cell indices are in range and pairwise distinct
    pub fn validate_indices(&self) -> Result<()> {
        let n = self.positions.len();
        for (ci, cell) in self.cells.iter().enumerate() {
            if cell.iter().any(|&v| v >= n) {
                return Err(GrowthError::InvalidMesh(format!(
                    "cell {} {:?} references a vertex outside 0..{}",
                    ci, cell, n
                )));
            }
            if cell[0] == cell[1] || cell[1] == cell[2] || cell[0] == cell[2] {
                return Err(GrowthError::InvalidMesh(format!(
                    "cell {} {:?} repeats a vertex",
                    ci, cell
                )));
            }
        }
        Ok(())
    }

    /// Full structural check: valid indices, finite positions, closed
    /// 2-manifold with consistent orientation, no unreferenced vertices.
    pub fn validate_closed_manifold(&self) -> Result<()> {
        self.validate_indices()?;
        if let Some(i) = self.positions.iter().position(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(GrowthError::Degenerate(format!(
                "vertex {} has a non-finite position",
                i
            )));
        }
        topology::check_closed_manifold(&self.cells, self.positions.len())
    }

    /// True when every edge is shared by exactly two consistently oriented cells
    pub fn is_closed_manifold(&self) -> bool {
        self.validate_closed_manifold().is_ok()
    }

    /// True when every coordinate of every vertex is finite
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SeedShape;

    #[test]
    fn test_from_parts_rejects_out_of_range() {
        let positions = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let result = Mesh::from_parts(positions, vec![[0, 1, 2]]);
        assert!(matches!(result, Err(GrowthError::InvalidMesh(_))));
    }

    #[test]
    fn test_from_parts_rejects_repeated_vertex() {
        let positions = vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let result = Mesh::from_parts(positions, vec![[0, 1, 1]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_seed_is_closed_manifold() {
        let mesh = SeedShape::Icosahedron.to_mesh(1.0);
        assert!(mesh.is_closed_manifold());
        assert!(mesh.is_finite());
    }

    #[test]
    fn test_single_triangle_is_open() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::origin());
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_cell([a, b, c]);
        assert!(!mesh.is_closed_manifold());
    }

    #[test]
    fn test_nan_position_is_rejected() {
        let mut mesh = SeedShape::Tetrahedron.to_mesh(1.0);
        mesh.positions[0].x = f64::NAN;
        assert!(matches!(
            mesh.validate_closed_manifold(),
            Err(GrowthError::Degenerate(_))
        ));
    }
}
