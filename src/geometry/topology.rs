// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Edge connectivity and manifold checks

use super::Cell;
use crate::error::{GrowthError, Result};
use crate::utils::math::sorted_edge;
use ahash::{AHashMap, AHashSet};

/// Set of undirected mesh edges keyed by global vertex indices.
///
/// Built from the actual vertex ids of every cell, so lookups answer
/// "are these two vertices joined by a mesh edge".
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: AHashSet<(usize, usize)>,
}

impl EdgeSet {
    pub fn from_cells(cells: &[Cell]) -> Self {
        let mut edges = AHashSet::with_capacity(cells.len() * 3 / 2);
        for cell in cells {
            for k in 0..3 {
                edges.insert(sorted_edge(cell[k], cell[(k + 1) % 3]));
            }
        }
        Self { edges }
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&sorted_edge(a, b))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// All undirected edges, sorted
pub fn unique_edges(cells: &[Cell]) -> Vec<(usize, usize)> {
    let mut edges: Vec<(usize, usize)> = cells
        .iter()
        .flat_map(|c| (0..3).map(move |k| sorted_edge(c[k], c[(k + 1) % 3])))
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Incident cells per vertex
pub fn vertex_cells(cells: &[Cell], vertex_count: usize) -> Vec<Vec<usize>> {
    let mut incident = vec![Vec::new(); vertex_count];
    for (ci, cell) in cells.iter().enumerate() {
        for &v in cell {
            incident[v].push(ci);
        }
    }
    incident
}

/// Verify that `cells` form a closed, consistently oriented 2-manifold over
/// `vertex_count` vertices.
///
/// Every directed edge must occur exactly once and its reverse exactly once,
/// every vertex must be used, and the cells around each vertex must form a
/// single fan.
pub fn check_closed_manifold(cells: &[Cell], vertex_count: usize) -> Result<()> {
    if cells.is_empty() {
        return Err(GrowthError::NonManifold("mesh has no cells".into()));
    }

    let mut directed: AHashMap<(usize, usize), u32> = AHashMap::with_capacity(cells.len() * 3);
    for cell in cells {
        if cell.iter().any(|&v| v >= vertex_count) {
            return Err(GrowthError::InvalidMesh(format!(
                "cell {:?} references a vertex outside 0..{}",
                cell, vertex_count
            )));
        }
        for k in 0..3 {
            *directed.entry((cell[k], cell[(k + 1) % 3])).or_insert(0) += 1;
        }
    }

    for (&(a, b), &count) in &directed {
        if count != 1 {
            return Err(GrowthError::NonManifold(format!(
                "directed edge ({}, {}) appears {} times",
                a, b, count
            )));
        }
        if !directed.contains_key(&(b, a)) {
            return Err(GrowthError::NonManifold(format!(
                "edge ({}, {}) has no opposite cell",
                a, b
            )));
        }
    }

    let incident = vertex_cells(cells, vertex_count);
    for (v, around) in incident.iter().enumerate() {
        if around.is_empty() {
            return Err(GrowthError::NonManifold(format!(
                "vertex {} is not referenced by any cell",
                v
            )));
        }

        // Walk the one-ring: each incident cell (v, a, b) links a -> b
        let mut link: AHashMap<usize, usize> = AHashMap::with_capacity(around.len());
        for &ci in around {
            let c = cells[ci];
            let k = c.iter().position(|&x| x == v).unwrap_or(0);
            link.insert(c[(k + 1) % 3], c[(k + 2) % 3]);
        }
        let start = cells[around[0]];
        let k = start.iter().position(|&x| x == v).unwrap_or(0);
        let first = start[(k + 1) % 3];
        let mut current = first;
        let mut steps = 0;
        loop {
            match link.get(&current) {
                Some(&next) => {
                    steps += 1;
                    current = next;
                    if current == first || steps > around.len() {
                        break;
                    }
                }
                None => break,
            }
        }
        if current != first || steps != around.len() {
            return Err(GrowthError::NonManifold(format!(
                "vertex {} does not have a single closed fan",
                v
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SeedShape;

    #[test]
    fn test_edge_set_uses_global_indices() {
        let cells = vec![[10, 20, 30]];
        let edges = EdgeSet::from_cells(&cells);
        assert!(edges.contains(10, 20));
        assert!(edges.contains(30, 20));
        assert!(edges.contains(10, 30));
        // Local corner ids must not be keys
        assert!(!edges.contains(0, 1));
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn test_unique_edges_icosahedron() {
        let mesh = SeedShape::Icosahedron.to_mesh(1.0);
        assert_eq!(unique_edges(&mesh.cells).len(), 30);
    }

    #[test]
    fn test_flipped_cell_is_detected() {
        let mut mesh = SeedShape::Octahedron.to_mesh(1.0);
        mesh.cells[0].swap(1, 2);
        assert!(check_closed_manifold(&mesh.cells, mesh.vertex_count()).is_err());
    }

    #[test]
    fn test_missing_cell_is_detected() {
        let mut mesh = SeedShape::Octahedron.to_mesh(1.0);
        mesh.cells.pop();
        assert!(check_closed_manifold(&mesh.cells, mesh.vertex_count()).is_err());
    }

    #[test]
    fn test_pinched_vertex_is_detected() {
        // Two tetrahedra glued at a single vertex
        let a = SeedShape::Tetrahedron.to_mesh(1.0);
        let mut cells = a.cells.clone();
        for c in &a.cells {
            let map = |v: usize| if v == 0 { 0 } else { v + 3 };
            cells.push([map(c[0]), map(c[1]), map(c[2])]);
        }
        assert!(check_closed_manifold(&cells, 7).is_err());
    }
}
