// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-vertex normals

use super::Cell;
use crate::utils::math::{normalize_or_zero, triangle_cross};
use nalgebra::{Point3, Vector3};

/// Accumulated normals shorter than this are treated as undefined
pub const NORMAL_EPSILON: f64 = 1e-12;

/// Area-weighted vertex normals.
///
/// Each incident cell contributes its un-normalized cross product, so larger
/// cells weigh more. A vertex whose neighborhood has no area gets the zero
/// vector; see [`degenerate_normals`].
pub fn compute_normals(cells: &[Cell], positions: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    let mut sums = vec![Vector3::zeros(); positions.len()];

    for cell in cells {
        let n = triangle_cross(&positions[cell[0]], &positions[cell[1]], &positions[cell[2]]);
        if !n.iter().all(|c| c.is_finite()) {
            continue;
        }
        for &v in cell {
            sums[v] += n;
        }
    }

    sums.iter()
        .map(|n| normalize_or_zero(n, NORMAL_EPSILON))
        .collect()
}

/// Indices of vertices whose normal is undefined (zero vector)
pub fn degenerate_normals(normals: &[Vector3<f64>]) -> Vec<usize> {
    normals
        .iter()
        .enumerate()
        .filter(|(_, n)| n.norm_squared() == 0.0)
        .map(|(i, _)| i)
        .collect()
}
