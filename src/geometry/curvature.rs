// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Discrete mean curvature
//!
//! Uses the cotangent Laplacian: the mean curvature normal at vertex `i` is
//!
//! ```text
//! K_i = 1 / (2 A_i) * sum_j (cot a_ij + cot b_ij) (x_i - x_j)
//! ```
//!
//! where `A_i` is one third of the area of the cells around `i`. The scalar
//! curvature is `|K_i| / 2`, positive when `K_i` points along the vertex
//! normal (convex, bulging outward).

use super::normals::compute_normals;
use super::Cell;
use crate::utils::math::{clamped_cot, triangle_area};
use nalgebra::{Point3, Vector3};

/// Floor for the sine term of a cotangent
const SIN_FLOOR: f64 = 1e-12;
/// Largest magnitude a single cotangent weight may take
const COT_LIMIT: f64 = 1e3;
/// Vertices with less barycentric area than this get zero curvature
const AREA_EPSILON: f64 = 1e-14;

/// Signed mean curvature per vertex
pub fn compute_mean_curvature(cells: &[Cell], positions: &[Point3<f64>]) -> Vec<f64> {
    let normals = compute_normals(cells, positions);
    mean_curvature_with_normals(cells, positions, &normals)
}

/// Signed mean curvature per vertex using precomputed normals for the sign
pub fn mean_curvature_with_normals(
    cells: &[Cell],
    positions: &[Point3<f64>],
    normals: &[Vector3<f64>],
) -> Vec<f64> {
    let n = positions.len();
    let mut laplacian = vec![Vector3::<f64>::zeros(); n];
    let mut area = vec![0.0f64; n];

    for cell in cells {
        let a = triangle_area(&positions[cell[0]], &positions[cell[1]], &positions[cell[2]]);
        if !a.is_finite() {
            continue;
        }
        for &v in cell {
            area[v] += a / 3.0;
        }

        // The angle at corner k weighs the opposite edge (i, j)
        for k in 0..3 {
            let i = cell[(k + 1) % 3];
            let j = cell[(k + 2) % 3];
            let pk = positions[cell[k]];
            let w = clamped_cot(&(positions[i] - pk), &(positions[j] - pk), SIN_FLOOR, COT_LIMIT);
            let d = positions[i] - positions[j];
            laplacian[i] += d * w;
            laplacian[j] -= d * w;
        }
    }

    (0..n)
        .map(|i| {
            if area[i] < AREA_EPSILON {
                return 0.0;
            }
            let k = laplacian[i] / (2.0 * area[i]);
            let magnitude = 0.5 * k.norm();
            let h = if k.dot(&normals[i]) < 0.0 {
                -magnitude
            } else {
                magnitude
            };
            if h.is_finite() {
                h
            } else {
                0.0
            }
        })
        .collect()
}
