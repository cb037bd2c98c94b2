// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Un-normalized triangle normal; its magnitude is twice the triangle area
pub fn triangle_cross(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    (p1 - p0).cross(&(p2 - p0))
}

/// Triangle area
pub fn triangle_area(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    0.5 * triangle_cross(p0, p1, p2).norm()
}

/// Cotangent of the angle between `u` and `v`, clamped to `[-limit, limit]`.
///
/// A vanishing cross product is treated as `floor` so nearly-degenerate
/// triangles produce large but finite weights instead of infinities.
pub fn clamped_cot(u: &Vector3<f64>, v: &Vector3<f64>, floor: f64, limit: f64) -> f64 {
    let sin = u.cross(v).norm().max(floor);
    (u.dot(v) / sin).clamp(-limit, limit)
}

/// Normalize, or return zero for vectors shorter than `epsilon`
pub fn normalize_or_zero(v: &Vector3<f64>, epsilon: f64) -> Vector3<f64> {
    let len = v.norm();
    if len > epsilon && len.is_finite() {
        v / len
    } else {
        Vector3::zeros()
    }
}

/// Canonical (min, max) ordering for an undirected edge
pub fn sorted_edge(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_triangle_area() {
        let area = triangle_area(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
            &Point3::new(0.0, 2.0, 0.0),
        );
        assert_relative_eq!(area, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clamped_cot() {
        let u = Vector3::new(1.0, 0.0, 0.0);
        let v = Vector3::new(1.0, 1.0, 0.0);
        assert_relative_eq!(clamped_cot(&u, &v, 1e-12, 1e3), 1.0, epsilon = 1e-12);

        // Parallel vectors hit the clamp instead of dividing by zero
        let cot = clamped_cot(&u, &u, 1e-12, 1e3);
        assert_eq!(cot, 1e3);
    }

    #[test]
    fn test_normalize_or_zero() {
        assert_eq!(normalize_or_zero(&Vector3::zeros(), 1e-12), Vector3::zeros());
        let n = normalize_or_zero(&Vector3::new(0.0, 3.0, 4.0), 1e-12);
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sorted_edge() {
        assert_eq!(sorted_edge(4, 2), (2, 4));
        assert_eq!(sorted_edge(2, 4), (2, 4));
    }
}
