// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Uniform grid for fixed-radius neighbor pairs
//!
//! Space is cut into cubes with side equal to the cutoff radius. Any two
//! points closer than the radius are then in the same or in adjacent cubes,
//! so each point only has to be tested against 27 buckets.

use crate::error::{GrowthError, Result};
use ahash::AHashMap;
use nalgebra::Point3;
use rayon::prelude::*;

type CellKey = (i64, i64, i64);

/// An unordered point pair closer than the cutoff, with `i < j`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPair {
    pub i: usize,
    pub j: usize,
    pub distance_squared: f64,
}

/// Spatial hash over a uniform grid
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    radius: f64,
    inv_cell_size: f64,
    buckets: AHashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    /// Create a grid for cutoff `radius`; the radius is also the cell side
    pub fn new(radius: f64) -> Result<Self> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(GrowthError::InvalidRadius(radius));
        }
        Ok(Self {
            radius,
            inv_cell_size: 1.0 / radius,
            buckets: AHashMap::new(),
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn cell_key(&self, p: &Point3<f64>) -> CellKey {
        (
            (p.x * self.inv_cell_size).floor() as i64,
            (p.y * self.inv_cell_size).floor() as i64,
            (p.z * self.inv_cell_size).floor() as i64,
        )
    }

    /// Re-bin `points`. Buckets hold indices in ascending order.
    fn rebuild(&mut self, points: &[Point3<f64>]) {
        self.buckets.clear();
        for (i, p) in points.iter().enumerate() {
            let key = self.cell_key(p);
            self.buckets.entry(key).or_default().push(i);
        }
    }

    /// Neighbors `j > i` of point `i`, in a fixed order
    fn visit_neighbors<F: FnMut(usize, f64)>(&self, points: &[Point3<f64>], i: usize, mut f: F) {
        let r2 = self.radius * self.radius;
        let p = &points[i];
        let (cx, cy, cz) = self.cell_key(p);

        for dx in -1..=1i64 {
            for dy in -1..=1i64 {
                for dz in -1..=1i64 {
                    let key = (cx.wrapping_add(dx), cy.wrapping_add(dy), cz.wrapping_add(dz));
                    let Some(bucket) = self.buckets.get(&key) else {
                        continue;
                    };
                    let start = bucket.partition_point(|&j| j <= i);
                    for &j in &bucket[start..] {
                        let d2 = (points[j] - p).norm_squared();
                        if d2 < r2 {
                            f(j, d2);
                        }
                    }
                }
            }
        }
    }

    /// Call `f(i, j, d2)` once for every pair closer than the radius.
    ///
    /// The visiting order is deterministic for a given input but callers
    /// must not depend on it.
    pub fn for_each_pair<F: FnMut(usize, usize, f64)>(&mut self, points: &[Point3<f64>], mut f: F) {
        self.rebuild(points);
        for i in 0..points.len() {
            self.visit_neighbors(points, i, |j, d2| f(i, j, d2));
        }
    }

    /// Collect all pairs closer than the radius
    pub fn pairs(&mut self, points: &[Point3<f64>]) -> Vec<PointPair> {
        let mut out = Vec::new();
        self.for_each_pair(points, |i, j, distance_squared| {
            out.push(PointPair {
                i,
                j,
                distance_squared,
            })
        });
        out
    }

    /// Same result and order as [`SpatialGrid::pairs`], with the per-point
    /// neighbor queries spread across the rayon pool
    pub fn par_pairs(&mut self, points: &[Point3<f64>]) -> Vec<PointPair> {
        self.rebuild(points);
        let grid = &*self;
        (0..points.len())
            .into_par_iter()
            .flat_map_iter(|i| {
                let mut local = Vec::new();
                grid.visit_neighbors(points, i, |j, distance_squared| {
                    local.push(PointPair {
                        i,
                        j,
                        distance_squared,
                    })
                });
                local
            })
            .collect()
    }
}

/// All pairs of `points` closer than `radius`. A non-positive or non-finite
/// radius has no pairs.
pub fn radius_pairs(points: &[Point3<f64>], radius: f64) -> Vec<PointPair> {
    match SpatialGrid::new(radius) {
        Ok(mut grid) => grid.pairs(points),
        Err(_) => Vec::new(),
    }
}

/// Quadratic reference implementation
pub fn brute_force_pairs(points: &[Point3<f64>], radius: f64) -> Vec<PointPair> {
    if !(radius > 0.0) {
        return Vec::new();
    }
    let r2 = radius * radius;
    let mut out = Vec::new();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let distance_squared = (points[j] - points[i]).norm_squared();
            if distance_squared < r2 {
                out.push(PointPair {
                    i,
                    j,
                    distance_squared,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, spacing: f64) -> Vec<Point3<f64>> {
        (0..n).map(|i| Point3::new(i as f64 * spacing, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(matches!(SpatialGrid::new(0.0), Err(GrowthError::InvalidRadius(_))));
        assert!(SpatialGrid::new(-1.0).is_err());
        assert!(SpatialGrid::new(f64::NAN).is_err());
        assert!(SpatialGrid::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_zero_radius_has_no_pairs() {
        let points = line(10, 0.1);
        assert!(radius_pairs(&points, 0.0).is_empty());
        assert!(radius_pairs(&points, -2.0).is_empty());
    }

    #[test]
    fn test_line_neighbors() {
        // Spacing 0.4 with radius 1.0: neighbors at distance 0.4 and 0.8
        let points = line(5, 0.4);
        let mut pairs: Vec<(usize, usize)> = radius_pairs(&points, 1.0)
            .into_iter()
            .map(|p| (p.i, p.j))
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (2, 4), (3, 4)]
        );
    }

    #[test]
    fn test_cutoff_is_strict() {
        let points = line(2, 1.0);
        assert!(radius_pairs(&points, 1.0).is_empty());
    }

    #[test]
    fn test_reports_squared_distance() {
        let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.3, 0.4, 0.0)];
        let pairs = radius_pairs(&points, 1.0);
        assert_eq!(pairs.len(), 1);
        assert!((pairs[0].distance_squared - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_points_are_paired() {
        let points = vec![Point3::new(1.0, 1.0, 1.0); 3];
        assert_eq!(radius_pairs(&points, 0.5).len(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let points: Vec<Point3<f64>> = (0..200)
            .map(|i| {
                let t = i as f64 * 0.37;
                Point3::new(t.sin() * 3.0, (t * 1.3).cos() * 3.0, (t * 0.7).sin() * 3.0)
            })
            .collect();
        let mut grid = SpatialGrid::new(0.9).unwrap();
        assert_eq!(grid.pairs(&points), grid.par_pairs(&points));
    }

    #[test]
    fn test_negative_coordinates() {
        let points = vec![Point3::new(-0.05, 0.0, 0.0), Point3::new(0.05, 0.0, 0.0)];
        assert_eq!(radius_pairs(&points, 0.2).len(), 1);
    }
}
