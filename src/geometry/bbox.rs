// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding box utilities

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox.expand_to_include(point);
        }
        bbox
    }

    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Horizontal extent used to frame the mesh: the largest absolute x or z
    /// coordinate of either corner. y is the up axis and does not count.
    pub fn horizontal_radius(&self) -> f64 {
        self.min
            .x
            .abs()
            .max(self.min.z.abs())
            .max(self.max.x.abs())
            .max(self.max.z.abs())
    }
}

/// Componentwise min/max corners, `None` for an empty point list
pub fn compute_bounds(points: &[Point3<f64>]) -> Option<BoundingBox> {
    if points.is_empty() {
        None
    } else {
        Some(BoundingBox::from_points(points))
    }
}

/// Framing radius of a bounds; see [`BoundingBox::horizontal_radius`]
pub fn bounding_radius(bounds: &BoundingBox) -> f64 {
    bounds.horizontal_radius()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let mut bbox = BoundingBox::empty();
        bbox.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
        bbox.expand_to_include(&Point3::new(-1.0, -2.0, -3.0));

        assert_eq!(bbox.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(bbox.max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_compute_bounds_empty() {
        assert!(compute_bounds(&[]).is_none());
    }

    #[test]
    fn test_horizontal_radius_ignores_y() {
        let bbox = compute_bounds(&[
            Point3::new(-0.5, 100.0, 0.25),
            Point3::new(0.75, -100.0, -2.0),
        ])
        .unwrap();
        assert_eq!(bbox.horizontal_radius(), 2.0);
    }
}
