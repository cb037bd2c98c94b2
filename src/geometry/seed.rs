// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Seed polyhedra for starting a growth run

use super::{Cell, Mesh};
use crate::utils::math::triangle_cross;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed convex base shapes, centered on the origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeedShape {
    Tetrahedron,
    Octahedron,
    Cube,
    #[default]
    Icosahedron,
}

impl SeedShape {
    /// Build the shape with every vertex at distance `radius` from the origin
    pub fn to_mesh(self, radius: f64) -> Mesh {
        let (directions, cells) = match self {
            Self::Tetrahedron => tetrahedron(),
            Self::Octahedron => octahedron(),
            Self::Cube => cube(),
            Self::Icosahedron => icosahedron(),
        };

        let positions = directions
            .into_iter()
            .map(|d| Point3::from(d.normalize() * radius))
            .collect::<Vec<_>>();
        let cells = orient_outward(&positions, cells);

        Mesh { positions, cells }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Tetrahedron => "tetrahedron",
            Self::Octahedron => "octahedron",
            Self::Cube => "cube",
            Self::Icosahedron => "icosahedron",
        }
    }
}

impl fmt::Display for SeedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeedShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tetrahedron" | "t" => Ok(Self::Tetrahedron),
            "octahedron" | "o" => Ok(Self::Octahedron),
            "cube" | "c" => Ok(Self::Cube),
            "icosahedron" | "i" => Ok(Self::Icosahedron),
            other => Err(format!("unknown seed shape: {}", other)),
        }
    }
}

/// Reorder each cell so its normal points away from the origin
fn orient_outward(positions: &[Point3<f64>], cells: Vec<Cell>) -> Vec<Cell> {
    cells
        .into_iter()
        .map(|c| {
            let (a, b, d) = (&positions[c[0]], &positions[c[1]], &positions[c[2]]);
            let centroid = (a.coords + b.coords + d.coords) / 3.0;
            if triangle_cross(a, b, d).dot(&centroid) < 0.0 {
                [c[0], c[2], c[1]]
            } else {
                c
            }
        })
        .collect()
}

fn tetrahedron() -> (Vec<Vector3<f64>>, Vec<Cell>) {
    let directions = vec![
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
    ];
    let cells = vec![[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];
    (directions, cells)
}

fn octahedron() -> (Vec<Vector3<f64>>, Vec<Cell>) {
    let directions = vec![
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 0.0, -1.0),
    ];
    let cells = vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];
    (directions, cells)
}

fn cube() -> (Vec<Vector3<f64>>, Vec<Cell>) {
    let directions = vec![
        Vector3::new(-1.0, -1.0, -1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(1.0, 1.0, -1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
        Vector3::new(1.0, -1.0, 1.0),
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(-1.0, 1.0, 1.0),
    ];
    let cells = vec![
        // z+
        [4, 5, 6],
        [4, 6, 7],
        // z-
        [1, 0, 3],
        [1, 3, 2],
        // x+
        [5, 1, 2],
        [5, 2, 6],
        // x-
        [0, 4, 7],
        [0, 7, 3],
        // y+
        [7, 6, 2],
        [7, 2, 3],
        // y-
        [0, 1, 5],
        [0, 5, 4],
    ];
    (directions, cells)
}

fn icosahedron() -> (Vec<Vector3<f64>>, Vec<Cell>) {
    let t = (1.0 + 5.0f64.sqrt()) / 2.0;
    let directions = vec![
        Vector3::new(-1.0, t, 0.0),
        Vector3::new(1.0, t, 0.0),
        Vector3::new(-1.0, -t, 0.0),
        Vector3::new(1.0, -t, 0.0),
        Vector3::new(0.0, -1.0, t),
        Vector3::new(0.0, 1.0, t),
        Vector3::new(0.0, -1.0, -t),
        Vector3::new(0.0, 1.0, -t),
        Vector3::new(t, 0.0, -1.0),
        Vector3::new(t, 0.0, 1.0),
        Vector3::new(-t, 0.0, -1.0),
        Vector3::new(-t, 0.0, 1.0),
    ];
    let cells = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    (directions, cells)
}
