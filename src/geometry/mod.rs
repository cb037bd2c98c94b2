// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and derived vertex attributes

mod analytics;
mod bbox;
mod curvature;
mod mesh;
mod normals;
mod seed;
pub mod topology;

pub use analytics::{analyze, MeshStats};
pub use bbox::{bounding_radius, compute_bounds, BoundingBox};
pub use curvature::{compute_mean_curvature, mean_curvature_with_normals};
pub use mesh::{Cell, Mesh};
pub use normals::{compute_normals, degenerate_normals, NORMAL_EPSILON};
pub use seed::SeedShape;
pub use topology::EdgeSet;
