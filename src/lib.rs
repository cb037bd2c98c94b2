// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Surfgrow Kernel
//!
//! Differential growth of a closed triangle surface. Vertices repel their
//! non-adjacent neighbors, move along their normals in proportion to mean
//! curvature, and the surface is remeshed after every step to keep edge
//! lengths near a target.

pub mod config;
pub mod error;
pub mod geometry;
pub mod physics;
pub mod remesh;
pub mod sim;
pub mod spatial;
pub mod utils;

pub use config::GrowthConfig;
pub use error::{GrowthError, Result};
pub use geometry::{analyze, Mesh, MeshStats, SeedShape};
pub use physics::{ConstantNoise, GrowthNoise, GrowthParams, Integrator, ProductNoise};
pub use remesh::{RemeshParams, Remesher};
pub use sim::{snapshot_channel, Delivery, RunSummary, Simulation, Snapshot, SnapshotSink};
pub use spatial::{radius_pairs, PointPair, SpatialGrid};

/// Grow the configured seed for `steps` steps and return the surface
pub fn grow(config: GrowthConfig, steps: usize) -> Result<Mesh> {
    let mut sim = Simulation::new(config)?;
    for _ in 0..steps {
        sim.advance()?;
    }
    Ok(sim.into_mesh())
}
