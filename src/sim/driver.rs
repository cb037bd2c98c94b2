// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Growth loop: snapshot, integrate, remesh, repeat

use super::{Delivery, Snapshot, SnapshotSink};
use crate::config::GrowthConfig;
use crate::error::Result;
use crate::geometry::{degenerate_normals, Mesh};
use crate::physics::{GrowthNoise, IntegrationReport, Integrator, ProductNoise, VertexAttributes};
use crate::remesh::{RemeshReport, Remesher};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What one call to [`Simulation::advance`] did
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepReport {
    /// Step counter after the advance
    pub step: u64,
    pub integration: IntegrationReport,
    pub remesh: RemeshReport,
    /// Vertices whose normal was the zero vector
    pub degenerate_normals: usize,
}

/// Totals for a run that ended because the consumer went away
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: u64,
    pub delivered: u64,
    pub dropped: u64,
}

/// Owns the surface and everything needed to grow it
pub struct Simulation {
    config: GrowthConfig,
    mesh: Mesh,
    integrator: Integrator,
    remesher: Remesher,
    noise: Box<dyn GrowthNoise>,
    step: u64,
}

impl Simulation {
    /// Start from the configured seed shape. Noise is seeded from
    /// `rng_seed` when set.
    pub fn new(config: GrowthConfig) -> Result<Self> {
        let noise: Box<dyn GrowthNoise> = match config.rng_seed {
            Some(seed) => Box::new(ProductNoise::seeded(seed)),
            None => Box::new(ProductNoise::from_entropy()),
        };
        Self::with_noise(config, noise)
    }

    pub fn with_noise(config: GrowthConfig, noise: Box<dyn GrowthNoise>) -> Result<Self> {
        config.validate()?;
        let mesh = config.seed_shape.to_mesh(config.seed_radius);
        Ok(Self {
            integrator: Integrator::new(config.growth_params())?,
            remesher: Remesher::new(config.remesh_params())?,
            config,
            mesh,
            noise,
            step: 0,
        })
    }

    /// Replace the seed with an externally built closed manifold
    pub fn with_mesh(mut self, mesh: Mesh) -> Result<Self> {
        mesh.validate_closed_manifold()?;
        self.mesh = mesh;
        Ok(self)
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.step, &self.mesh)
    }

    /// One growth step followed by one remesh.
    ///
    /// On error the current mesh and step counter are left unchanged.
    pub fn advance(&mut self) -> Result<StepReport> {
        let attributes = VertexAttributes::compute(&self.mesh);
        let degenerate = degenerate_normals(&attributes.normals);
        if !degenerate.is_empty() {
            warn!(
                step = self.step,
                count = degenerate.len(),
                first = degenerate[0],
                "degenerate vertex normals"
            );
        }

        let mut grown = self.mesh.clone();
        let integration = self
            .integrator
            .integrate(&mut grown, &attributes, self.noise.as_mut())?;
        let (remeshed, remesh) = self.remesher.remesh(&grown, &attributes.normals)?;

        self.mesh = remeshed;
        self.step += 1;

        info!(
            step = self.step,
            vertices = self.mesh.vertex_count(),
            cells = self.mesh.cell_count(),
            splits = remesh.splits,
            collapses = remesh.collapses,
            max_displacement = integration.max_displacement,
            "growth step"
        );

        Ok(StepReport {
            step: self.step,
            integration,
            remesh,
            degenerate_normals: degenerate.len(),
        })
    }

    /// Emit a snapshot and advance, pacing each step to at least the
    /// configured interval, until the sink reports closed.
    pub fn run<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary> {
        let interval = self.config.interval();
        let mut summary = RunSummary::default();

        loop {
            let started = Instant::now();

            match sink.offer(self.snapshot()) {
                Delivery::Delivered => summary.delivered += 1,
                Delivery::Dropped => {
                    summary.dropped += 1;
                    debug!(step = self.step, "snapshot backlog full, dropped");
                }
                Delivery::Closed => {
                    info!(
                        steps = summary.steps,
                        delivered = summary.delivered,
                        dropped = summary.dropped,
                        "snapshot consumer closed, stopping"
                    );
                    return Ok(summary);
                }
            }

            self.advance()?;
            summary.steps += 1;

            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}
