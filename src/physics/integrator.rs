// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Repulsion and curvature-driven growth integration
//!
//! One growth step runs a fixed number of explicit iterations over vertex
//! positions. Normals, curvature and the edge set are computed once before
//! the first iteration and held for the whole step; only positions move.

use super::noise::GrowthNoise;
use crate::error::{GrowthError, Result};
use crate::geometry::{compute_normals, mean_curvature_with_normals, EdgeSet, Mesh};
use crate::spatial::{PointPair, SpatialGrid};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Physics constants for one growth step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthParams {
    /// Inner iterations per growth step
    pub iterations: usize,
    /// Cutoff distance for vertex repulsion
    pub repel_radius: f64,
    /// Scale applied to accumulated repulsion
    pub repel_strength: f64,
    /// Scale applied to curvature-driven displacement
    pub growth_rate: f64,
    /// Added to d² in the repulsion denominator
    pub softening: f64,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            iterations: 10,
            repel_radius: 1.0,
            repel_strength: 0.005,
            growth_rate: 0.01,
            softening: 0.1,
        }
    }
}

impl GrowthParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.repel_radius > 0.0) || !self.repel_radius.is_finite() {
            return Err(GrowthError::InvalidRadius(self.repel_radius));
        }
        if self.iterations == 0 {
            return Err(GrowthError::Config("iterations must be at least 1".into()));
        }
        if !(self.softening > 0.0) || !self.softening.is_finite() {
            return Err(GrowthError::Config(format!(
                "softening must be positive, got {}",
                self.softening
            )));
        }
        for (name, value) in [
            ("repel_strength", self.repel_strength),
            ("growth_rate", self.growth_rate),
        ] {
            if !value.is_finite() {
                return Err(GrowthError::Config(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.repel_strength < 0.0 {
            return Err(GrowthError::Config(format!(
                "repel_strength must not be negative, got {}",
                self.repel_strength
            )));
        }
        Ok(())
    }
}

/// Per-vertex attributes that stay fixed during one growth step
#[derive(Debug, Clone)]
pub struct VertexAttributes {
    pub normals: Vec<Vector3<f64>>,
    pub curvature: Vec<f64>,
}

impl VertexAttributes {
    pub fn compute(mesh: &Mesh) -> Self {
        let normals = compute_normals(&mesh.cells, &mesh.positions);
        let curvature = mean_curvature_with_normals(&mesh.cells, &mesh.positions, &normals);
        Self { normals, curvature }
    }
}

/// Outcome of one growth step
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IntegrationReport {
    pub iterations: usize,
    /// Non-adjacent pairs that exchanged force, summed over iterations
    pub repulsion_pairs: usize,
    /// Pairs skipped because they share a mesh edge, summed over iterations
    pub adjacent_pairs: usize,
    /// Largest single-iteration vertex displacement
    pub max_displacement: f64,
}

/// Repulsion on `p` from `q` at squared distance `d2`. The force on `q` from
/// `p` is exactly the negation.
#[inline]
pub fn repulsion(p: &Point3<f64>, q: &Point3<f64>, d2: f64, softening: f64) -> Vector3<f64> {
    (p - q) / (softening + d2)
}

/// Add equal and opposite repulsion to both ends of every non-adjacent pair.
///
/// Returns `(applied, skipped)` pair counts.
pub fn accumulate_repulsion(
    positions: &[Point3<f64>],
    pairs: &[PointPair],
    edges: &EdgeSet,
    softening: f64,
    forces: &mut [Vector3<f64>],
) -> (usize, usize) {
    let mut applied = 0;
    let mut skipped = 0;
    for pair in pairs {
        if edges.contains(pair.i, pair.j) {
            skipped += 1;
            continue;
        }
        let r = repulsion(&positions[pair.i], &positions[pair.j], pair.distance_squared, softening);
        forces[pair.i] += r;
        forces[pair.j] -= r;
        applied += 1;
    }
    (applied, skipped)
}

/// Explicit integrator for repulsion plus growth
#[derive(Debug, Clone)]
pub struct Integrator {
    params: GrowthParams,
    grid: SpatialGrid,
    forces: Vec<Vector3<f64>>,
    noise: Vec<f64>,
}

impl Integrator {
    pub fn new(params: GrowthParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            grid: SpatialGrid::new(params.repel_radius)?,
            params,
            forces: Vec::new(),
            noise: Vec::new(),
        })
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    /// Run one growth step on `mesh`, computing its attributes first
    pub fn step(&mut self, mesh: &mut Mesh, noise: &mut dyn GrowthNoise) -> Result<VertexAttributes> {
        let attributes = VertexAttributes::compute(mesh);
        self.integrate(mesh, &attributes, noise)?;
        Ok(attributes)
    }

    /// Run all inner iterations on `mesh` with fixed `attributes`.
    /// Cells are left untouched.
    pub fn integrate(
        &mut self,
        mesh: &mut Mesh,
        attributes: &VertexAttributes,
        noise: &mut dyn GrowthNoise,
    ) -> Result<IntegrationReport> {
        let n = mesh.positions.len();
        if attributes.normals.len() != n || attributes.curvature.len() != n {
            return Err(GrowthError::InvalidMesh(format!(
                "attributes cover {} normals and {} curvatures for {} vertices",
                attributes.normals.len(),
                attributes.curvature.len(),
                n
            )));
        }

        let edges = EdgeSet::from_cells(&mesh.cells);
        let GrowthParams {
            iterations,
            repel_strength,
            growth_rate,
            softening,
            ..
        } = self.params;

        self.forces.clear();
        self.forces.resize(n, Vector3::zeros());
        self.noise.resize(n, 0.0);

        let mut report = IntegrationReport {
            iterations,
            ..Default::default()
        };

        for _ in 0..iterations {
            self.forces.iter_mut().for_each(|f| *f = Vector3::zeros());

            let pairs = self.grid.par_pairs(&mesh.positions);
            let (applied, skipped) =
                accumulate_repulsion(&mesh.positions, &pairs, &edges, softening, &mut self.forces);
            report.repulsion_pairs += applied;
            report.adjacent_pairs += skipped;

            // Draw in vertex order so a seeded source reproduces exactly
            for w in self.noise.iter_mut() {
                *w = noise.sample();
            }

            let forces = &self.forces;
            let draws = &self.noise;
            let normals = &attributes.normals;
            let curvature = &attributes.curvature;
            let max_step = mesh
                .positions
                .par_iter_mut()
                .enumerate()
                .map(|(i, p)| {
                    let delta = forces[i] * repel_strength
                        + normals[i] * (growth_rate * curvature[i] * draws[i]);
                    *p += delta;
                    delta.norm()
                })
                .reduce(|| 0.0, f64::max);
            report.max_displacement = report.max_displacement.max(max_step);

            self.forces.iter_mut().for_each(|f| *f = Vector3::zeros());
        }

        Ok(report)
    }
}
