// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Isotropic remeshing toward a target edge length
//!
//! Each pass runs, in order:
//!   1. split edges longer than 4/3 of the target at their midpoint
//!   2. collapse edges shorter than 4/5 of the target to their midpoint
//!   3. flip edges that bring vertex valences closer to 6
//!   4. tangential relaxation toward the one-ring centroid
//!
//! Relaxation can stretch edges past the split threshold again, so a last
//! split round runs after the final pass. Returned edges stay below 4/3 of
//! the target unless the split round cap is hit.
//!
//! Every operation is local and only applied when it keeps the surface a
//! closed, consistently oriented 2-manifold. Candidates are visited in a
//! sorted order, so identical input gives identical output.

use super::work_mesh::{rotate_to_edge, WorkMesh};
use crate::error::{GrowthError, Result};
use crate::geometry::Mesh;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Edges longer than `target * SPLIT_RATIO` are split
pub const SPLIT_RATIO: f64 = 4.0 / 3.0;
/// Edges shorter than `target * COLLAPSE_RATIO` are collapsed
pub const COLLAPSE_RATIO: f64 = 4.0 / 5.0;
/// Split rounds per pass; each round only splits edges present at its start
const MAX_SPLIT_ROUNDS: usize = 4;
/// Cells with a smaller cross product are treated as degenerate
const DEGENERATE_CROSS: f64 = 1e-12;

/// Remeshing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemeshParams {
    pub target_edge_length: f64,
    /// Full split/collapse/flip/relax passes per call
    pub passes: usize,
    /// Fraction of the tangential centroid offset applied per pass, in `[0, 1]`
    pub relaxation: f64,
}

impl Default for RemeshParams {
    fn default() -> Self {
        Self {
            target_edge_length: 1.0,
            passes: 2,
            relaxation: 0.5,
        }
    }
}

impl RemeshParams {
    pub fn with_target_edge_length(target: f64) -> Self {
        Self {
            target_edge_length: target,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.target_edge_length > 0.0) || !self.target_edge_length.is_finite() {
            return Err(GrowthError::Config(format!(
                "target edge length must be positive, got {}",
                self.target_edge_length
            )));
        }
        if self.passes == 0 {
            return Err(GrowthError::Config("remesh passes must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.relaxation) {
            return Err(GrowthError::Config(format!(
                "relaxation must be within [0, 1], got {}",
                self.relaxation
            )));
        }
        Ok(())
    }
}

/// What a remesh call did
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RemeshReport {
    pub splits: usize,
    pub collapses: usize,
    pub flips: usize,
    pub vertices_before: usize,
    pub vertices_after: usize,
}

/// Isotropic remesher
#[derive(Debug, Clone)]
pub struct Remesher {
    params: RemeshParams,
}

impl Remesher {
    pub fn new(params: RemeshParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &RemeshParams {
        &self.params
    }

    /// Remesh a closed manifold. `normals` are per-vertex directions used for
    /// tangential relaxation; zero entries fall back to the local face normal.
    ///
    /// Fails if the input is not a closed manifold or if the result would
    /// not be one.
    pub fn remesh(&self, mesh: &Mesh, normals: &[Vector3<f64>]) -> Result<(Mesh, RemeshReport)> {
        mesh.validate_closed_manifold()?;
        if normals.len() != mesh.vertex_count() {
            return Err(GrowthError::InvalidMesh(format!(
                "{} normals for {} vertices",
                normals.len(),
                mesh.vertex_count()
            )));
        }

        let target = self.params.target_edge_length;
        let high = target * SPLIT_RATIO;
        let low = target * COLLAPSE_RATIO;

        let mut work = WorkMesh::new(mesh, normals);
        let mut report = RemeshReport {
            vertices_before: mesh.vertex_count(),
            ..Default::default()
        };

        for pass in 0..self.params.passes {
            report.splits += split_long_edges(&mut work, high);
            report.collapses += collapse_short_edges(&mut work, low, high);
            report.flips += equalize_valences(&mut work);
            relax(&mut work, self.params.relaxation);
            debug!(
                pass,
                vertices = work.alive_vertex_count(),
                "remesh pass complete"
            );
        }
        report.splits += split_long_edges(&mut work, high);

        let out = work.compact();
        out.validate_closed_manifold().map_err(|e| {
            GrowthError::NonManifold(format!("remesh produced an invalid surface: {}", e))
        })?;
        report.vertices_after = out.vertex_count();

        Ok((out, report))
    }
}

/// Split every edge above `high`, longest first
fn split_long_edges(work: &mut WorkMesh, high: f64) -> usize {
    let high2 = high * high;
    let mut splits = 0;

    for _ in 0..MAX_SPLIT_ROUNDS {
        let mut candidates: Vec<(usize, usize, f64)> = work
            .edges()
            .into_iter()
            .map(|(a, b)| (a, b, work.edge_length_squared(a, b)))
            .filter(|&(_, _, len2)| len2 > high2)
            .collect();
        if candidates.is_empty() {
            break;
        }
        candidates.sort_by(|x, y| y.2.total_cmp(&x.2).then((x.0, x.1).cmp(&(y.0, y.1))));

        for (a, b, _) in candidates {
            if work.edge_length_squared(a, b) > high2 && split_edge(work, a, b) {
                splits += 1;
            }
        }
    }

    splits
}

/// Insert the midpoint of edge `(a, b)`, replacing each of its two faces by two
fn split_edge(work: &mut WorkMesh, a: usize, b: usize) -> bool {
    let faces = work.edge_faces(a, b);
    if faces.len() != 2 {
        return false;
    }

    let midpoint = nalgebra::center(&work.positions[a], &work.positions[b]);
    let normal = work.blended_normal(a, b);
    let m = work.push_vertex(midpoint, normal);

    for fi in faces {
        let Some([u, v, w]) = rotate_to_edge(work.faces[fi], a, b) else {
            continue;
        };
        work.kill_face(fi);
        work.push_face([u, m, w]);
        work.push_face([m, v, w]);
    }
    true
}

/// Collapse every edge below `low` when safe, shortest first
fn collapse_short_edges(work: &mut WorkMesh, low: f64, high: f64) -> usize {
    let low2 = low * low;
    let high2 = high * high;

    let mut candidates: Vec<(usize, usize, f64)> = work
        .edges()
        .into_iter()
        .map(|(a, b)| (a, b, work.edge_length_squared(a, b)))
        .filter(|&(_, _, len2)| len2 < low2)
        .collect();
    candidates.sort_by(|x, y| x.2.total_cmp(&y.2).then((x.0, x.1).cmp(&(y.0, y.1))));

    let mut collapses = 0;
    for (a, b, _) in candidates {
        if !work.vertex_alive[a] || !work.vertex_alive[b] {
            continue;
        }
        if work.edge_length_squared(a, b) >= low2 {
            continue;
        }
        if can_collapse(work, a, b, high2) {
            collapse_edge(work, a, b);
            collapses += 1;
        }
    }
    collapses
}

/// Whether merging `b` into `a` at the edge midpoint keeps the surface valid
fn can_collapse(work: &WorkMesh, a: usize, b: usize, high2: f64) -> bool {
    let shared = work.edge_faces(a, b);
    if shared.len() != 2 {
        return false;
    }
    // A tetrahedron cannot lose a vertex and stay closed
    if work.alive_vertex_count() <= 4 {
        return false;
    }

    let na = work.neighbors(a);
    let nb = work.neighbors(b);

    // Link condition: the only common neighbors are the two opposite corners
    let common: Vec<usize> = na.iter().copied().filter(|v| nb.binary_search(v).is_ok()).collect();
    if common.len() != 2 {
        return false;
    }
    if common.iter().any(|&c| work.valence(c) <= 3) {
        return false;
    }

    let midpoint = nalgebra::center(&work.positions[a], &work.positions[b]);
    let too_long = na
        .iter()
        .chain(nb.iter())
        .filter(|&&v| v != a && v != b)
        .any(|&v| (work.positions[v] - midpoint).norm_squared() > high2);
    if too_long {
        return false;
    }

    // Faces that survive must keep their orientation and some area
    let moved = |v: usize| -> Point3<f64> {
        if v == a || v == b {
            midpoint
        } else {
            work.positions[v]
        }
    };
    for &fi in work.vertex_faces[a].iter().chain(work.vertex_faces[b].iter()) {
        let face = work.faces[fi];
        if face.contains(&a) && face.contains(&b) {
            continue;
        }
        let before = work.face_cross(&face);
        let (p0, p1, p2) = (moved(face[0]), moved(face[1]), moved(face[2]));
        let after = (p1 - p0).cross(&(p2 - p0));
        if after.norm() < DEGENERATE_CROSS || before.dot(&after) <= 0.0 {
            return false;
        }
    }

    true
}

/// Merge `b` into `a`, placing `a` at the old edge midpoint
fn collapse_edge(work: &mut WorkMesh, a: usize, b: usize) {
    let midpoint = nalgebra::center(&work.positions[a], &work.positions[b]);
    let normal = work.blended_normal(a, b);
    work.positions[a] = midpoint;
    work.normals[a] = normal;

    for fi in work.edge_faces(a, b) {
        work.kill_face(fi);
    }

    let around_b = work.vertex_faces[b].clone();
    for fi in around_b {
        let mut face = work.faces[fi];
        for v in face.iter_mut() {
            if *v == b {
                *v = a;
            }
        }
        work.kill_face(fi);
        work.push_face(face);
    }
    work.kill_vertex(b);
}

/// Flip edges whose flip lowers the summed valence deviation from 6
fn equalize_valences(work: &mut WorkMesh) -> usize {
    const TARGET: i64 = 6;
    let mut valence: Vec<i64> = (0..work.positions.len())
        .map(|v| {
            if work.vertex_alive[v] {
                work.valence(v) as i64
            } else {
                0
            }
        })
        .collect();

    let deviation = |vals: [i64; 4]| -> i64 { vals.iter().map(|v| (v - TARGET).abs()).sum() };

    let mut flips = 0;
    for (a, b) in work.edges() {
        let faces = work.edge_faces(a, b);
        if faces.len() != 2 {
            continue;
        }
        let Some([u, v, c]) = rotate_to_edge(work.faces[faces[0]], a, b) else {
            continue;
        };
        let Some([v2, u2, d]) = rotate_to_edge(work.faces[faces[1]], a, b) else {
            continue;
        };
        if v2 != v || u2 != u || c == d {
            continue;
        }
        if valence[u] <= 3 || valence[v] <= 3 {
            continue;
        }
        if work.are_adjacent(c, d) {
            continue;
        }

        let before = deviation([valence[u], valence[v], valence[c], valence[d]]);
        let after = deviation([valence[u] - 1, valence[v] - 1, valence[c] + 1, valence[d] + 1]);
        if after >= before {
            continue;
        }

        let old = work.face_cross(&work.faces[faces[0]]) + work.face_cross(&work.faces[faces[1]]);
        let n1 = work.face_cross(&[c, u, d]);
        let n2 = work.face_cross(&[d, v, c]);
        if n1.norm() < DEGENERATE_CROSS
            || n2.norm() < DEGENERATE_CROSS
            || n1.dot(&n2) <= 0.0
            || n1.dot(&old) <= 0.0
            || n2.dot(&old) <= 0.0
        {
            continue;
        }

        work.kill_face(faces[0]);
        work.kill_face(faces[1]);
        work.push_face([c, u, d]);
        work.push_face([d, v, c]);
        valence[u] -= 1;
        valence[v] -= 1;
        valence[c] += 1;
        valence[d] += 1;
        flips += 1;
    }
    flips
}

/// Move each vertex part of the way toward its one-ring centroid, within its
/// tangent plane
fn relax(work: &mut WorkMesh, weight: f64) {
    if weight == 0.0 {
        return;
    }

    let snapshot = &*work;
    let updated: Vec<Point3<f64>> = (0..snapshot.positions.len())
        .into_par_iter()
        .map(|v| {
            let p = snapshot.positions[v];
            if !snapshot.vertex_alive[v] {
                return p;
            }
            let ring = snapshot.neighbors(v);
            if ring.is_empty() {
                return p;
            }
            let centroid: Vector3<f64> =
                ring.iter().map(|&j| snapshot.positions[j].coords).sum::<Vector3<f64>>()
                    / ring.len() as f64;

            let mut normal = snapshot.normals[v];
            if normal.norm_squared() == 0.0 {
                normal = snapshot.local_normal(v);
            }

            let offset = centroid - p.coords;
            let tangential = offset - normal * normal.dot(&offset);
            p + tangential * weight
        })
        .collect();

    work.positions = updated;
}
