// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mutable indexed mesh used while remeshing
//!
//! Faces and vertices are never removed from the arrays, only marked dead,
//! so indices stay valid for the duration of a remesh call. Each vertex keeps
//! the list of live faces around it for local queries.

use crate::geometry::{Cell, Mesh, NORMAL_EPSILON};
use crate::utils::math::{normalize_or_zero, sorted_edge, triangle_cross};
use nalgebra::{Point3, Vector3};

/// Rotate `face` so that it starts with the edge `{a, b}`, keeping its
/// cyclic order. Returns `[u, v, w]` with `{u, v} == {a, b}`.
pub(crate) fn rotate_to_edge(face: Cell, a: usize, b: usize) -> Option<Cell> {
    (0..3).find_map(|k| {
        let u = face[k];
        let v = face[(k + 1) % 3];
        if (u == a && v == b) || (u == b && v == a) {
            Some([u, v, face[(k + 2) % 3]])
        } else {
            None
        }
    })
}

#[derive(Debug, Clone)]
pub(crate) struct WorkMesh {
    pub positions: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub faces: Vec<Cell>,
    pub face_alive: Vec<bool>,
    pub vertex_alive: Vec<bool>,
    pub vertex_faces: Vec<Vec<usize>>,
}

impl WorkMesh {
    pub fn new(mesh: &Mesh, normals: &[Vector3<f64>]) -> Self {
        let n = mesh.positions.len();
        let mut work = Self {
            positions: mesh.positions.clone(),
            normals: normals.to_vec(),
            faces: Vec::with_capacity(mesh.cells.len() * 2),
            face_alive: Vec::with_capacity(mesh.cells.len() * 2),
            vertex_alive: vec![true; n],
            vertex_faces: vec![Vec::new(); n],
        };
        for &cell in &mesh.cells {
            work.push_face(cell);
        }
        work
    }

    pub fn push_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) -> usize {
        let index = self.positions.len();
        self.positions.push(position);
        self.normals.push(normal);
        self.vertex_alive.push(true);
        self.vertex_faces.push(Vec::new());
        index
    }

    pub fn push_face(&mut self, face: Cell) -> usize {
        let index = self.faces.len();
        self.faces.push(face);
        self.face_alive.push(true);
        for &v in &face {
            self.vertex_faces[v].push(index);
        }
        index
    }

    pub fn kill_face(&mut self, fi: usize) {
        if !self.face_alive[fi] {
            return;
        }
        self.face_alive[fi] = false;
        let face = self.faces[fi];
        for &v in &face {
            self.vertex_faces[v].retain(|&x| x != fi);
        }
    }

    pub fn kill_vertex(&mut self, v: usize) {
        self.vertex_alive[v] = false;
        self.vertex_faces[v].clear();
    }

    pub fn alive_vertex_count(&self) -> usize {
        self.vertex_alive.iter().filter(|&&a| a).count()
    }

    /// Live faces containing both `a` and `b`
    pub fn edge_faces(&self, a: usize, b: usize) -> Vec<usize> {
        self.vertex_faces[a]
            .iter()
            .copied()
            .filter(|&fi| self.faces[fi].contains(&b))
            .collect()
    }

    /// Sorted one-ring of `v`
    pub fn neighbors(&self, v: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.vertex_faces[v]
            .iter()
            .flat_map(|&fi| self.faces[fi])
            .filter(|&x| x != v)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn valence(&self, v: usize) -> usize {
        self.neighbors(v).len()
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.vertex_faces[a]
            .iter()
            .any(|&fi| self.faces[fi].contains(&b))
    }

    /// All live edges in ascending order
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .faces
            .iter()
            .zip(&self.face_alive)
            .filter(|(_, &alive)| alive)
            .flat_map(|(f, _)| (0..3).map(move |k| sorted_edge(f[k], f[(k + 1) % 3])))
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    pub fn edge_length_squared(&self, a: usize, b: usize) -> f64 {
        (self.positions[a] - self.positions[b]).norm_squared()
    }

    pub fn face_cross(&self, face: &Cell) -> Vector3<f64> {
        triangle_cross(
            &self.positions[face[0]],
            &self.positions[face[1]],
            &self.positions[face[2]],
        )
    }

    /// Area-weighted normal from the live faces around `v`
    pub fn local_normal(&self, v: usize) -> Vector3<f64> {
        let sum: Vector3<f64> = self.vertex_faces[v]
            .iter()
            .map(|&fi| self.face_cross(&self.faces[fi]))
            .sum();
        normalize_or_zero(&sum, NORMAL_EPSILON)
    }

    /// Normal for a vertex created between `a` and `b`
    pub fn blended_normal(&self, a: usize, b: usize) -> Vector3<f64> {
        let n = normalize_or_zero(&(self.normals[a] + self.normals[b]), NORMAL_EPSILON);
        if n.norm_squared() > 0.0 {
            n
        } else {
            self.normals[a]
        }
    }

    /// Drop dead entries and renumber into a plain mesh
    pub fn compact(&self) -> Mesh {
        let mut remap = vec![usize::MAX; self.positions.len()];
        let mut positions = Vec::with_capacity(self.positions.len());
        for v in 0..self.positions.len() {
            if self.vertex_alive[v] && !self.vertex_faces[v].is_empty() {
                remap[v] = positions.len();
                positions.push(self.positions[v]);
            }
        }

        let cells = self
            .faces
            .iter()
            .zip(&self.face_alive)
            .filter(|(_, &alive)| alive)
            .map(|(f, _)| [remap[f[0]], remap[f[1]], remap[f[2]]])
            .collect();

        Mesh { positions, cells }
    }
}
