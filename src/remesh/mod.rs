// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Remeshing of closed surfaces

mod remesher;
mod work_mesh;

pub use remesher::{RemeshParams, RemeshReport, Remesher, COLLAPSE_RATIO, SPLIT_RATIO};
