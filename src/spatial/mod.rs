// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Spatial pair enumeration

mod grid;

pub use grid::{brute_force_pairs, radius_pairs, PointPair, SpatialGrid};
