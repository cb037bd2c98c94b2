// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for the growth kernel

use thiserror::Error;

/// Errors raised by the growth kernel
#[derive(Debug, Error)]
pub enum GrowthError {
    /// A cutoff radius or cell size that is not strictly positive and finite
    #[error("invalid radius {0}: must be positive and finite")]
    InvalidRadius(f64),

    /// Mesh data that violates basic indexing rules
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// A mesh that is not a closed 2-manifold where one is required
    #[error("mesh is not a closed manifold: {0}")]
    NonManifold(String),

    /// Geometry that went non-finite during a step
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    /// Rejected configuration value
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GrowthError>;
