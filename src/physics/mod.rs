// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Growth physics: repulsion forces, curvature growth, noise strategies

mod integrator;
mod noise;

pub use integrator::{
    accumulate_repulsion, repulsion, GrowthParams, IntegrationReport, Integrator, VertexAttributes,
};
pub use noise::{ConstantNoise, GrowthNoise, ProductNoise};
