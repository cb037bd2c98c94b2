// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Stochastic scaling of the growth term

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the per-vertex growth multiplier
pub trait GrowthNoise: Send {
    /// Next multiplier, expected in `[0, 1)`
    fn sample(&mut self) -> f64;
}

/// Product of two independent uniform `[0, 1)` draws.
///
/// The product skews toward small values, so most vertices move a little
/// and a few move close to the full growth rate.
#[derive(Debug, Clone)]
pub struct ProductNoise<R: Rng> {
    rng: R,
}

impl<R: Rng> ProductNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl ProductNoise<StdRng> {
    /// Reproducible noise from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Noise seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> GrowthNoise for ProductNoise<R> {
    fn sample(&mut self) -> f64 {
        self.rng.gen::<f64>() * self.rng.gen::<f64>()
    }
}

/// Deterministic multiplier, always the same value
#[derive(Debug, Clone, Copy)]
pub struct ConstantNoise(pub f64);

impl GrowthNoise for ConstantNoise {
    fn sample(&mut self) -> f64 {
        self.0
    }
}
