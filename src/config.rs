// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Simulation configuration

use crate::error::{GrowthError, Result};
use crate::geometry::SeedShape;
use crate::physics::GrowthParams;
use crate::remesh::RemeshParams;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default configuration file looked up by [`GrowthConfig::load`]
pub const CONFIG_FILE: &str = "surfgrow.toml";

/// Startup configuration for a growth run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Physics iterations per growth step
    pub iterations: usize,
    /// Cutoff distance for vertex repulsion
    pub repel_radius: f64,
    /// Remesh target edge length; the repel radius when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_length: Option<f64>,
    /// Curvature growth scale
    pub growth_rate: f64,
    /// Repulsion force scale
    pub repel_strength: f64,
    /// Repulsion softening added to d²
    pub softening: f64,
    /// Minimum wall-clock time per growth step, in milliseconds
    pub interval_ms: u64,
    /// Initial polyhedron
    pub seed_shape: SeedShape,
    /// Circumradius of the initial polyhedron
    pub seed_radius: f64,
    /// Fixed seed for the growth noise; entropy when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
    /// Snapshots that may wait for the consumer before new ones are dropped
    pub snapshot_backlog: usize,
    /// Remesh passes per growth step
    pub remesh_passes: usize,
    /// Tangential relaxation weight used by the remesher
    pub relaxation: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        let physics = GrowthParams::default();
        let remesh = RemeshParams::default();
        Self {
            iterations: physics.iterations,
            repel_radius: physics.repel_radius,
            edge_length: None,
            growth_rate: physics.growth_rate,
            repel_strength: physics.repel_strength,
            softening: physics.softening,
            interval_ms: 100,
            seed_shape: SeedShape::Icosahedron,
            seed_radius: 1.0,
            rng_seed: None,
            snapshot_backlog: 4,
            remesh_passes: remesh.passes,
            relaxation: remesh.relaxation,
        }
    }
}

impl GrowthConfig {
    /// Remesh target edge length
    pub fn target_edge_length(&self) -> f64 {
        self.edge_length.unwrap_or(self.repel_radius)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn growth_params(&self) -> GrowthParams {
        GrowthParams {
            iterations: self.iterations,
            repel_radius: self.repel_radius,
            repel_strength: self.repel_strength,
            growth_rate: self.growth_rate,
            softening: self.softening,
        }
    }

    pub fn remesh_params(&self) -> RemeshParams {
        RemeshParams {
            target_edge_length: self.target_edge_length(),
            passes: self.remesh_passes,
            relaxation: self.relaxation,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        self.growth_params().validate()?;
        self.remesh_params().validate()?;
        if !(self.seed_radius > 0.0) || !self.seed_radius.is_finite() {
            return Err(GrowthError::Config(format!(
                "seed radius must be positive, got {}",
                self.seed_radius
            )));
        }
        if self.snapshot_backlog == 0 {
            return Err(GrowthError::Config("snapshot backlog must be at least 1".into()));
        }
        Ok(())
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: GrowthConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `surfgrow.toml` from the working directory if present, then apply
    /// `SURFGROW_*` environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup such as the process environment.
    ///
    /// Every field has a key: `SURFGROW_` followed by the upper-case field
    /// name, e.g. `SURFGROW_SEED_SHAPE` or `SURFGROW_SNAPSHOT_BACKLOG`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: FromStr>(key: &str, value: &str) -> anyhow::Result<T>
        where
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid value for {}: {:?}", key, value))
        }

        if let Some(v) = lookup("SURFGROW_ITERATIONS") {
            self.iterations = parse("SURFGROW_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_REPEL_RADIUS") {
            self.repel_radius = parse("SURFGROW_REPEL_RADIUS", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_EDGE_LENGTH") {
            self.edge_length = Some(parse("SURFGROW_EDGE_LENGTH", &v)?);
        }
        if let Some(v) = lookup("SURFGROW_GROWTH_RATE") {
            self.growth_rate = parse("SURFGROW_GROWTH_RATE", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_REPEL_STRENGTH") {
            self.repel_strength = parse("SURFGROW_REPEL_STRENGTH", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_INTERVAL_MS") {
            self.interval_ms = parse("SURFGROW_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_SOFTENING") {
            self.softening = parse("SURFGROW_SOFTENING", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_SEED_SHAPE") {
            self.seed_shape = v
                .trim()
                .parse::<SeedShape>()
                .map_err(|e| anyhow!("Invalid value for SURFGROW_SEED_SHAPE: {}", e))?;
        }
        if let Some(v) = lookup("SURFGROW_SEED_RADIUS") {
            self.seed_radius = parse("SURFGROW_SEED_RADIUS", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_RNG_SEED") {
            self.rng_seed = Some(parse("SURFGROW_RNG_SEED", &v)?);
        }
        if let Some(v) = lookup("SURFGROW_SNAPSHOT_BACKLOG") {
            self.snapshot_backlog = parse("SURFGROW_SNAPSHOT_BACKLOG", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_REMESH_PASSES") {
            self.remesh_passes = parse("SURFGROW_REMESH_PASSES", &v)?;
        }
        if let Some(v) = lookup("SURFGROW_RELAXATION") {
            self.relaxation = parse("SURFGROW_RELAXATION", &v)?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_growth_constants() {
        let config = GrowthConfig::default();
        assert_eq!(config.iterations, 10);
        assert_eq!(config.repel_radius, 1.0);
        assert_eq!(config.target_edge_length(), 1.0);
        assert_eq!(config.growth_rate, 0.01);
        assert_eq!(config.repel_strength, 0.005);
        assert_eq!(config.softening, 0.1);
        assert_eq!(config.interval(), Duration::from_millis(100));
        assert_eq!(config.seed_shape, SeedShape::Icosahedron);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_edge_length_follows_repel_radius() {
        let config = GrowthConfig {
            repel_radius: 2.5,
            ..Default::default()
        };
        assert_eq!(config.remesh_params().target_edge_length, 2.5);

        let config = GrowthConfig {
            edge_length: Some(0.75),
            ..config
        };
        assert_eq!(config.remesh_params().target_edge_length, 0.75);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GrowthConfig = toml::from_str(
            r#"
            iterations = 4
            seed_shape = "octahedron"
            rng_seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.iterations, 4);
        assert_eq!(config.seed_shape, SeedShape::Octahedron);
        assert_eq!(config.rng_seed, Some(9));
        assert_eq!(config.repel_radius, 1.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growth.toml");
        let config = GrowthConfig {
            growth_rate: 0.02,
            rng_seed: Some(5),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(GrowthConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("SURFGROW_ITERATIONS", "3"),
            ("SURFGROW_REPEL_RADIUS", "0.5"),
            ("SURFGROW_RNG_SEED", "17"),
        ]
        .into_iter()
        .collect();

        let mut config = GrowthConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.iterations, 3);
        assert_eq!(config.repel_radius, 0.5);
        assert_eq!(config.rng_seed, Some(17));
    }

    #[test]
    fn test_every_field_has_an_override() {
        let env: HashMap<&str, &str> = [
            ("SURFGROW_ITERATIONS", "6"),
            ("SURFGROW_REPEL_RADIUS", "0.8"),
            ("SURFGROW_EDGE_LENGTH", "0.6"),
            ("SURFGROW_GROWTH_RATE", "0.02"),
            ("SURFGROW_REPEL_STRENGTH", "0.01"),
            ("SURFGROW_SOFTENING", "0.2"),
            ("SURFGROW_INTERVAL_MS", "0"),
            ("SURFGROW_SEED_SHAPE", "cube"),
            ("SURFGROW_SEED_RADIUS", "1.5"),
            ("SURFGROW_RNG_SEED", "3"),
            ("SURFGROW_SNAPSHOT_BACKLOG", "8"),
            ("SURFGROW_REMESH_PASSES", "3"),
            ("SURFGROW_RELAXATION", "0.25"),
        ]
        .into_iter()
        .collect();

        let mut config = GrowthConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        let expected = GrowthConfig {
            iterations: 6,
            repel_radius: 0.8,
            edge_length: Some(0.6),
            growth_rate: 0.02,
            repel_strength: 0.01,
            softening: 0.2,
            interval_ms: 0,
            seed_shape: SeedShape::Cube,
            seed_radius: 1.5,
            rng_seed: Some(3),
            snapshot_backlog: 8,
            remesh_passes: 3,
            relaxation: 0.25,
        };
        assert_eq!(config, expected);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_seed_shape_override_is_an_error() {
        let mut config = GrowthConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "SURFGROW_SEED_SHAPE").then(|| "dodecahedron".to_string())
        });
        assert!(result.is_err());
        assert_eq!(config.seed_shape, SeedShape::Icosahedron);
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let mut config = GrowthConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "SURFGROW_GROWTH_RATE").then(|| "fast".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GrowthConfig {
            repel_radius: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GrowthError::InvalidRadius(_))));

        let config = GrowthConfig {
            snapshot_backlog: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GrowthConfig {
            seed_radius: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
