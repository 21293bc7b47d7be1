//! Simulation configuration loader.

use std::path::Path;

use gameplay_core::{GameplayConfig, ManaPolicy};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Fixed-step parameters read from `simulation.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds advanced per tick.
    pub fixed_dt: f32,
    /// Run per-entity passes on the rayon pool.
    pub parallel: bool,
    /// Broadcast buffer size per event bus topic.
    pub event_capacity: usize,
    pub mana_policy: ManaPolicy,
}

impl SimulationConfig {
    pub const DEFAULT_FIXED_DT: f32 = 0.1;
    pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

    /// Core tunables derived from this configuration.
    pub fn gameplay(&self) -> GameplayConfig {
        GameplayConfig::with_mana_policy(self.mana_policy)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_dt: Self::DEFAULT_FIXED_DT,
            parallel: false,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
            mana_policy: ManaPolicy::default(),
        }
    }
}

/// Loader for simulation configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<SimulationConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SimulationConfig> {
        let config: SimulationConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse simulation TOML: {}", e))?;
        if !(config.fixed_dt.is_finite() && config.fixed_dt > 0.0) {
            anyhow::bail!("fixed_dt must be positive, got {}", config.fixed_dt);
        }
        Ok(config)
    }
}
