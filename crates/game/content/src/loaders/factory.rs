//! Content factory for building the gameplay database from data files.

use std::path::{Path, PathBuf};

use gameplay_core::{GameplayDatabase, TagDatabase};

use crate::loaders::{
    AbilityLoader, ConfigLoader, EffectLoader, LoadResult, SimulationConfig, TagLoader,
};

/// Content factory that loads all gameplay content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── simulation.toml   (optional; defaults apply when absent)
/// ├── tags.ron
/// ├── effects.ron
/// └── abilities.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load simulation parameters from `simulation.toml`.
    pub fn load_config(&self) -> LoadResult<SimulationConfig> {
        let path = self.data_dir.join("simulation.toml");
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(SimulationConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load and compile the tag hierarchy from `tags.ron`.
    pub fn load_tags(&self) -> LoadResult<TagDatabase> {
        TagLoader::load(&self.data_dir.join("tags.ron"))
    }

    /// Load tags, effects and abilities and validate them together.
    pub fn load_database(&self) -> LoadResult<GameplayDatabase> {
        let tags = self.load_tags()?;
        let effects = EffectLoader::load(&self.data_dir.join("effects.ron"), &tags)?;
        let abilities = AbilityLoader::load(&self.data_dir.join("abilities.ron"), &tags)?;
        let (effect_count, ability_count) = (effects.len(), abilities.len());

        let database = GameplayDatabase::builder(tags)
            .effects(effects)
            .abilities(abilities)
            .build()?;
        tracing::info!(
            "loaded gameplay database from {}: {} tags, {} effects, {} abilities",
            self.data_dir.display(),
            database.tags().len(),
            effect_count,
            ability_count
        );
        Ok(database)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }
}
