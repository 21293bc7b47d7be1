//! Ability table loader.

use std::path::Path;

use gameplay_core::{
    AbilityDefinition, EffectId, ExecutionType, GameplayConfig, TagDatabase, TagId,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, resolve_tag};

/// Authored ability. Effects are referenced by id, tags by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub execution: ExecutionType,
    #[serde(default)]
    pub cooldown: f32,
    #[serde(default)]
    pub mana_cost: f32,
    #[serde(default)]
    pub required_tags: Vec<String>,
    #[serde(default)]
    pub blocked_tags: Vec<String>,
    #[serde(default)]
    pub flight_time: f32,
    #[serde(default)]
    pub primary_effect: Option<u32>,
    #[serde(default)]
    pub secondary_effect: Option<u32>,
    #[serde(default)]
    pub cleanse_tag: Option<String>,
    #[serde(default)]
    pub cooldown_effect: Option<u32>,
    #[serde(default)]
    pub cooldown_tag: Option<String>,
}

impl AbilitySpec {
    /// Resolves tag names into a core definition.
    pub fn compile(&self, tags: &TagDatabase) -> LoadResult<AbilityDefinition> {
        let owner = format!("ability {} ({})", self.id, self.name);
        for list in [&self.required_tags, &self.blocked_tags] {
            if list.len() > GameplayConfig::MAX_TAG_REQUIREMENTS {
                anyhow::bail!(
                    "{} lists {} tags, at most {} are supported",
                    owner,
                    list.len(),
                    GameplayConfig::MAX_TAG_REQUIREMENTS
                );
            }
        }

        let effect = |id: Option<u32>| id.map_or(EffectId::NONE, EffectId);
        let mut definition = AbilityDefinition::new(self.id, self.execution)
            .with_cost(self.mana_cost)
            .with_cooldown(self.cooldown)
            .with_flight_time(self.flight_time)
            .with_effects(effect(self.primary_effect), effect(self.secondary_effect))
            .with_cooldown_effect(
                effect(self.cooldown_effect),
                resolve_tag(tags, self.cooldown_tag.as_deref(), &owner)?,
            )
            .cleansing(resolve_tag(tags, self.cleanse_tag.as_deref(), &owner)?);

        for name in &self.required_tags {
            definition = definition.requiring(resolve(tags, name, &owner)?);
        }
        for name in &self.blocked_tags {
            definition = definition.blocked_by(resolve(tags, name, &owner)?);
        }
        Ok(definition)
    }
}

fn resolve(tags: &TagDatabase, name: &str, owner: &str) -> LoadResult<TagId> {
    resolve_tag(tags, Some(name), owner)
}

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityCatalog {
    #[serde(default)]
    pub abilities: Vec<AbilitySpec>,
}

/// Loader for ability tables from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load ability definitions, resolving tag names against `tags`.
    pub fn load(path: &Path, tags: &TagDatabase) -> LoadResult<Vec<AbilityDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content, tags)
    }

    pub fn parse(content: &str, tags: &TagDatabase) -> LoadResult<Vec<AbilityDefinition>> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;
        catalog
            .abilities
            .iter()
            .map(|spec| spec.compile(tags))
            .collect()
    }
}
