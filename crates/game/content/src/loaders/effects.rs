//! Effect table loader.

use std::path::Path;

use gameplay_core::{
    AttributeModifier, EffectDefinition, GameplayConfig, StackingPolicy, TagDatabase,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, resolve_tag};

/// Authored effect. Tags are referenced by name.
///
/// `period` makes the effect periodic; omitting `duration` (or setting it
/// to zero) without `permanent` makes it a one-shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSpec {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub period: Option<f32>,
    #[serde(default)]
    pub granted_tag: Option<String>,
    #[serde(default)]
    pub revert_on_end: bool,
    #[serde(default)]
    pub stacking: StackingPolicy,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    #[serde(default)]
    pub blocked_by_tag: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<AttributeModifier>,
}

fn default_max_stacks() -> u32 {
    1
}

impl EffectSpec {
    /// Resolves tag names into a core definition.
    pub fn compile(&self, tags: &TagDatabase) -> LoadResult<EffectDefinition> {
        let owner = format!("effect {} ({})", self.id, self.name);
        if self.modifiers.len() > GameplayConfig::MAX_MODIFIERS {
            anyhow::bail!(
                "{} has {} modifiers, at most {} are supported",
                owner,
                self.modifiers.len(),
                GameplayConfig::MAX_MODIFIERS
            );
        }

        let mut definition = EffectDefinition::new(self.id)
            .with_duration(self.duration)
            .granting(resolve_tag(tags, self.granted_tag.as_deref(), &owner)?)
            .blocked_by(resolve_tag(tags, self.blocked_by_tag.as_deref(), &owner)?)
            .stacking(self.stacking, self.max_stacks);
        if self.permanent {
            definition = definition.permanent();
        }
        if let Some(period) = self.period {
            definition = definition.periodic(period);
        }
        if self.revert_on_end {
            definition = definition.reverting();
        }
        Ok(self
            .modifiers
            .iter()
            .fold(definition, |definition, modifier| definition.modifier(*modifier)))
    }
}

/// Effect catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectCatalog {
    #[serde(default)]
    pub effects: Vec<EffectSpec>,
}

/// Loader for effect tables from RON files.
pub struct EffectLoader;

impl EffectLoader {
    /// Load effect definitions, resolving tag names against `tags`.
    pub fn load(path: &Path, tags: &TagDatabase) -> LoadResult<Vec<EffectDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content, tags)
    }

    pub fn parse(content: &str, tags: &TagDatabase) -> LoadResult<Vec<EffectDefinition>> {
        let catalog: EffectCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON: {}", e))?;
        catalog
            .effects
            .iter()
            .map(|spec| spec.compile(tags))
            .collect()
    }
}
