//! The compiled ability / effect database and its validating builder.

use std::collections::BTreeMap;

use crate::abilities::{AbilityDefinition, AbilityId, ExecutionType};
use crate::effects::{EffectDefinition, EffectId, StackingPolicy};
use crate::error::{ErrorSeverity, GameplayError};
use crate::tags::{TagDatabase, TagId, TagQuery};

/// Problems found while assembling a [`GameplayDatabase`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DatabaseError {
    #[error("effect id 0 is reserved")]
    ReservedEffectId,

    #[error("ability id 0 is reserved")]
    ReservedAbilityId,

    #[error("{id} is defined more than once")]
    DuplicateEffect { id: EffectId },

    #[error("{id} is defined more than once")]
    DuplicateAbility { id: AbilityId },

    #[error("{owner} references unknown {tag}")]
    UnknownTag { owner: String, tag: TagId },

    #[error("{ability} references unknown {effect}")]
    UnknownEffect { ability: AbilityId, effect: EffectId },

    #[error("periodic {id} needs a positive period, got {period}")]
    InvalidPeriod { id: EffectId, period: f32 },

    #[error("stacking {id} needs max_stacks >= 1")]
    InvalidMaxStacks { id: EffectId },

    #[error("cleansing {id} has no cleanse tag")]
    MissingCleanseTag { id: AbilityId },
}

impl GameplayError for DatabaseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ReservedEffectId => "DB_RESERVED_EFFECT_ID",
            Self::ReservedAbilityId => "DB_RESERVED_ABILITY_ID",
            Self::DuplicateEffect { .. } => "DB_DUPLICATE_EFFECT",
            Self::DuplicateAbility { .. } => "DB_DUPLICATE_ABILITY",
            Self::UnknownTag { .. } => "DB_UNKNOWN_TAG",
            Self::UnknownEffect { .. } => "DB_UNKNOWN_EFFECT",
            Self::InvalidPeriod { .. } => "DB_INVALID_PERIOD",
            Self::InvalidMaxStacks { .. } => "DB_INVALID_MAX_STACKS",
            Self::MissingCleanseTag { .. } => "DB_MISSING_CLEANSE_TAG",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct CompiledAbility {
    definition: AbilityDefinition,
    requirements: TagQuery,
}

/// Read-only tag, effect and ability tables consulted by every pass.
///
/// Only [`GameplayDatabaseBuilder::build`] creates one, so every reference
/// inside (tag ids, effect ids) is known to resolve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameplayDatabase {
    tags: TagDatabase,
    effects: BTreeMap<EffectId, EffectDefinition>,
    abilities: BTreeMap<AbilityId, CompiledAbility>,
}

impl GameplayDatabase {
    pub fn builder(tags: TagDatabase) -> GameplayDatabaseBuilder {
        GameplayDatabaseBuilder::new(tags)
    }

    pub fn tags(&self) -> &TagDatabase {
        &self.tags
    }

    pub fn effect(&self, id: EffectId) -> Option<&EffectDefinition> {
        self.effects.get(&id)
    }

    pub fn ability(&self, id: AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.get(&id).map(|a| &a.definition)
    }

    /// Tag requirements of `id` compiled against the tag database.
    pub fn ability_requirements(&self, id: AbilityId) -> Option<&TagQuery> {
        self.abilities.get(&id).map(|a| &a.requirements)
    }

    pub fn effects(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.effects.values()
    }

    pub fn abilities(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.values().map(|a| &a.definition)
    }
}

/// Collects definitions and validates them against the tag database.
#[derive(Clone, Debug)]
pub struct GameplayDatabaseBuilder {
    tags: TagDatabase,
    effects: Vec<EffectDefinition>,
    abilities: Vec<AbilityDefinition>,
}

impl GameplayDatabaseBuilder {
    pub fn new(tags: TagDatabase) -> Self {
        Self {
            tags,
            effects: Vec::new(),
            abilities: Vec::new(),
        }
    }

    pub fn effect(mut self, definition: EffectDefinition) -> Self {
        self.effects.push(definition);
        self
    }

    pub fn effects(mut self, definitions: impl IntoIterator<Item = EffectDefinition>) -> Self {
        self.effects.extend(definitions);
        self
    }

    pub fn ability(mut self, definition: AbilityDefinition) -> Self {
        self.abilities.push(definition);
        self
    }

    pub fn abilities(mut self, definitions: impl IntoIterator<Item = AbilityDefinition>) -> Self {
        self.abilities.extend(definitions);
        self
    }

    pub fn build(self) -> Result<GameplayDatabase, DatabaseError> {
        let mut effects = BTreeMap::new();
        for effect in self.effects {
            validate_effect(&self.tags, &effect)?;
            let id = effect.id;
            if effects.insert(id, effect).is_some() {
                return Err(DatabaseError::DuplicateEffect { id });
            }
        }

        let mut abilities = BTreeMap::new();
        for ability in self.abilities {
            validate_ability(&self.tags, &effects, &ability)?;
            let id = ability.id;
            let compiled = CompiledAbility {
                requirements: ability.tag_requirements.compile(&self.tags),
                definition: ability,
            };
            if abilities.insert(id, compiled).is_some() {
                return Err(DatabaseError::DuplicateAbility { id });
            }
        }

        Ok(GameplayDatabase {
            tags: self.tags,
            effects,
            abilities,
        })
    }
}

fn check_tag(tags: &TagDatabase, owner: impl Fn() -> String, tag: TagId) -> Result<(), DatabaseError> {
    if tag.is_valid() && !tags.contains(tag) {
        return Err(DatabaseError::UnknownTag {
            owner: owner(),
            tag,
        });
    }
    Ok(())
}

fn validate_effect(tags: &TagDatabase, effect: &EffectDefinition) -> Result<(), DatabaseError> {
    if !effect.id.is_valid() {
        return Err(DatabaseError::ReservedEffectId);
    }
    let owner = || effect.id.to_string();
    check_tag(tags, owner, effect.granted_tag)?;
    check_tag(tags, owner, effect.blocked_by_tag)?;

    if effect.is_periodic && effect.period <= 0.0 {
        return Err(DatabaseError::InvalidPeriod {
            id: effect.id,
            period: effect.period,
        });
    }
    if effect.stacking_policy == StackingPolicy::StackAdditive && effect.max_stacks == 0 {
        return Err(DatabaseError::InvalidMaxStacks { id: effect.id });
    }
    Ok(())
}

fn validate_ability(
    tags: &TagDatabase,
    effects: &BTreeMap<EffectId, EffectDefinition>,
    ability: &AbilityDefinition,
) -> Result<(), DatabaseError> {
    if !ability.id.is_valid() {
        return Err(DatabaseError::ReservedAbilityId);
    }
    let owner = || ability.id.to_string();
    for tag in ability
        .tag_requirements
        .ids()
        .chain([ability.cleanse_tag, ability.cooldown_tag])
    {
        check_tag(tags, owner, tag)?;
    }

    for effect in ability
        .effects()
        .chain(Some(ability.cooldown_effect_id).filter(|id| id.is_valid()))
    {
        if !effects.contains_key(&effect) {
            return Err(DatabaseError::UnknownEffect {
                ability: ability.id,
                effect,
            });
        }
    }

    if ability.execution_type == ExecutionType::CleanseByTag && !ability.cleanse_tag.is_valid() {
        return Err(DatabaseError::MissingCleanseTag { id: ability.id });
    }
    Ok(())
}
