use core::fmt;

use arrayvec::ArrayVec;

use crate::config::GameplayConfig;
use crate::effects::EffectId;
use crate::tags::{TagDatabase, TagId, TagQuery};

/// Authored identifier of an ability. `0` means "no ability".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityId(pub u32);

impl AbilityId {
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::NONE.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability:{}", self.0)
    }
}

/// What an activation does once it passes the gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ExecutionType {
    /// Queue the primary and secondary effects on the target.
    #[default]
    ApplyEffectToTarget,
    /// Launch a projectile that applies both effects on arrival.
    SpawnProjectileApplyOnHit,
    /// Strip every effect granting `cleanse_tag` from the target.
    CleanseByTag,
}

/// Tags the activating entity must hold / must not hold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagRequirements {
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: ArrayVec<TagId, { GameplayConfig::MAX_TAG_REQUIREMENTS }>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub blocked: ArrayVec<TagId, { GameplayConfig::MAX_TAG_REQUIREMENTS }>,
}

impl TagRequirements {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.blocked.is_empty()
    }

    /// Compiles the id lists into own-bit masks.
    pub fn compile(&self, tags: &TagDatabase) -> TagQuery {
        TagQuery::from_tags(tags, &self.required, &self.blocked)
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = TagId> + '_ {
        self.required.iter().chain(self.blocked.iter()).copied()
    }
}

/// Compiled, immutable ability definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub execution_type: ExecutionType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_duration: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tag_requirements: TagRequirements,
    #[cfg_attr(feature = "serde", serde(default))]
    pub projectile_flight_time: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub primary_effect_id: EffectId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secondary_effect_id: EffectId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cleanse_tag: TagId,
    /// When set, the cooldown is this effect instead of the numeric timer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_effect_id: EffectId,
    /// Holding this tag blocks activation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_tag: TagId,
}

impl AbilityDefinition {
    pub fn new(id: u32, execution_type: ExecutionType) -> Self {
        Self {
            id: AbilityId(id),
            execution_type,
            cooldown_duration: 0.0,
            mana_cost: 0.0,
            tag_requirements: TagRequirements::default(),
            projectile_flight_time: 0.0,
            primary_effect_id: EffectId::NONE,
            secondary_effect_id: EffectId::NONE,
            cleanse_tag: TagId::NONE,
            cooldown_effect_id: EffectId::NONE,
            cooldown_tag: TagId::NONE,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, mana_cost: f32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown_duration: f32) -> Self {
        self.cooldown_duration = cooldown_duration;
        self
    }

    /// Effect-driven cooldown: apply `effect` on activation and block while
    /// `tag` is held.
    #[must_use]
    pub fn with_cooldown_effect(mut self, effect: EffectId, tag: TagId) -> Self {
        self.cooldown_effect_id = effect;
        self.cooldown_tag = tag;
        self
    }

    #[must_use]
    pub fn with_effects(mut self, primary: EffectId, secondary: EffectId) -> Self {
        self.primary_effect_id = primary;
        self.secondary_effect_id = secondary;
        self
    }

    #[must_use]
    pub fn with_flight_time(mut self, seconds: f32) -> Self {
        self.projectile_flight_time = seconds;
        self
    }

    #[must_use]
    pub fn cleansing(mut self, tag: TagId) -> Self {
        self.cleanse_tag = tag;
        self
    }

    /// Extra ids past `MAX_TAG_REQUIREMENTS` are ignored.
    #[must_use]
    pub fn requiring(mut self, tag: TagId) -> Self {
        let _ = self.tag_requirements.required.try_push(tag);
        self
    }

    /// Extra ids past `MAX_TAG_REQUIREMENTS` are ignored.
    #[must_use]
    pub fn blocked_by(mut self, tag: TagId) -> Self {
        let _ = self.tag_requirements.blocked.try_push(tag);
        self
    }

    /// Primary then secondary effect, skipping unset ids.
    pub fn effects(&self) -> impl Iterator<Item = EffectId> {
        [self.primary_effect_id, self.secondary_effect_id]
            .into_iter()
            .filter(|id| id.is_valid())
    }
}
