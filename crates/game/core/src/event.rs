//! Outbound notifications for presentation, logging and AI collaborators.

use crate::state::EntityId;
use crate::tags::{TagChangeKind, TagMask};

/// Kind of a [`GameplayEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GameplayEventKind {
    /// `id` is the effect id, `magnitude` the level.
    EffectApplied,
    /// `id` is the effect id, `magnitude` the new stack count.
    EffectStacked,
    /// Removed by handle or by cleanse. `id` is the effect id.
    EffectRemoved,
    /// Duration ran out. `id` is the effect id.
    EffectExpired,
    /// `id` is the ability id.
    AbilityGranted,
    /// `id` is the ability id, `magnitude` the mana spent.
    AbilityActivated,
    /// `id` is the ability id, `magnitude` the flight time.
    ProjectileLaunched,
    /// `id` is the primary effect id.
    ProjectileHit,
    /// `id` is the attribute index, `magnitude` the new value.
    AttributeChanged,
    /// `id` is the damage type, `magnitude` the health lost.
    DamageTaken,
}

/// One entry of the gameplay event stream.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameplayEvent {
    pub kind: GameplayEventKind,
    pub source: EntityId,
    pub target: EntityId,
    pub id: u32,
    pub magnitude: f32,
}

impl GameplayEvent {
    pub fn new(kind: GameplayEventKind, source: EntityId, target: EntityId, id: u32) -> Self {
        Self {
            kind,
            source,
            target,
            id,
            magnitude: 0.0,
        }
    }

    #[must_use]
    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = magnitude;
        self
    }
}

/// A tag entry was created on, or destroyed from, an entity's container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagChange {
    pub entity: EntityId,
    pub tag_mask: TagMask,
    pub kind: TagChangeKind,
}
