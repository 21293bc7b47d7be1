use super::EntityId;
use crate::abilities::AbilityDefinition;
use crate::effects::EffectId;

/// In-flight projectile launched by a `SpawnProjectileApplyOnHit` ability.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    /// Assigned from the world's handle sequence when launched.
    pub id: u64,
    pub source: EntityId,
    pub target: EntityId,
    pub remaining_flight_time: f32,
    pub primary_effect_id: EffectId,
    pub secondary_effect_id: EffectId,
    /// Tick the projectile was launched on; it starts flying the tick after.
    pub launched_tick: u64,
}

impl Projectile {
    pub fn new(source: EntityId, target: EntityId, ability: &AbilityDefinition) -> Self {
        Self {
            id: 0,
            source,
            target,
            remaining_flight_time: ability.projectile_flight_time,
            primary_effect_id: ability.primary_effect_id,
            secondary_effect_id: ability.secondary_effect_id,
            launched_tick: 0,
        }
    }

    /// Primary then secondary effect, skipping unset ids.
    pub fn effects(&self) -> impl Iterator<Item = EffectId> {
        [self.primary_effect_id, self.secondary_effect_id]
            .into_iter()
            .filter(|id| id.is_valid())
    }
}
