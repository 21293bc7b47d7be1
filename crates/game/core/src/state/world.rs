use std::collections::BTreeMap;

use super::{EntityId, EntitySpec, EntityState, HandleSequence, Projectile};
use crate::event::{GameplayEvent, TagChange};
use crate::mailbox::Request;

/// The whole simulated population plus the state shared across entities.
///
/// Entities are kept in ascending id order, which is the order every serial
/// step (routing, handle sealing, event collection) walks them in.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    pub(crate) tick: u64,
    next_entity: u32,
    pub(crate) handles: HandleSequence,
    pub(crate) entities: BTreeMap<EntityId, EntityState>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) events: Vec<GameplayEvent>,
    pub(crate) tag_changes: Vec<TagChange>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Adds an entity. Its initial grants are processed by the next step.
    pub fn spawn(&mut self, spec: EntitySpec) -> EntityId {
        self.next_entity += 1;
        let id = EntityId(self.next_entity);
        let mut entity = EntityState::new(id, spec.attributes);
        entity.mailbox.grant_ability = spec.grants;
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity; requests still addressed to it are dropped.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityState> {
        self.entities.remove(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&EntityState> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntityState> {
        self.entities.get_mut(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityState> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Writes `request` into the entity's mailbox. Returns false when the
    /// entity does not exist.
    pub fn submit(&mut self, id: EntityId, request: Request) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.mailbox.push(request);
                true
            }
            None => false,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Events dispatched so far and not yet drained.
    pub fn events(&self) -> &[GameplayEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameplayEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn tag_changes(&self) -> &[TagChange] {
        &self.tag_changes
    }

    pub fn drain_tag_changes(&mut self) -> Vec<TagChange> {
        std::mem::take(&mut self.tag_changes)
    }

    /// Next value the handle sequence will hand out.
    pub fn next_handle(&self) -> u64 {
        self.handles.peek()
    }

    /// Replaces every pending effect / ability handle with a fresh sequence
    /// value, walking entities in id order and records in creation order.
    pub(crate) fn seal_handles(&mut self) -> usize {
        let mut sealed = 0;
        for entity in self.entities.values_mut() {
            for ability in entity.abilities.records_mut() {
                if ability.handle.is_pending() {
                    ability.handle = self.handles.next_value().into();
                    sealed += 1;
                }
            }
            for effect in entity.effects.instances_mut() {
                if effect.handle.is_pending() {
                    effect.handle = self.handles.next_value().into();
                    sealed += 1;
                }
            }
        }
        sealed
    }

    /// SHA-256 over the bincode encoding of the whole world.
    ///
    /// Two runs fed the same requests with the same step sizes produce the
    /// same root.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        if let Ok(bytes) = bincode::serialize(self) {
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Attribute, AttributeSet};
    use crate::state::{AbilityHandle, EffectHandle};
    use crate::abilities::{AbilityId, GrantedAbility};
    use crate::effects::{ActiveEffect, EffectId};

    #[test]
    fn spawn_assigns_ascending_ids_and_queues_grants() {
        let mut world = World::new();
        let a = world.spawn(EntitySpec::new(AttributeSet::new().with(Attribute::Health, 10.0)));
        let b = world.spawn(EntitySpec::default().grant(AbilityId(3), Some(0)));

        assert_eq!((a, b), (EntityId(1), EntityId(2)));
        assert_eq!(world.entity(a).unwrap().attributes.get(Attribute::Health), 10.0);
        assert_eq!(world.entity(b).unwrap().mailbox.grant_ability.len(), 1);

        world.despawn(a);
        assert!(!world.submit(a, Request::RemoveEffect(EffectHandle(1))));
        assert!(world.submit(b, Request::RemoveEffect(EffectHandle(1))));
    }

    #[test]
    fn sealing_follows_entity_then_creation_order() {
        let mut world = World::new();
        let a = world.spawn(EntitySpec::default());
        let b = world.spawn(EntitySpec::default());

        let pending_effect = ActiveEffect {
            handle: EffectHandle::PENDING,
            effect_id: EffectId(1),
            level: 1,
            source: a,
            remaining_time: 1.0,
            time_to_next_tick: 0.0,
            stack_count: 1,
        };
        world.entity_mut(b).unwrap().effects.push(pending_effect);
        world.entity_mut(a).unwrap().abilities.grant(GrantedAbility {
            handle: AbilityHandle::PENDING,
            ability_id: AbilityId(1),
            cooldown_remaining: 0.0,
            slot: None,
        });
        world.entity_mut(a).unwrap().effects.push(pending_effect);

        assert_eq!(world.seal_handles(), 3);
        let a = world.entity(a).unwrap();
        assert_eq!(a.abilities.iter().next().unwrap().handle, AbilityHandle(1));
        assert_eq!(a.effects.as_slice()[0].handle, EffectHandle(2));
        assert_eq!(world.entity(b).unwrap().effects.as_slice()[0].handle, EffectHandle(3));
        assert_eq!(world.next_handle(), 4);
    }
}
