use super::EffectId;
use crate::state::{EffectHandle, EntityId};

/// One live effect instance on its target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffect {
    pub handle: EffectHandle,
    pub effect_id: EffectId,
    pub level: u32,
    pub source: EntityId,
    /// Seconds left; unused for permanent effects.
    pub remaining_time: f32,
    /// Seconds until the next periodic tick; unused for non-periodic effects.
    pub time_to_next_tick: f32,
    pub stack_count: u32,
}

/// Active effect instances owned by one entity, in creation order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffects {
    instances: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.instances.iter()
    }

    pub fn as_slice(&self) -> &[ActiveEffect] {
        &self.instances
    }

    pub fn get(&self, handle: EffectHandle) -> Option<&ActiveEffect> {
        self.instances.iter().find(|e| e.handle == handle)
    }

    /// First instance of `effect_id`, if any.
    pub fn find(&self, effect_id: EffectId) -> Option<&ActiveEffect> {
        self.instances.iter().find(|e| e.effect_id == effect_id)
    }

    /// Number of instances of `effect_id`.
    pub fn count(&self, effect_id: EffectId) -> usize {
        self.instances
            .iter()
            .filter(|e| e.effect_id == effect_id)
            .count()
    }

    pub(crate) fn find_mut(&mut self, effect_id: EffectId) -> Option<&mut ActiveEffect> {
        self.instances.iter_mut().find(|e| e.effect_id == effect_id)
    }

    pub(crate) fn position(&self, handle: EffectHandle) -> Option<usize> {
        self.instances.iter().position(|e| e.handle == handle)
    }

    pub(crate) fn push(&mut self, effect: ActiveEffect) {
        self.instances.push(effect);
    }

    pub(crate) fn remove(&mut self, index: usize) -> ActiveEffect {
        self.instances.remove(index)
    }

    pub(crate) fn instances_mut(&mut self) -> &mut [ActiveEffect] {
        &mut self.instances
    }
}
