//! Per-entity request queues.
//!
//! A mailbox is only ever written by its owner's own passes or by the
//! routing step between passes, and each queue is consumed and cleared by
//! exactly one pass per tick.

use crate::abilities::AbilityId;
use crate::attributes::AttributeModifier;
use crate::effects::EffectId;
use crate::event::GameplayEvent;
use crate::state::{AbilityHandle, EffectHandle, EntityId};
use crate::tags::{TagId, TagRequest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrantAbility {
    pub ability_id: AbilityId,
    pub slot: Option<u8>,
}

/// Player or AI input: the ability bound to `slot` should fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotPressed {
    pub slot: u8,
    pub target: Option<EntityId>,
}

/// Targeting payload attached by the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetData {
    pub entity: Option<EntityId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TryActivateAbility {
    pub handle: AbilityHandle,
    pub target: Option<EntityId>,
    pub target_data: Option<TargetData>,
}

impl TryActivateAbility {
    pub fn new(handle: AbilityHandle) -> Self {
        Self {
            handle,
            target: None,
            target_data: None,
        }
    }

    #[must_use]
    pub fn at(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Unresolved effect application, looked up by id in the resolve pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyEffectById {
    pub effect_id: EffectId,
    pub source: EntityId,
    pub level: u32,
}

/// Effect application whose definition is known to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyEffect {
    pub effect_id: EffectId,
    pub source: EntityId,
    pub level: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyAttributeModifier {
    pub source: EntityId,
    pub modifier: AttributeModifier,
}

/// Any request that can be delivered to an entity's mailbox.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Request {
    GrantAbility(GrantAbility),
    SlotPressed(SlotPressed),
    TryActivate(TryActivateAbility),
    CancelAbility(AbilityHandle),
    ApplyEffectById(ApplyEffectById),
    ApplyEffect(ApplyEffect),
    RemoveEffect(EffectHandle),
    RemoveEffectsWithTag(TagId),
    AddTag(TagRequest),
    RemoveTag(TagRequest),
    AttributeModifier(ApplyAttributeModifier),
    Event(GameplayEvent),
}

/// All request queues of one entity.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox {
    pub grant_ability: Vec<GrantAbility>,
    pub slot_pressed: Vec<SlotPressed>,
    pub try_activate: Vec<TryActivateAbility>,
    pub cancel_ability: Vec<AbilityHandle>,
    pub apply_effect_by_id: Vec<ApplyEffectById>,
    pub apply_effect: Vec<ApplyEffect>,
    pub remove_effect: Vec<EffectHandle>,
    pub remove_effects_with_tag: Vec<TagId>,
    pub add_tag: Vec<TagRequest>,
    pub remove_tag: Vec<TagRequest>,
    pub attribute_modifiers: Vec<ApplyAttributeModifier>,
    pub events: Vec<GameplayEvent>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `request` to the queue for its kind.
    pub fn push(&mut self, request: Request) {
        match request {
            Request::GrantAbility(r) => self.grant_ability.push(r),
            Request::SlotPressed(r) => self.slot_pressed.push(r),
            Request::TryActivate(r) => self.try_activate.push(r),
            Request::CancelAbility(h) => self.cancel_ability.push(h),
            Request::ApplyEffectById(r) => self.apply_effect_by_id.push(r),
            Request::ApplyEffect(r) => self.apply_effect.push(r),
            Request::RemoveEffect(h) => self.remove_effect.push(h),
            Request::RemoveEffectsWithTag(t) => self.remove_effects_with_tag.push(t),
            Request::AddTag(r) => self.add_tag.push(r),
            Request::RemoveTag(r) => self.remove_tag.push(r),
            Request::AttributeModifier(r) => self.attribute_modifiers.push(r),
            Request::Event(e) => self.events.push(e),
        }
    }

    /// Total number of queued requests across every queue.
    pub fn len(&self) -> usize {
        self.grant_ability.len()
            + self.slot_pressed.len()
            + self.try_activate.len()
            + self.cancel_ability.len()
            + self.apply_effect_by_id.len()
            + self.apply_effect.len()
            + self.remove_effect.len()
            + self.remove_effects_with_tag.len()
            + self.add_tag.len()
            + self.remove_tag.len()
            + self.attribute_modifiers.len()
            + self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
