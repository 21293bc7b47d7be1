use super::{ChangeFlags, EntityId};
use crate::abilities::{AbilityId, GrantedAbilities};
use crate::attributes::AttributeSet;
use crate::effects::ActiveEffects;
use crate::mailbox::{GrantAbility, Mailbox};
use crate::tags::TagContainer;

/// Everything the simulation owns for one entity.
///
/// Each pass touches exactly one `EntityState` at a time; other entities are
/// reached only through requests routed into their [`Mailbox`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    pub id: EntityId,
    pub attributes: AttributeSet,
    pub tags: TagContainer,
    pub effects: ActiveEffects,
    pub abilities: GrantedAbilities,
    pub mailbox: Mailbox,
    pub changes: ChangeFlags,
}

impl EntityState {
    pub fn new(id: EntityId, attributes: AttributeSet) -> Self {
        Self {
            id,
            attributes,
            ..Self::default()
        }
    }
}

/// Initial data for [`World::spawn`](super::World::spawn).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: AttributeSet,
    /// Abilities queued for the first grant pass.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants: Vec<GrantAbility>,
}

impl EntitySpec {
    pub fn new(attributes: AttributeSet) -> Self {
        Self {
            attributes,
            grants: Vec::new(),
        }
    }

    #[must_use]
    pub fn grant(mut self, ability_id: AbilityId, slot: Option<u8>) -> Self {
        self.grants.push(GrantAbility { ability_id, slot });
        self
    }
}
