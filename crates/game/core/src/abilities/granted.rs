use super::AbilityId;
use crate::state::AbilityHandle;

/// An ability an entity owns.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrantedAbility {
    pub handle: AbilityHandle,
    pub ability_id: AbilityId,
    pub cooldown_remaining: f32,
    /// Input slot bound to this ability.
    pub slot: Option<u8>,
}

/// Granted abilities of one entity, in grant order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrantedAbilities {
    records: Vec<GrantedAbility>,
}

impl GrantedAbilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrantedAbility> {
        self.records.iter()
    }

    pub fn get(&self, handle: AbilityHandle) -> Option<&GrantedAbility> {
        self.records.iter().find(|a| a.handle == handle)
    }

    pub fn get_mut(&mut self, handle: AbilityHandle) -> Option<&mut GrantedAbility> {
        self.records.iter_mut().find(|a| a.handle == handle)
    }

    /// First grant of `ability_id`.
    pub fn find(&self, ability_id: AbilityId) -> Option<&GrantedAbility> {
        self.records.iter().find(|a| a.ability_id == ability_id)
    }

    /// The ability bound to `slot`.
    pub fn in_slot(&self, slot: u8) -> Option<&GrantedAbility> {
        self.records.iter().find(|a| a.slot == Some(slot))
    }

    /// Appends a record, taking `slot` over from any earlier binding.
    pub(crate) fn grant(&mut self, ability: GrantedAbility) {
        if let Some(slot) = ability.slot {
            for record in self.records.iter_mut().filter(|a| a.slot == Some(slot)) {
                record.slot = None;
            }
        }
        self.records.push(ability);
    }

    pub(crate) fn records_mut(&mut self) -> &mut [GrantedAbility] {
        &mut self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_grant_takes_over_slot() {
        let mut abilities = GrantedAbilities::new();
        abilities.grant(GrantedAbility {
            handle: AbilityHandle(1),
            ability_id: AbilityId(10),
            cooldown_remaining: 0.0,
            slot: Some(0),
        });
        abilities.grant(GrantedAbility {
            handle: AbilityHandle(2),
            ability_id: AbilityId(11),
            cooldown_remaining: 0.0,
            slot: Some(0),
        });

        assert_eq!(abilities.in_slot(0).unwrap().handle, AbilityHandle(2));
        assert_eq!(abilities.get(AbilityHandle(1)).unwrap().slot, None);
    }
}
