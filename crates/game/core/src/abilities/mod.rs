//! Ability definitions, granted ability records, and the
//! input → grant → gate → execute pipeline.

mod definition;
mod granted;
mod systems;

pub use definition::{AbilityDefinition, AbilityId, ExecutionType, TagRequirements};
pub use granted::{GrantedAbilities, GrantedAbility};

pub(crate) use systems::{execute_abilities, gate_abilities, grant_abilities, translate_input};
