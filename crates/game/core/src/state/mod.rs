//! Simulation state: entities, their components, projectiles, and the
//! world-scoped handle sequence.
//!
//! Runtime layers read this state freely but mutate it only by submitting
//! requests and stepping a [`GameplayEngine`](crate::engine::GameplayEngine).

mod common;
mod entity;
mod flags;
mod projectile;
mod world;

pub use common::{AbilityHandle, EffectHandle, EntityId, HandleSequence};
pub use entity::{EntitySpec, EntityState};
pub use flags::ChangeFlags;
pub use projectile::Projectile;
pub use world::World;
