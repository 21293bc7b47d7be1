//! Deterministic gameplay-ability core.
//!
//! `gameplay-core` holds the tag hierarchy engine and the effect / ability
//! runtime. It performs no I/O: authored data arrives as a compiled
//! [`GameplayDatabase`], input arrives as [`Request`]s written into entity
//! mailboxes, and all state mutation happens inside
//! [`GameplayEngine::step`], which runs a fixed sequence of passes.
//!
//! Outputs are the [`GameplayEvent`] stream, [`TagChange`] notifications and
//! read-only views of each [`EntityState`].
#[macro_use]
mod macros;

pub mod abilities;
pub mod attributes;
pub mod bits;
pub mod config;
pub mod database;
pub mod effects;
pub mod engine;
pub mod error;
pub mod event;
pub mod mailbox;
pub mod state;
pub mod tags;

pub use abilities::{
    AbilityDefinition, AbilityId, ExecutionType, GrantedAbilities, GrantedAbility,
    TagRequirements,
};
pub use attributes::{
    Attribute, AttributeAggregator, AttributeModifier, AttributeSet, AttributeValue, DamageType,
    DefaultAggregator, ModifierOp,
};
pub use bits::BitVector;
pub use config::{GameplayConfig, ManaPolicy};
pub use database::{DatabaseError, GameplayDatabase, GameplayDatabaseBuilder};
pub use effects::{
    ActiveEffect, ActiveEffects, EffectDefinition, EffectId, EffectLifecycle, StackingPolicy,
};
pub use engine::{GameplayEngine, Outbox, Pass, TickReport};
pub use error::{ErrorSeverity, GameplayError};
pub use event::{GameplayEvent, GameplayEventKind, TagChange};
pub use mailbox::{
    ApplyAttributeModifier, ApplyEffect, ApplyEffectById, GrantAbility, Mailbox, Request,
    SlotPressed, TargetData, TryActivateAbility,
};
pub use state::{
    AbilityHandle, ChangeFlags, EffectHandle, EntityId, EntitySpec, EntityState, HandleSequence,
    Projectile, World,
};
pub use tags::{
    TagBuildError, TagChangeKind, TagContainer, TagDatabase, TagDatabaseBuilder, TagId, TagMask,
    TagNode, TagQuery, TagRequest,
};
