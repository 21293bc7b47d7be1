//! Gameplay effects: compiled definitions, live instances, and the
//! apply / stack / tick / expire / remove state machine.
//!
//! # Lifecycle
//!
//! ```text
//! apply ─┬─► Instant (one-shot, never tracked)
//!        └─► Active ──► Active            (tick, refresh, stack)
//!                  ├──► Expired           (timer; may revert modifiers)
//!                  ├──► RemovedExplicit   (by handle; never reverts)
//!                  └──► RemovedByTag      (cleanse; never reverts)
//! ```

mod active;
mod definition;
mod systems;

pub use active::{ActiveEffect, ActiveEffects};
pub use definition::{EffectDefinition, EffectId, StackingPolicy};
pub use systems::apply_effect;

pub(crate) use systems::{resolve_effect_requests, run_effect_pass};

/// States an effect instance moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EffectLifecycle {
    /// Applied once and discarded.
    Instant,
    /// Tracked on the target.
    Active,
    /// Duration ran out.
    Expired,
    /// Removed by handle.
    RemovedExplicit,
    /// Removed by a cleanse of its granted tag.
    RemovedByTag,
}
