//! Authored gameplay content and its loaders.
//!
//! Designers write tag hierarchies, effect tables and ability tables as RON
//! files and the fixed-step parameters as TOML. Tags are referenced by name
//! everywhere; loaders resolve names to ids against the freshly built tag
//! database and hand the result to
//! [`GameplayDatabase::builder`](gameplay_core::GameplayDatabase::builder)
//! for validation.
//!
//! ```text
//! data_dir/
//! ├── simulation.toml
//! ├── tags.ron
//! ├── effects.ron
//! └── abilities.ron
//! ```

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, AbilitySpec, ConfigLoader, ContentFactory, EffectLoader, EffectSpec,
    LoadResult, SimulationConfig, TagLoader, TagSpec,
};
