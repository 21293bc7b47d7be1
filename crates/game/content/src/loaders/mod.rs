//! Content loaders for reading gameplay data from files.
//!
//! Every loader parses one file into authoring specs and then compiles the
//! specs into `gameplay-core` definitions, resolving tag names on the way.

pub mod abilities;
pub mod config;
pub mod effects;
pub mod factory;
pub mod tags;

pub use abilities::{AbilityLoader, AbilitySpec};
pub use config::{ConfigLoader, SimulationConfig};
pub use effects::{EffectLoader, EffectSpec};
pub use factory::ContentFactory;
pub use tags::{TagLoader, TagSpec};

use std::path::Path;

use gameplay_core::{TagDatabase, TagId};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Resolves an optional tag name; `None` maps to [`TagId::NONE`].
pub(crate) fn resolve_tag(tags: &TagDatabase, name: Option<&str>, owner: &str) -> LoadResult<TagId> {
    let Some(name) = name else {
        return Ok(TagId::NONE);
    };
    tags.find_by_name(name)
        .map(|tag| tag.id)
        .ok_or_else(|| anyhow::anyhow!("{} references unknown tag {:?}", owner, name))
}
