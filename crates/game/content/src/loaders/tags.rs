//! Tag hierarchy loader.

use std::collections::BTreeMap;
use std::path::Path;

use gameplay_core::{TagDatabase, TagDatabaseBuilder, TagId, TagNode};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One authored tag. `parent` names another tag in the same file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Tag catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagCatalog {
    #[serde(default)]
    pub tags: Vec<TagSpec>,
}

/// Loader for tag hierarchies from RON files.
pub struct TagLoader;

impl TagLoader {
    /// Load and compile a tag hierarchy from a RON file.
    pub fn load(path: &Path) -> LoadResult<TagDatabase> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Compile a tag hierarchy from RON text.
    pub fn parse(content: &str) -> LoadResult<TagDatabase> {
        let catalog: TagCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tag catalog RON: {}", e))?;
        Self::compile(catalog.tags)
    }

    /// Resolves parent names and assigns bits.
    pub fn compile(specs: Vec<TagSpec>) -> LoadResult<TagDatabase> {
        let ids: BTreeMap<&str, u32> = specs.iter().map(|s| (s.name.as_str(), s.id)).collect();

        let nodes = specs
            .iter()
            .map(|spec| {
                let parent = match spec.parent.as_deref() {
                    None => None,
                    Some(name) => Some(TagId(*ids.get(name).ok_or_else(|| {
                        anyhow::anyhow!("tag {:?} names unknown parent {:?}", spec.name, name)
                    })?)),
                };
                Ok(TagNode {
                    id: TagId(spec.id),
                    name: spec.name.clone(),
                    parent,
                })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        let database = TagDatabaseBuilder::new().tags(nodes).build()?;
        tracing::debug!("compiled {} tags", database.len());
        Ok(database)
    }
}
