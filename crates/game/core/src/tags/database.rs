use std::collections::BTreeMap;

use super::{TagId, TagMask, TagRequest};

/// One authored tag: an id, a dotted display name, and an optional parent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagNode {
    pub id: TagId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<TagId>,
}

impl TagNode {
    pub fn root(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: TagId(id),
            name: name.into(),
            parent: None,
        }
    }

    pub fn child(id: u32, name: impl Into<String>, parent: u32) -> Self {
        Self {
            id: TagId(id),
            name: name.into(),
            parent: Some(TagId(parent)),
        }
    }

    /// Parent id with the `NONE` sentinel folded into `None`.
    pub(crate) fn parent_id(&self) -> Option<TagId> {
        self.parent.filter(|p| p.is_valid())
    }
}

/// A compiled tag: its assigned bit plus own and closure masks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagDefinition {
    pub id: TagId,
    pub name: String,
    pub parent: Option<TagId>,
    pub bit_index: u16,
    /// Only this tag's bit.
    pub own_mask: TagMask,
    /// This tag's bit plus every ancestor's bit.
    pub closure_mask: TagMask,
}

impl TagDefinition {
    /// Request that adds or removes this tag on a container.
    pub fn request(&self) -> TagRequest {
        TagRequest::new(self.own_mask, self.closure_mask)
    }
}

/// Immutable id → bit lookup built once by [`TagDatabaseBuilder`](super::TagDatabaseBuilder).
///
/// Definitions are stored in bit order; the id and name tables are sparse
/// indices into that list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagDatabase {
    tags: Vec<TagDefinition>,
    by_id: BTreeMap<TagId, usize>,
    by_name: BTreeMap<String, usize>,
}

impl TagDatabase {
    /// A valid database holding zero tags.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_definitions(tags: Vec<TagDefinition>) -> Self {
        let by_id = tags
            .iter()
            .enumerate()
            .map(|(index, tag)| (tag.id, index))
            .collect();
        let by_name = tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| !tag.name.is_empty())
            .map(|(index, tag)| (tag.name.clone(), index))
            .collect();
        Self {
            tags,
            by_id,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, id: TagId) -> Option<&TagDefinition> {
        self.by_id.get(&id).map(|&index| &self.tags[index])
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Bit index assigned to `id`.
    pub fn index_of(&self, id: TagId) -> Option<usize> {
        self.get(id).map(|tag| tag.bit_index as usize)
    }

    pub fn own_mask_of(&self, id: TagId) -> Option<TagMask> {
        self.get(id).map(|tag| tag.own_mask)
    }

    pub fn closure_of(&self, id: TagId) -> Option<TagMask> {
        self.get(id).map(|tag| tag.closure_mask)
    }

    pub fn parent_of(&self, id: TagId) -> Option<TagId> {
        self.get(id).and_then(|tag| tag.parent)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&TagDefinition> {
        self.by_name.get(name).map(|&index| &self.tags[index])
    }

    /// AddTag/RemoveTag request for `id`, if the tag exists.
    pub fn request(&self, id: TagId) -> Option<TagRequest> {
        self.get(id).map(TagDefinition::request)
    }

    /// Own masks of `ids` OR-ed together. Unknown ids contribute nothing.
    pub fn mask_of<'a>(&self, ids: impl IntoIterator<Item = &'a TagId>) -> TagMask {
        ids.into_iter()
            .filter_map(|id| self.own_mask_of(*id))
            .fold(TagMask::EMPTY, |acc, mask| acc | mask)
    }

    /// Definitions in bit order.
    pub fn iter(&self) -> impl Iterator<Item = &TagDefinition> {
        self.tags.iter()
    }

    /// Names of every tag whose own bit is set in `mask`, in bit order.
    pub fn names_in(&self, mask: &TagMask) -> Vec<&str> {
        mask.iter_ones()
            .filter_map(|bit| self.tags.get(bit))
            .map(|tag| tag.name.as_str())
            .collect()
    }
}
