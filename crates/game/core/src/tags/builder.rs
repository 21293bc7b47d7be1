//! Offline compiler from a parent-linked tag forest to bit assignments.

use std::collections::{BTreeMap, BTreeSet};

use super::{TagDatabase, TagDefinition, TagId, TagMask, TagNode};
use crate::error::{ErrorSeverity, GameplayError};

/// Problems found while compiling a tag hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TagBuildError {
    #[error("tag id 0 is reserved for \"no tag\" (name {name:?})")]
    ReservedId { name: String },

    #[error("tag {id} is listed more than once")]
    DuplicateNode { id: TagId },

    #[error("tag id {id} is used by two different tags")]
    DuplicateId { id: TagId },

    #[error("tag name {name:?} is used by two different tags")]
    DuplicateName { name: String },

    #[error("tag {id} names unknown parent {parent}")]
    UnknownParent { id: TagId, parent: TagId },

    #[error("tag {id} is its own ancestor")]
    Cycle { id: TagId },

    #[error("{count} tags do not fit in a {bit_width}-bit mask")]
    CapacityExceeded { count: usize, bit_width: usize },

    #[error("bit width {requested} exceeds the supported maximum of {max}")]
    UnsupportedBitWidth { requested: usize, max: usize },
}

impl GameplayError for TagBuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ReservedId { .. } => "TAG_RESERVED_ID",
            Self::DuplicateNode { .. } => "TAG_DUPLICATE_NODE",
            Self::DuplicateId { .. } => "TAG_DUPLICATE_ID",
            Self::DuplicateName { .. } => "TAG_DUPLICATE_NAME",
            Self::UnknownParent { .. } => "TAG_UNKNOWN_PARENT",
            Self::Cycle { .. } => "TAG_CYCLE",
            Self::CapacityExceeded { .. } => "TAG_CAPACITY_EXCEEDED",
            Self::UnsupportedBitWidth { .. } => "TAG_UNSUPPORTED_BIT_WIDTH",
        }
    }
}

/// Builds a [`TagDatabase`] from authored [`TagNode`]s.
///
/// Bits are handed out densely from 0 in first-visit order: nodes are walked
/// in input order and each node's unassigned ancestors are assigned before
/// the node itself, so a closure mask is always computed from an already
/// finished parent.
///
/// ```
/// use gameplay_core::tags::{TagDatabaseBuilder, TagId, TagNode};
///
/// let db = TagDatabaseBuilder::new()
///     .tag(TagNode::child(2, "Status.Burning", 1))
///     .tag(TagNode::root(1, "Status"))
///     .build()
///     .unwrap();
///
/// assert_eq!(db.index_of(TagId(1)), Some(0));
/// assert_eq!(db.index_of(TagId(2)), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct TagDatabaseBuilder {
    nodes: Vec<TagNode>,
    bit_width: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl TagDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            bit_width: TagMask::BITS,
        }
    }

    /// Limits the number of assignable bits (at most [`TagMask::BITS`]).
    pub fn with_bit_width(mut self, bit_width: usize) -> Self {
        self.bit_width = bit_width;
        self
    }

    pub fn tag(mut self, node: TagNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn tags(mut self, nodes: impl IntoIterator<Item = TagNode>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn build(self) -> Result<TagDatabase, TagBuildError> {
        if self.bit_width > TagMask::BITS {
            return Err(TagBuildError::UnsupportedBitWidth {
                requested: self.bit_width,
                max: TagMask::BITS,
            });
        }
        if self.nodes.is_empty() {
            return Ok(TagDatabase::empty());
        }

        let positions = self.validate()?;
        let definitions = self.assign(&positions)?;
        Ok(TagDatabase::from_definitions(definitions))
    }

    /// Checks ids, names, parents and capacity; returns id → input position.
    fn validate(&self) -> Result<BTreeMap<TagId, usize>, TagBuildError> {
        let mut positions = BTreeMap::new();
        let mut names = BTreeSet::new();

        for (position, node) in self.nodes.iter().enumerate() {
            if !node.id.is_valid() {
                return Err(TagBuildError::ReservedId {
                    name: node.name.clone(),
                });
            }
            if let Some(&previous) = positions.get(&node.id) {
                return Err(if self.nodes[previous] == *node {
                    TagBuildError::DuplicateNode { id: node.id }
                } else {
                    TagBuildError::DuplicateId { id: node.id }
                });
            }
            if !node.name.is_empty() && !names.insert(node.name.as_str()) {
                return Err(TagBuildError::DuplicateName {
                    name: node.name.clone(),
                });
            }
            positions.insert(node.id, position);
        }

        for node in &self.nodes {
            if let Some(parent) = node.parent_id() {
                if !positions.contains_key(&parent) {
                    return Err(TagBuildError::UnknownParent {
                        id: node.id,
                        parent,
                    });
                }
            }
        }

        if self.nodes.len() > self.bit_width {
            return Err(TagBuildError::CapacityExceeded {
                count: self.nodes.len(),
                bit_width: self.bit_width,
            });
        }

        Ok(positions)
    }

    /// Parent-before-child bit assignment with in-progress marking, so a
    /// parent chain that loops back on itself is reported instead of walked
    /// forever.
    fn assign(
        &self,
        positions: &BTreeMap<TagId, usize>,
    ) -> Result<Vec<TagDefinition>, TagBuildError> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut assigned: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut definitions: Vec<TagDefinition> = Vec::with_capacity(self.nodes.len());
        let mut chain = Vec::new();

        for start in 0..self.nodes.len() {
            chain.clear();
            let mut cursor = Some(start);

            while let Some(position) = cursor {
                match marks[position] {
                    Mark::Done => break,
                    Mark::InProgress => {
                        return Err(TagBuildError::Cycle {
                            id: self.nodes[position].id,
                        });
                    }
                    Mark::Unvisited => {
                        marks[position] = Mark::InProgress;
                        chain.push(position);
                        cursor = self.nodes[position]
                            .parent_id()
                            .and_then(|parent| positions.get(&parent).copied());
                    }
                }
            }

            // Topmost unassigned ancestor first.
            for &position in chain.iter().rev() {
                let node = &self.nodes[position];
                let parent_closure = node
                    .parent_id()
                    .and_then(|parent| positions.get(&parent))
                    .and_then(|&parent_position| assigned[parent_position])
                    .map(|index| definitions[index].closure_mask)
                    .unwrap_or_default();

                let bit_index = definitions.len();
                let own_mask = TagMask::single(bit_index);
                definitions.push(TagDefinition {
                    id: node.id,
                    name: node.name.clone(),
                    parent: node.parent_id(),
                    bit_index: bit_index as u16,
                    own_mask,
                    closure_mask: own_mask | parent_closure,
                });
                assigned[position] = Some(bit_index);
                marks[position] = Mark::Done;
            }
        }

        Ok(definitions)
    }
}

impl Default for TagDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> TagDatabase {
        TagDatabaseBuilder::new()
            .tag(TagNode::root(10, "A"))
            .tag(TagNode::child(20, "A.B", 10))
            .tag(TagNode::child(30, "A.B.C", 20))
            .build()
            .unwrap()
    }

    #[test]
    fn closure_masks_nest_along_a_chain() {
        let db = chain();
        let a = db.closure_of(TagId(10)).unwrap();
        let b = db.closure_of(TagId(20)).unwrap();
        let c = db.closure_of(TagId(30)).unwrap();

        assert!(c.contains_all(&b));
        assert!(b.contains_all(&a));
        assert_eq!(a.count_ones(), 1);
        assert_eq!(b.count_ones(), 2);
        assert_eq!(c.count_ones(), 3);
    }

    #[test]
    fn parents_get_lower_bits_even_when_listed_last() {
        let db = TagDatabaseBuilder::new()
            .tag(TagNode::child(3, "Root.Leaf", 2))
            .tag(TagNode::child(2, "Root", 1))
            .tag(TagNode::root(1, "Top"))
            .tag(TagNode::root(4, "Other"))
            .build()
            .unwrap();

        assert_eq!(db.index_of(TagId(1)), Some(0));
        assert_eq!(db.index_of(TagId(2)), Some(1));
        assert_eq!(db.index_of(TagId(3)), Some(2));
        assert_eq!(db.index_of(TagId(4)), Some(3));
    }

    #[test]
    fn shared_ancestors_are_assigned_once() {
        let db = TagDatabaseBuilder::new()
            .tag(TagNode::child(2, "R.X", 1))
            .tag(TagNode::child(3, "R.Y", 1))
            .tag(TagNode::root(1, "R"))
            .build()
            .unwrap();

        assert_eq!(db.len(), 3);
        let root = db.own_mask_of(TagId(1)).unwrap();
        assert!(db.closure_of(TagId(2)).unwrap().contains_all(&root));
        assert!(db.closure_of(TagId(3)).unwrap().contains_all(&root));
        assert!(!db.closure_of(TagId(2)).unwrap().intersects(&db.own_mask_of(TagId(3)).unwrap()));
    }

    #[test]
    fn empty_input_is_a_valid_empty_database() {
        let db = TagDatabaseBuilder::new().build().unwrap();
        assert!(db.is_empty());
        assert!(db.get(TagId(1)).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = TagDatabaseBuilder::new()
            .tag(TagNode::root(1, "A"))
            .tag(TagNode::root(1, "B"))
            .build()
            .unwrap_err();
        assert_eq!(err, TagBuildError::DuplicateId { id: TagId(1) });

        let err = TagDatabaseBuilder::new()
            .tag(TagNode::root(1, "A"))
            .tag(TagNode::root(1, "A"))
            .build()
            .unwrap_err();
        assert_eq!(err, TagBuildError::DuplicateNode { id: TagId(1) });
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let err = TagDatabaseBuilder::new()
            .tag(TagNode::child(2, "A.B", 99))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TagBuildError::UnknownParent {
                id: TagId(2),
                parent: TagId(99)
            }
        );
    }

    #[test]
    fn cycles_are_reported() {
        let err = TagDatabaseBuilder::new()
            .tag(TagNode::child(1, "A", 3))
            .tag(TagNode::child(2, "B", 1))
            .tag(TagNode::child(3, "C", 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, TagBuildError::Cycle { .. }));

        let err = TagDatabaseBuilder::new()
            .tag(TagNode::child(7, "Self", 7))
            .build()
            .unwrap_err();
        assert_eq!(err, TagBuildError::Cycle { id: TagId(7) });
    }

    #[test]
    fn capacity_is_enforced() {
        let err = TagDatabaseBuilder::new()
            .with_bit_width(2)
            .tags((1..=3).map(|i| TagNode::root(i, format!("T{i}"))))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TagBuildError::CapacityExceeded {
                count: 3,
                bit_width: 2
            }
        );
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "TAG_CAPACITY_EXCEEDED");
    }

    #[test]
    fn lookups_by_name_and_id_agree() {
        let db = chain();
        let by_name = db.find_by_name("A.B").unwrap();
        assert_eq!(by_name.id, TagId(20));
        assert_eq!(db.parent_of(TagId(30)), Some(TagId(20)));
        assert_eq!(db.names_in(&db.closure_of(TagId(30)).unwrap()), vec!["A", "A.B", "A.B.C"]);
    }
}
