//! Hierarchical gameplay tags backed by bitmasks.
//!
//! Tags form a forest (`Status` → `Status.Burning` → `Status.Burning.Intense`).
//! Every tag owns one bit; its *closure* mask additionally carries the bits
//! of all its ancestors. Containers OR the closure masks of every held tag
//! into a combined mask, so "does this entity hold `Status` or anything
//! under it" is a single intersection test.
//!
//! - [`TagDatabaseBuilder`] assigns bits offline (parents before children)
//! - [`TagDatabase`] answers id → bit/mask lookups at simulation time
//! - [`TagContainer`] tracks reference-counted tags held by one entity
//! - [`TagQuery`] is a stateless required/blocked/any-of predicate

mod builder;
mod container;
mod database;
mod query;

use core::fmt;

pub use builder::{TagBuildError, TagDatabaseBuilder};
pub use container::{ActiveTag, TagContainer, TagEdit};
pub use database::{TagDatabase, TagDefinition, TagNode};
pub use query::TagQuery;

use crate::bits::BitVector;
use crate::config::GameplayConfig;

/// Bitmask over every tag the engine can represent.
pub type TagMask = BitVector<{ GameplayConfig::TAG_MASK_WORDS }>;

/// Authored identifier of a tag. Ids are sparse; `0` means "no tag".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagId(pub u32);

impl TagId {
    /// Sentinel for "no tag" in definitions.
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::NONE.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag:{}", self.0)
    }
}

/// Masks carried by AddTag / RemoveTag requests.
///
/// Requests carry resolved masks rather than ids so the tag pass never needs
/// the database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagRequest {
    pub own_mask: TagMask,
    pub closure_mask: TagMask,
}

impl TagRequest {
    pub fn new(own_mask: TagMask, closure_mask: TagMask) -> Self {
        Self {
            own_mask,
            closure_mask,
        }
    }
}

/// Direction of a tag change notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TagChangeKind {
    Added,
    Removed,
}
