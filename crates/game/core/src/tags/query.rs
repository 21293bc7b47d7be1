use super::{TagDatabase, TagId, TagMask};

/// Stateless predicate over a tag mask.
///
/// A mask matches when it holds none of `blocked_mask`, all of
/// `required_mask`, and (if `any_required_mask` is non-empty) at least one
/// bit of `any_required_mask`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagQuery {
    pub required_mask: TagMask,
    pub blocked_mask: TagMask,
    pub any_required_mask: TagMask,
}

impl TagQuery {
    pub fn new(required_mask: TagMask, blocked_mask: TagMask, any_required_mask: TagMask) -> Self {
        Self {
            required_mask,
            blocked_mask,
            any_required_mask,
        }
    }

    /// Compiles required/blocked tag id lists into own-bit masks.
    pub fn from_tags(database: &TagDatabase, required: &[TagId], blocked: &[TagId]) -> Self {
        Self {
            required_mask: database.mask_of(required),
            blocked_mask: database.mask_of(blocked),
            any_required_mask: TagMask::EMPTY,
        }
    }

    #[must_use]
    pub fn require(mut self, mask: TagMask) -> Self {
        self.required_mask |= mask;
        self
    }

    #[must_use]
    pub fn block(mut self, mask: TagMask) -> Self {
        self.blocked_mask |= mask;
        self
    }

    #[must_use]
    pub fn require_any(mut self, mask: TagMask) -> Self {
        self.any_required_mask |= mask;
        self
    }

    /// True when the query accepts every mask.
    pub fn is_empty(&self) -> bool {
        self.required_mask.is_empty()
            && self.blocked_mask.is_empty()
            && self.any_required_mask.is_empty()
    }

    pub fn matches(&self, container_mask: &TagMask) -> bool {
        if container_mask.intersects(&self.blocked_mask) {
            return false;
        }
        if !container_mask.contains_all(&self.required_mask) {
            return false;
        }
        self.any_required_mask.is_empty() || container_mask.intersects(&self.any_required_mask)
    }
}
