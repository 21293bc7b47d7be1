use super::{TagChangeKind, TagMask, TagRequest};

/// One distinct tag held by an entity, reference counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveTag {
    pub own_mask: TagMask,
    pub closure_mask: TagMask,
    pub stack_count: u32,
}

/// Outcome of a single add or remove against a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagEdit {
    /// A new entry was created.
    Created,
    /// An existing entry gained a reference.
    Stacked,
    /// An entry lost a reference but is still held.
    Unstacked,
    /// The last reference was dropped and the entry deleted.
    Destroyed,
    /// Nothing matched (or the request carried no bits).
    Ignored,
}

impl TagEdit {
    /// Notification direction, if the set of held tags actually changed.
    pub fn change(self) -> Option<TagChangeKind> {
        match self {
            Self::Created => Some(TagChangeKind::Added),
            Self::Destroyed => Some(TagChangeKind::Removed),
            Self::Stacked | Self::Unstacked | Self::Ignored => None,
        }
    }
}

/// Per-entity set of held tags.
///
/// `own_tags_mask` is the OR of every held tag's own bit; `combined_mask` is
/// the OR of their closure masks, i.e. held tags plus all their ancestors.
/// Both are derived data, fully recomputed from the active list after each
/// batch of edits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagContainer {
    own_tags_mask: TagMask,
    combined_mask: TagMask,
    active: Vec<ActiveTag>,
}

impl TagContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn own_tags_mask(&self) -> &TagMask {
        &self.own_tags_mask
    }

    pub fn combined_mask(&self) -> &TagMask {
        &self.combined_mask
    }

    pub fn active_tags(&self) -> &[ActiveTag] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// True when any bit of `closure_mask` is present in the combined mask.
    pub fn has_tag_or_child(&self, closure_mask: &TagMask) -> bool {
        self.combined_mask.intersects(closure_mask)
    }

    /// True when every bit of `own_mask` is held directly.
    pub fn has_exact_tag(&self, own_mask: &TagMask) -> bool {
        self.own_tags_mask.contains_all(own_mask)
    }

    /// True when the tag is held directly or through a held descendant.
    pub fn has_tag(&self, own_mask: &TagMask) -> bool {
        !own_mask.is_empty() && self.combined_mask.contains_all(own_mask)
    }

    /// Reference count of the entry with exactly this own mask.
    pub fn stack_count(&self, own_mask: &TagMask) -> u32 {
        self.active
            .iter()
            .find(|tag| tag.own_mask == *own_mask)
            .map_or(0, |tag| tag.stack_count)
    }

    /// Adds one reference. Does not refresh the derived masks.
    pub fn add(&mut self, request: &TagRequest) -> TagEdit {
        if request.own_mask.is_empty() {
            return TagEdit::Ignored;
        }
        if let Some(tag) = self
            .active
            .iter_mut()
            .find(|tag| tag.own_mask == request.own_mask)
        {
            tag.stack_count += 1;
            return TagEdit::Stacked;
        }
        self.active.push(ActiveTag {
            own_mask: request.own_mask,
            closure_mask: request.closure_mask,
            stack_count: 1,
        });
        TagEdit::Created
    }

    /// Drops one reference. Does not refresh the derived masks.
    pub fn remove(&mut self, request: &TagRequest) -> TagEdit {
        let Some(position) = self
            .active
            .iter()
            .position(|tag| tag.own_mask == request.own_mask)
        else {
            return TagEdit::Ignored;
        };

        let tag = &mut self.active[position];
        tag.stack_count = tag.stack_count.saturating_sub(1);
        if tag.stack_count == 0 {
            self.active.remove(position);
            TagEdit::Destroyed
        } else {
            TagEdit::Unstacked
        }
    }

    /// Rebuilds both derived masks from the active list.
    pub fn recompute(&mut self) {
        let (own, combined) = self.active.iter().fold(
            (TagMask::EMPTY, TagMask::EMPTY),
            |(own, combined), tag| (own | tag.own_mask, combined | tag.closure_mask),
        );
        self.own_tags_mask = own;
        self.combined_mask = combined;
    }

    /// Applies a batch of adds then removes and recomputes the masks.
    ///
    /// `notify` is called once for every entry created or destroyed.
    pub fn apply(
        &mut self,
        adds: &[TagRequest],
        removes: &[TagRequest],
        mut notify: impl FnMut(TagChangeKind, TagMask),
    ) {
        for request in adds {
            if let Some(kind) = self.add(request).change() {
                notify(kind, request.own_mask);
            }
        }
        for request in removes {
            if let Some(kind) = self.remove(request).change() {
                notify(kind, request.own_mask);
            }
        }
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{TagDatabase, TagDatabaseBuilder, TagId, TagNode};

    fn db() -> TagDatabase {
        TagDatabaseBuilder::new()
            .tag(TagNode::root(1, "Status"))
            .tag(TagNode::child(2, "Status.Burning", 1))
            .tag(TagNode::root(3, "Cooldown"))
            .build()
            .unwrap()
    }

    #[test]
    fn stacked_tag_survives_a_single_remove() {
        let db = db();
        let burning = db.request(TagId(2)).unwrap();
        let mut tags = TagContainer::new();

        tags.apply(&[burning, burning], &[], |_, _| {});
        assert_eq!(tags.stack_count(&burning.own_mask), 2);

        tags.apply(&[], &[burning], |_, _| {});
        assert_eq!(tags.stack_count(&burning.own_mask), 1);
        assert!(tags.has_exact_tag(&burning.own_mask));

        tags.apply(&[], &[burning], |_, _| {});
        assert!(tags.is_empty());
        assert!(tags.combined_mask().is_empty());
    }

    #[test]
    fn child_implies_parent_through_combined_mask() {
        let db = db();
        let mut tags = TagContainer::new();
        tags.apply(&[db.request(TagId(2)).unwrap()], &[], |_, _| {});

        let status = db.get(TagId(1)).unwrap();
        assert!(tags.has_tag(&status.own_mask));
        assert!(tags.has_tag_or_child(&status.closure_mask));
        assert!(!tags.has_exact_tag(&status.own_mask));
        assert!(!tags.has_tag(&db.own_mask_of(TagId(3)).unwrap()));
    }

    #[test]
    fn notifications_fire_only_on_create_and_destroy() {
        let db = db();
        let cooldown = db.request(TagId(3)).unwrap();
        let mut seen = Vec::new();
        let mut tags = TagContainer::new();

        tags.apply(&[cooldown, cooldown], &[cooldown], |kind, _| seen.push(kind));
        tags.apply(&[], &[cooldown, cooldown], |kind, _| seen.push(kind));

        assert_eq!(seen, vec![TagChangeKind::Added, TagChangeKind::Removed]);
    }

    #[test]
    fn empty_and_unknown_requests_are_ignored() {
        let mut tags = TagContainer::new();
        assert_eq!(tags.add(&TagRequest::default()), TagEdit::Ignored);
        assert_eq!(
            tags.remove(&TagRequest::new(TagMask::single(9), TagMask::single(9))),
            TagEdit::Ignored
        );
    }
}
