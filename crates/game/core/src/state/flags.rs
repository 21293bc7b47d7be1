use bitflags::bitflags;

bitflags! {
    /// Which components of an [`EntityState`](super::EntityState) changed
    /// during the current tick.
    ///
    /// Cleared at the start of every step; presentation layers use it to
    /// mirror only what moved.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ChangeFlags: u8 {
        const TAGS       = 1 << 0;
        const EFFECTS    = 1 << 1;
        const ABILITIES  = 1 << 2;
        const ATTRIBUTES = 1 << 3;
    }
}
