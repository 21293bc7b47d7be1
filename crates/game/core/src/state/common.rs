use std::fmt;

/// Unique identifier for any entity tracked in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Placeholder meaning "no entity" in event payloads.
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::NONE.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of an active effect instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectHandle(pub u64);

/// Handle of a granted ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityHandle(pub u64);

macro_rules! impl_handle {
    ($handle:ty, $prefix:literal) => {
        impl $handle {
            /// Not yet sealed: created during the current pass.
            pub const PENDING: Self = Self(0);

            #[inline]
            pub const fn is_pending(self) -> bool {
                self.0 == 0
            }
        }

        impl From<u64> for $handle {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $handle {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

impl_handle!(EffectHandle, "effect#");
impl_handle!(AbilityHandle, "ability#");

/// World-scoped monotonically increasing handle source.
///
/// Both effect and ability handles draw from the same sequence, start at 1
/// and are never reused for the lifetime of the world.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandleSequence {
    next: u64,
}

impl HandleSequence {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next value and advances.
    pub fn next_value(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }

    /// Value the next call will return.
    pub const fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for HandleSequence {
    fn default() -> Self {
        Self::new()
    }
}
