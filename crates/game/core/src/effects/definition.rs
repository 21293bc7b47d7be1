use core::fmt;

use arrayvec::ArrayVec;

use crate::attributes::AttributeModifier;
use crate::config::GameplayConfig;
use crate::tags::TagId;

/// Authored identifier of an effect. `0` means "no effect".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u32);

impl EffectId {
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::NONE.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect:{}", self.0)
    }
}

/// What happens when an effect is applied to a target already running it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StackingPolicy {
    /// Every application is an independent instance.
    #[default]
    None,
    /// Reapplying resets the remaining duration of the existing instance.
    RefreshDuration,
    /// Reapplying adds a stack (up to `max_stacks`) and resets the duration.
    StackAdditive,
}

/// Compiled, immutable effect definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub id: EffectId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_permanent: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_periodic: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub period: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub granted_tag: TagId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub revert_on_end: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stacking_policy: StackingPolicy,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u32,
    /// Targets holding this tag are immune.
    #[cfg_attr(feature = "serde", serde(default))]
    pub blocked_by_tag: TagId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: ArrayVec<AttributeModifier, { GameplayConfig::MAX_MODIFIERS }>,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u32 {
    1
}

impl EffectDefinition {
    /// Instant, untagged effect with no modifiers.
    pub fn new(id: u32) -> Self {
        Self {
            id: EffectId(id),
            duration: 0.0,
            is_permanent: false,
            is_periodic: false,
            period: 0.0,
            granted_tag: TagId::NONE,
            revert_on_end: false,
            stacking_policy: StackingPolicy::None,
            max_stacks: 1,
            blocked_by_tag: TagId::NONE,
            modifiers: ArrayVec::new(),
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn permanent(mut self) -> Self {
        self.is_permanent = true;
        self
    }

    #[must_use]
    pub fn periodic(mut self, period: f32) -> Self {
        self.is_periodic = true;
        self.period = period;
        self
    }

    #[must_use]
    pub fn granting(mut self, tag: TagId) -> Self {
        self.granted_tag = tag;
        self
    }

    #[must_use]
    pub fn reverting(mut self) -> Self {
        self.revert_on_end = true;
        self
    }

    #[must_use]
    pub fn stacking(mut self, policy: StackingPolicy, max_stacks: u32) -> Self {
        self.stacking_policy = policy;
        self.max_stacks = max_stacks;
        self
    }

    #[must_use]
    pub fn blocked_by(mut self, tag: TagId) -> Self {
        self.blocked_by_tag = tag;
        self
    }

    /// Appends a modifier; silently ignored once `MAX_MODIFIERS` is reached.
    #[must_use]
    pub fn modifier(mut self, modifier: AttributeModifier) -> Self {
        let _ = self.modifiers.try_push(modifier);
        self
    }

    /// Whether an application leaves a live instance on the target.
    ///
    /// Periodic effects always do; otherwise only finite, positive durations.
    pub fn is_tracked(&self) -> bool {
        self.is_periodic || (!self.is_permanent && self.duration > 0.0)
    }
}
