/// How the activation gate accounts for mana spent by earlier activations in
/// the same pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ManaPolicy {
    /// Every request is checked against the live mana value, so same-tick
    /// activations can never drive mana below zero.
    #[default]
    Serialized,

    /// Every request is checked against the mana value sampled when the pass
    /// started. Several same-tick activations may overspend.
    Unbounded,
}

/// Gameplay configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameplayConfig {
    /// Mana accounting used by the activation gate.
    pub mana_policy: ManaPolicy,
}

impl GameplayConfig {
    // ===== compile-time constants used as type parameters =====
    /// Words per tag mask. 4 words = 256 distinct tags.
    pub const TAG_MASK_WORDS: usize = 4;
    /// Modifiers a single effect definition may carry.
    pub const MAX_MODIFIERS: usize = 8;
    /// Required or blocked tags listed on one ability.
    pub const MAX_TAG_REQUIREMENTS: usize = 8;
    /// Input slots an entity can bind granted abilities to.
    pub const MAX_ABILITY_SLOTS: usize = 8;

    pub const fn new() -> Self {
        Self {
            mana_policy: ManaPolicy::Serialized,
        }
    }

    pub const fn with_mana_policy(mana_policy: ManaPolicy) -> Self {
        Self { mana_policy }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self::new()
    }
}
