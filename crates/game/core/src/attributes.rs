//! Entity attributes and the modifier aggregation seam.
//!
//! The effect and ability runtimes never touch attribute values directly
//! (apart from the gate spending mana). They queue
//! [`AttributeModifier`]s, and the attribute pass hands each one to an
//! [`AttributeAggregator`]. [`DefaultAggregator`] implements plain
//! add / multiply / override arithmetic with resource clamping; hosts with
//! their own stat pipeline plug in a different aggregator.

/// Attributes every entity carries.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Attribute {
    Health,
    MaxHealth,
    Mana,
    MaxMana,
    Attack,
    Defense,
    MoveSpeed,
}

impl Attribute {
    pub const COUNT: usize = 7;

    pub const ALL: [Attribute; Self::COUNT] = [
        Self::Health,
        Self::MaxHealth,
        Self::Mana,
        Self::MaxMana,
        Self::Attack,
        Self::Defense,
        Self::MoveSpeed,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Upper bound attribute for clamped resources.
    pub const fn max_attribute(self) -> Option<Attribute> {
        match self {
            Self::Health => Some(Self::MaxHealth),
            Self::Mana => Some(Self::MaxMana),
            _ => None,
        }
    }
}

/// Damage classification carried by modifiers for resistances and UI.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    #[default]
    None,
    Physical,
    Fire,
    Frost,
    Poison,
    Holy,
}

/// How a modifier combines with the current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierOp {
    Add,
    Multiply,
    Override,
}

/// One attribute change authored on an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeModifier {
    pub attribute: Attribute,
    pub op: ModifierOp,
    pub magnitude: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
}

impl AttributeModifier {
    pub fn new(attribute: Attribute, op: ModifierOp, magnitude: f32) -> Self {
        Self {
            attribute,
            op,
            magnitude,
            damage_type: DamageType::None,
        }
    }

    pub fn add(attribute: Attribute, magnitude: f32) -> Self {
        Self::new(attribute, ModifierOp::Add, magnitude)
    }

    pub fn multiply(attribute: Attribute, magnitude: f32) -> Self {
        Self::new(attribute, ModifierOp::Multiply, magnitude)
    }

    #[must_use]
    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    /// Same modifier applied `stacks` times at once.
    ///
    /// Add scales linearly; multiply compounds. A single stack is returned
    /// untouched.
    #[must_use]
    pub fn scaled(&self, stacks: u32) -> Self {
        if stacks == 1 {
            return *self;
        }
        let magnitude = match self.op {
            ModifierOp::Add => self.magnitude * stacks as f32,
            ModifierOp::Multiply => self.magnitude.powi(stacks as i32),
            ModifierOp::Override => self.magnitude,
        };
        Self { magnitude, ..*self }
    }

    /// Modifier that undoes this one, or `None` when it cannot be undone.
    ///
    /// Override has no inverse. A zero multiplier reverts to a no-op factor
    /// of one.
    pub fn inverse(&self) -> Option<Self> {
        let magnitude = match self.op {
            ModifierOp::Add => -self.magnitude,
            ModifierOp::Multiply if self.magnitude == 0.0 => 1.0,
            ModifierOp::Multiply => 1.0 / self.magnitude,
            ModifierOp::Override => return None,
        };
        Some(Self { magnitude, ..*self })
    }
}

/// Base and current value of one attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeValue {
    pub base: f32,
    pub current: f32,
}

impl AttributeValue {
    pub fn new(value: f32) -> Self {
        Self {
            base: value,
            current: value,
        }
    }
}

/// Every [`Attribute`] of one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeSet {
    values: [AttributeValue; Attribute::COUNT],
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets both base and current value (builder pattern).
    #[must_use]
    pub fn with(mut self, attribute: Attribute, value: f32) -> Self {
        self.values[attribute.index()] = AttributeValue::new(value);
        self
    }

    pub fn get(&self, attribute: Attribute) -> f32 {
        self.values[attribute.index()].current
    }

    pub fn base(&self, attribute: Attribute) -> f32 {
        self.values[attribute.index()].base
    }

    pub fn set(&mut self, attribute: Attribute, value: f32) {
        self.values[attribute.index()].current = value;
    }

    pub fn value(&self, attribute: Attribute) -> &AttributeValue {
        &self.values[attribute.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &AttributeValue)> {
        Attribute::ALL.into_iter().zip(self.values.iter())
    }
}

/// Applies queued attribute modifiers to an entity.
///
/// Returns the `(old, new)` current value so the caller can emit change
/// events.
pub trait AttributeAggregator: Send + Sync {
    fn apply(&self, attributes: &mut AttributeSet, modifier: &AttributeModifier) -> (f32, f32);
}

/// Plain arithmetic aggregator.
///
/// Health and mana are clamped to `[0, MaxHealth]` / `[0, MaxMana]` when the
/// maximum is positive.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultAggregator;

impl AttributeAggregator for DefaultAggregator {
    fn apply(&self, attributes: &mut AttributeSet, modifier: &AttributeModifier) -> (f32, f32) {
        let old = attributes.get(modifier.attribute);
        let mut new = match modifier.op {
            ModifierOp::Add => old + modifier.magnitude,
            ModifierOp::Multiply => old * modifier.magnitude,
            ModifierOp::Override => modifier.magnitude,
        };

        if let Some(max_attribute) = modifier.attribute.max_attribute() {
            let max = attributes.get(max_attribute);
            if max > 0.0 {
                new = new.clamp(0.0, max);
            }
        }

        attributes.set(modifier.attribute, new);
        (old, new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_undoes_add_and_multiply() {
        let add = AttributeModifier::add(Attribute::Attack, 5.0);
        assert_eq!(add.inverse().unwrap().magnitude, -5.0);

        let mul = AttributeModifier::multiply(Attribute::Attack, 2.0);
        assert_eq!(mul.inverse().unwrap().magnitude, 0.5);

        let zero = AttributeModifier::multiply(Attribute::Attack, 0.0);
        assert_eq!(zero.inverse().unwrap().magnitude, 1.0);

        let set = AttributeModifier::new(Attribute::Attack, ModifierOp::Override, 3.0);
        assert!(set.inverse().is_none());
    }

    #[test]
    fn scaling_is_linear_for_add_and_compound_for_multiply() {
        let add = AttributeModifier::add(Attribute::Health, -5.0);
        assert_eq!(add.scaled(3).magnitude, -15.0);

        let mul = AttributeModifier::multiply(Attribute::MoveSpeed, 0.5);
        assert_eq!(mul.scaled(2).magnitude, 0.25);
        assert_eq!(mul.scaled(1), mul);
    }

    #[test]
    fn default_aggregator_clamps_resources() {
        let mut attributes = AttributeSet::new()
            .with(Attribute::MaxHealth, 100.0)
            .with(Attribute::Health, 90.0)
            .with(Attribute::Attack, 10.0);
        let aggregator = DefaultAggregator;

        let (old, new) = aggregator.apply(&mut attributes, &AttributeModifier::add(Attribute::Health, 50.0));
        assert_eq!((old, new), (90.0, 100.0));

        aggregator.apply(&mut attributes, &AttributeModifier::add(Attribute::Health, -500.0));
        assert_eq!(attributes.get(Attribute::Health), 0.0);

        aggregator.apply(&mut attributes, &AttributeModifier::multiply(Attribute::Attack, 1.5));
        assert_eq!(attributes.get(Attribute::Attack), 15.0);
        assert_eq!(attributes.base(Attribute::Attack), 10.0);
    }

    #[test]
    fn attribute_names_parse_case_insensitively() {
        assert_eq!("move_speed".parse::<Attribute>().unwrap(), Attribute::MoveSpeed);
        assert_eq!("FIRE".parse::<DamageType>().unwrap(), DamageType::Fire);
        assert_eq!(Attribute::MaxMana.to_string(), "max_mana");
    }
}
