/// The passes of one simulation step, in execution order.
///
/// A pass finishes for every entity before the next one starts. Requests a
/// pass emits for another entity become visible to the first later pass
/// that consumes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Pass {
    /// Slot presses → activation requests.
    Input,
    /// Grant requests → granted ability records.
    Grant,
    /// Cooldowns, cancels and admission checks.
    Gate,
    /// Admitted activations → effects, projectiles, cleanses.
    Execute,
    /// Projectile flight timers.
    Projectiles,
    /// Effect ids → resolved applications.
    ResolveEffects,
    /// Apply, remove, cleanse, then tick active effects.
    Effects,
    /// Add / remove tag requests.
    Tags,
    /// Queued attribute modifiers.
    Attributes,
    /// Per-entity events → world event queue.
    Events,
}

impl Pass {
    pub const ORDER: [Pass; 10] = [
        Pass::Input,
        Pass::Grant,
        Pass::Gate,
        Pass::Execute,
        Pass::Projectiles,
        Pass::ResolveEffects,
        Pass::Effects,
        Pass::Tags,
        Pass::Attributes,
        Pass::Events,
    ];

    /// Passes that may create pending handles.
    pub(crate) const fn creates_handles(self) -> bool {
        matches!(self, Pass::Grant | Pass::Effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn order_lists_every_pass_once_in_declaration_order() {
        assert!(Pass::iter().eq(Pass::ORDER));
    }
}
