//! Shared replay script for the determinism suites.

use gameplay_core::{
    AbilityDefinition, AbilityId, Attribute, AttributeModifier, AttributeSet, EffectDefinition,
    EffectId, EntityId, EntitySpec, ExecutionType, GameplayDatabase, GameplayEngine, Request,
    SlotPressed, StackingPolicy, TagDatabaseBuilder, TagId, TagNode, World,
};

pub fn database() -> GameplayDatabase {
    let tags = TagDatabaseBuilder::new()
        .tag(TagNode::root(1, "Status"))
        .tag(TagNode::child(2, "Status.Poisoned", 1))
        .build()
        .unwrap();
    GameplayDatabase::builder(tags)
        .effect(
            EffectDefinition::new(1)
                .with_duration(3.0)
                .periodic(0.5)
                .granting(TagId(2))
                .stacking(StackingPolicy::StackAdditive, 4)
                .modifier(AttributeModifier::add(Attribute::Health, -1.0)),
        )
        .effect(EffectDefinition::new(2).modifier(AttributeModifier::add(Attribute::Health, -3.0)))
        .ability(
            AbilityDefinition::new(1, ExecutionType::ApplyEffectToTarget)
                .with_effects(EffectId(1), EffectId(2)),
        )
        .ability(
            AbilityDefinition::new(2, ExecutionType::SpawnProjectileApplyOnHit)
                .with_flight_time(0.75)
                .with_effects(EffectId(2), EffectId::NONE),
        )
        .build()
        .unwrap()
}

/// Every entity attacks its neighbour on a fixed schedule.
pub fn run(parallel: bool) -> World {
    let db = database();
    let mut world = World::new();
    let ids: Vec<EntityId> = (0..24)
        .map(|_| {
            world.spawn(
                EntitySpec::new(
                    AttributeSet::new()
                        .with(Attribute::MaxHealth, 500.0)
                        .with(Attribute::Health, 500.0),
                )
                .grant(AbilityId(1), Some(0))
                .grant(AbilityId(2), Some(1)),
            )
        })
        .collect();

    for tick in 0..40usize {
        for (index, &id) in ids.iter().enumerate() {
            if (tick + index) % 3 == 0 {
                let target = ids[(index + 1) % ids.len()];
                world.submit(
                    id,
                    Request::SlotPressed(SlotPressed {
                        slot: (tick % 2) as u8,
                        target: Some(target),
                    }),
                );
            }
        }
        GameplayEngine::new(&mut world, Some(&db))
            .parallel(parallel)
            .step(0.25);
    }
    world
}

