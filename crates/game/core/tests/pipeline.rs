//! End-to-end scenarios driven through `GameplayEngine::step`.

use gameplay_core::{
    AbilityDefinition, AbilityHandle, AbilityId, ApplyEffectById, Attribute, AttributeModifier,
    AttributeSet, EffectDefinition, EffectId, EntityId, EntitySpec, ExecutionType,
    GameplayDatabase, GameplayEngine, GameplayEventKind, Pass, Request, SlotPressed,
    StackingPolicy, TagChangeKind, TagDatabaseBuilder, TagId, TagNode, TryActivateAbility,
    World,
};

const STATUS: TagId = TagId(1);
const BURNING: TagId = TagId(2);
const HOLY: TagId = TagId(3);
const COOLDOWN_FIREBALL: TagId = TagId(4);

const BURN: EffectId = EffectId(1);
const RAGE: EffectId = EffectId(2);
const FOCUS: EffectId = EffectId(3);
const HIT: EffectId = EffectId(4);
const FIREBALL_COOLDOWN: EffectId = EffectId(5);
const BLESS: EffectId = EffectId(6);

const STRIKE: AbilityId = AbilityId(1);
const FIREBALL: AbilityId = AbilityId(2);
const PURIFY: AbilityId = AbilityId(3);
const IGNITE: AbilityId = AbilityId(4);

fn database() -> GameplayDatabase {
    let tags = TagDatabaseBuilder::new()
        .tag(TagNode::root(1, "Status"))
        .tag(TagNode::child(2, "Status.Burning", 1))
        .tag(TagNode::child(3, "Status.Holy", 1))
        .tag(TagNode::root(4, "Cooldown.Fireball"))
        .build()
        .unwrap();

    GameplayDatabase::builder(tags)
        .effect(
            EffectDefinition::new(BURN.0)
                .with_duration(2.0)
                .periodic(1.0)
                .granting(BURNING)
                .blocked_by(HOLY)
                .modifier(AttributeModifier::add(Attribute::Health, -5.0)),
        )
        .effect(
            EffectDefinition::new(RAGE.0)
                .with_duration(5.0)
                .reverting()
                .stacking(StackingPolicy::StackAdditive, 3)
                .modifier(AttributeModifier::add(Attribute::Attack, 2.0)),
        )
        .effect(
            EffectDefinition::new(FOCUS.0)
                .with_duration(4.0)
                .stacking(StackingPolicy::RefreshDuration, 1)
                .modifier(AttributeModifier::add(Attribute::Defense, 1.0)),
        )
        .effect(EffectDefinition::new(HIT.0).modifier(AttributeModifier::add(Attribute::Health, -10.0)))
        .effect(
            EffectDefinition::new(FIREBALL_COOLDOWN.0)
                .with_duration(3.0)
                .granting(COOLDOWN_FIREBALL),
        )
        .effect(
            EffectDefinition::new(BLESS.0)
                .with_duration(10.0)
                .granting(HOLY),
        )
        .ability(
            AbilityDefinition::new(STRIKE.0, ExecutionType::ApplyEffectToTarget)
                .with_cost(20.0)
                .with_cooldown(10.0)
                .with_effects(HIT, BURN),
        )
        .ability(
            AbilityDefinition::new(FIREBALL.0, ExecutionType::SpawnProjectileApplyOnHit)
                .with_flight_time(1.0)
                .with_effects(HIT, EffectId::NONE)
                .with_cooldown_effect(FIREBALL_COOLDOWN, COOLDOWN_FIREBALL),
        )
        .ability(AbilityDefinition::new(PURIFY.0, ExecutionType::CleanseByTag).cleansing(BURNING))
        .ability(
            AbilityDefinition::new(IGNITE.0, ExecutionType::ApplyEffectToTarget)
                .with_effects(BURN, EffectId::NONE)
                .requiring(STATUS),
        )
        .build()
        .unwrap()
}

fn fighter(mana: f32) -> EntitySpec {
    EntitySpec::new(
        AttributeSet::new()
            .with(Attribute::MaxHealth, 100.0)
            .with(Attribute::Health, 100.0)
            .with(Attribute::MaxMana, 100.0)
            .with(Attribute::Mana, mana)
            .with(Attribute::Attack, 10.0),
    )
}

fn apply(effect_id: EffectId) -> Request {
    Request::ApplyEffectById(ApplyEffectById {
        effect_id,
        source: EntityId::NONE,
        level: 1,
    })
}

fn health(world: &World, id: EntityId) -> f32 {
    world.entity(id).unwrap().attributes.get(Attribute::Health)
}

fn has_tag(world: &World, db: &GameplayDatabase, id: EntityId, tag: TagId) -> bool {
    let mask = db.tags().own_mask_of(tag).unwrap();
    world.entity(id).unwrap().tags.has_tag(&mask)
}

#[test]
fn periodic_burn_ticks_twice_and_clears_its_tag() {
    let db = database();
    let mut world = World::new();
    let target = world.spawn(fighter(0.0));
    world.submit(target, apply(BURN));

    let mut engine = GameplayEngine::new(&mut world, Some(&db));
    engine.step(1.0);
    assert_eq!(health(engine.world(), target), 95.0);
    assert!(has_tag(engine.world(), &db, target, BURNING));
    assert!(has_tag(engine.world(), &db, target, STATUS));

    engine.step(1.0);
    assert_eq!(health(engine.world(), target), 90.0);
    assert!(!has_tag(engine.world(), &db, target, BURNING));
    assert!(engine.world().entity(target).unwrap().effects.is_empty());

    engine.step(1.0);
    engine.step(1.0);
    assert_eq!(health(engine.world(), target), 90.0);

    let changes = world.drain_tag_changes();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].kind, TagChangeKind::Added);
    assert_eq!(changes[1].kind, TagChangeKind::Removed);
    assert_eq!(changes[0].entity, target);
}

#[test]
fn every_reapply_lands_modifiers_and_stacks_add_one_more() {
    let db = database();
    let mut world = World::new();
    let id = world.spawn(fighter(0.0));

    world.submit(id, apply(FOCUS));
    world.submit(id, apply(RAGE));
    let mut engine = GameplayEngine::new(&mut world, Some(&db));
    engine.step(1.0);
    let before = engine.world().entity(id).unwrap().effects.find(FOCUS).unwrap().remaining_time;
    assert_eq!(engine.world().entity(id).unwrap().attributes.get(Attribute::Attack), 12.0);

    for _ in 0..3 {
        world.submit(id, apply(FOCUS));
        world.submit(id, apply(RAGE));
    }
    let mut engine = GameplayEngine::new(&mut world, Some(&db));
    engine.step(0.0);

    let entity = engine.world().entity(id).unwrap();
    assert!(entity.effects.find(FOCUS).unwrap().remaining_time > before);
    assert_eq!(entity.effects.count(FOCUS), 1);
    assert_eq!(entity.effects.find(RAGE).unwrap().stack_count, 3);
    assert_eq!(entity.attributes.get(Attribute::Defense), 4.0);
    // 12 + two gained stacks at 2 x 2 + one capped reapply at 2
    assert_eq!(entity.attributes.get(Attribute::Attack), 22.0);

    // Expiry reverts the three stacks at once.
    engine.step(5.0);
    let entity = engine.world().entity(id).unwrap();
    assert_eq!(entity.attributes.get(Attribute::Attack), 16.0);
    assert_eq!(entity.attributes.get(Attribute::Defense), 4.0);
    let stacked = world
        .drain_events()
        .iter()
        .filter(|e| e.kind == GameplayEventKind::EffectStacked)
        .count();
    assert_eq!(stacked, 2);
}

#[test]
fn gate_rejects_then_admits_strike() {
    let db = database();
    let mut world = World::new();
    let caster = world.spawn(fighter(0.0).grant(STRIKE, Some(0)));
    let target = world.spawn(fighter(0.0));
    GameplayEngine::new(&mut world, Some(&db)).step(0.0);

    let handle = world.entity(caster).unwrap().abilities.find(STRIKE).unwrap().handle;
    assert!(!handle.is_pending());
    let record = |world: &World| *world.entity(caster).unwrap().abilities.get(handle).unwrap();

    world
        .entity_mut(caster)
        .unwrap()
        .abilities
        .get_mut(handle)
        .unwrap()
        .cooldown_remaining = 5.0;
    world.submit(caster, Request::TryActivate(TryActivateAbility::new(handle).at(target)));

    let mut engine = GameplayEngine::new(&mut world, Some(&db));
    engine.run_pass(Pass::Gate, 0.0);
    let entity = engine.world().entity(caster).unwrap();
    assert_eq!(entity.mailbox.try_activate.len(), 0);
    assert_eq!(entity.attributes.get(Attribute::Mana), 0.0);
    assert_eq!(record(&world).cooldown_remaining, 5.0);

    let entity = world.entity_mut(caster).unwrap();
    entity.abilities.get_mut(handle).unwrap().cooldown_remaining = 0.0;
    entity.attributes.set(Attribute::Mana, 50.0);
    world.submit(caster, Request::TryActivate(TryActivateAbility::new(handle).at(target)));

    let mut engine = GameplayEngine::new(&mut world, Some(&db));
    engine.run_pass(Pass::Gate, 0.0);
    let entity = engine.world().entity(caster).unwrap();
    assert_eq!(entity.mailbox.try_activate.len(), 1);
    assert_eq!(entity.attributes.get(Attribute::Mana), 30.0);
    assert!(record(&world).cooldown_remaining > 0.0);

    // Finish the step from dispatch onwards.
    let mut engine = GameplayEngine::new(&mut world, Some(&db));
    for pass in Pass::ORDER.into_iter().skip_while(|p| *p != Pass::Execute) {
        engine.run_pass(pass, 1.0);
    }
    // Hit for 10 plus the first burn tick.
    assert_eq!(health(&world, target), 85.0);
    let activated = world
        .events()
        .iter()
        .find(|e| e.kind == GameplayEventKind::AbilityActivated)
        .unwrap();
    assert_eq!((activated.source, activated.target), (caster, target));
}

#[test]
fn cleanse_stops_burn_immediately() {
    let db = database();
    let mut world = World::new();
    let priest = world.spawn(fighter(0.0).grant(PURIFY, Some(1)));
    let victim = world.spawn(fighter(0.0));
    world.submit(victim, apply(BURN));
    world.entity_mut(victim).unwrap().attributes.set(Attribute::Health, 50.0);

    let mut engine = GameplayEngine::new(&mut world, Some(&db));
    engine.step(1.0);
    assert_eq!(health(engine.world(), victim), 45.0);

    world.submit(
        priest,
        Request::SlotPressed(SlotPressed {
            slot: 1,
            target: Some(victim),
        }),
    );
    let mut engine = GameplayEngine::new(&mut world, Some(&db));
    engine.step(0.5);
    assert!(!has_tag(engine.world(), &db, victim, BURNING));
    assert!(engine.world().entity(victim).unwrap().effects.is_empty());

    engine.step(1.0);
    engine.step(1.0);
    assert_eq!(health(engine.world(), victim), 45.0);
}

#[test]
fn holy_target_is_immune_to_burn() {
    let db = database();
    let mut world = World::new();
    let id = world.spawn(fighter(0.0));
    world.submit(id, apply(BLESS));
    GameplayEngine::new(&mut world, Some(&db)).step(0.0);
    world.drain_events();

    world.submit(id, apply(BURN));
    GameplayEngine::new(&mut world, Some(&db)).step(1.0);

    assert_eq!(health(&world, id), 100.0);
    assert!(!has_tag(&world, &db, id, BURNING));
    assert!(
        world
            .events()
            .iter()
            .all(|e| !(e.kind == GameplayEventKind::EffectApplied && e.id == BURN.0))
    );
}

#[test]
fn fireball_flies_then_lands_and_cooldown_tag_blocks_recast() {
    let db = database();
    let mut world = World::new();
    let mage = world.spawn(fighter(0.0).grant(FIREBALL, Some(0)));
    let target = world.spawn(fighter(0.0));
    GameplayEngine::new(&mut world, Some(&db)).step(0.0);

    let press = Request::SlotPressed(SlotPressed {
        slot: 0,
        target: Some(target),
    });
    world.submit(mage, press);
    GameplayEngine::new(&mut world, Some(&db)).step(0.5);
    assert_eq!(world.projectiles().len(), 1);
    assert!(has_tag(&world, &db, mage, COOLDOWN_FIREBALL));

    // Blocked by the cooldown tag while the first one is in flight.
    world.submit(mage, press);
    GameplayEngine::new(&mut world, Some(&db)).step(0.5);
    assert_eq!(world.projectiles().len(), 1);
    assert_eq!(health(&world, target), 100.0);

    GameplayEngine::new(&mut world, Some(&db)).step(0.5);
    assert!(world.projectiles().is_empty());
    assert_eq!(health(&world, target), 90.0);
    assert!(
        world
            .events()
            .iter()
            .any(|e| e.kind == GameplayEventKind::ProjectileHit && e.target == target)
    );
}

#[test]
fn projectile_with_missing_target_is_discarded() {
    let db = database();
    let mut world = World::new();
    let mage = world.spawn(fighter(0.0).grant(FIREBALL, Some(0)));
    let target = world.spawn(fighter(0.0));
    GameplayEngine::new(&mut world, Some(&db)).step(0.0);

    world.submit(
        mage,
        Request::SlotPressed(SlotPressed {
            slot: 0,
            target: Some(target),
        }),
    );
    GameplayEngine::new(&mut world, Some(&db)).step(0.1);
    world.despawn(target);
    GameplayEngine::new(&mut world, Some(&db)).step(2.0);

    assert!(world.projectiles().is_empty());
    assert!(
        world
            .events()
            .iter()
            .all(|e| e.kind != GameplayEventKind::ProjectileHit)
    );
}

#[test]
fn requirements_use_the_tag_hierarchy() {
    let db = database();
    let mut world = World::new();
    let caster = world.spawn(fighter(0.0).grant(IGNITE, None));
    GameplayEngine::new(&mut world, Some(&db)).step(0.0);
    let handle: AbilityHandle = world.entity(caster).unwrap().abilities.find(IGNITE).unwrap().handle;

    let activations = |world: &World| {
        world
            .events()
            .iter()
            .filter(|e| e.kind == GameplayEventKind::AbilityActivated && e.id == IGNITE.0)
            .count()
    };

    // No Status tag yet: rejected.
    world.submit(caster, Request::TryActivate(TryActivateAbility::new(handle)));
    GameplayEngine::new(&mut world, Some(&db)).step(0.0);
    assert_eq!(activations(&world), 0);

    // Holding Status.Holy satisfies a Status requirement.
    world.submit(caster, apply(BLESS));
    GameplayEngine::new(&mut world, Some(&db)).step(0.0);
    world.submit(caster, Request::TryActivate(TryActivateAbility::new(handle)));
    GameplayEngine::new(&mut world, Some(&db)).step(0.0);
    assert_eq!(activations(&world), 1);

    // The burn it casts on itself bounces off its own holy shield.
    assert_eq!(world.entity(caster).unwrap().effects.count(BURN), 0);
}

#[test]
fn unknown_ids_and_handles_are_dropped_silently() {
    let db = database();
    let mut world = World::new();
    let id = world.spawn(fighter(0.0).grant(AbilityId(99), None));
    world.submit(id, apply(EffectId(77)));
    world.submit(id, Request::TryActivate(TryActivateAbility::new(AbilityHandle(1234))));

    let report = GameplayEngine::new(&mut world, Some(&db)).step(1.0);
    assert_eq!(report.consumed, 3);
    let entity = world.entity(id).unwrap();
    assert!(entity.abilities.is_empty());
    assert!(entity.effects.is_empty());
    assert!(entity.mailbox.is_empty());
}
