use super::{ExecutionType, GrantedAbility};
use crate::attributes::Attribute;
use crate::config::{GameplayConfig, ManaPolicy};
use crate::database::GameplayDatabase;
use crate::engine::Outbox;
use crate::event::{GameplayEvent, GameplayEventKind};
use crate::mailbox::{ApplyEffectById, Request, TryActivateAbility};
use crate::state::{AbilityHandle, ChangeFlags, EntityState, Projectile};

/// Converts slot presses into activation requests for the bound handle.
pub(crate) fn translate_input(entity: &mut EntityState) -> usize {
    let presses = std::mem::take(&mut entity.mailbox.slot_pressed);
    for press in &presses {
        let Some(bound) = entity.abilities.in_slot(press.slot) else {
            trace!("{}: slot {} is unbound", entity.id, press.slot);
            continue;
        };
        entity.mailbox.try_activate.push(TryActivateAbility {
            handle: bound.handle,
            target: press.target,
            target_data: None,
        });
    }
    presses.len()
}

/// Appends a granted ability record for every known ability id.
pub(crate) fn grant_abilities(entity: &mut EntityState, db: &GameplayDatabase) -> usize {
    let requests = std::mem::take(&mut entity.mailbox.grant_ability);
    for request in &requests {
        let Some(def) = db.ability(request.ability_id) else {
            trace!("{}: unknown {} not granted", entity.id, request.ability_id);
            continue;
        };
        let slot = request
            .slot
            .filter(|&slot| usize::from(slot) < GameplayConfig::MAX_ABILITY_SLOTS);
        entity.abilities.grant(GrantedAbility {
            handle: AbilityHandle::PENDING,
            ability_id: def.id,
            cooldown_remaining: 0.0,
            slot,
        });
        entity.mailbox.events.push(GameplayEvent::new(
            GameplayEventKind::AbilityGranted,
            entity.id,
            entity.id,
            def.id.0,
        ));
        entity.changes |= ChangeFlags::ABILITIES;
    }
    requests.len()
}

/// Admission checks for pending activations.
///
/// Cooldowns tick down first. Requests failing any check are dropped with
/// cost and cooldown untouched; survivors pay their mana, start their
/// cooldown, and stay queued for execution.
pub(crate) fn gate_abilities(
    entity: &mut EntityState,
    db: &GameplayDatabase,
    policy: ManaPolicy,
    dt: f32,
) -> usize {
    for ability in entity.abilities.records_mut() {
        ability.cooldown_remaining = (ability.cooldown_remaining - dt).max(0.0);
    }

    let cancelled = std::mem::take(&mut entity.mailbox.cancel_ability);
    let requests = std::mem::take(&mut entity.mailbox.try_activate);
    let consumed = requests.len();
    let mana_at_start = entity.attributes.get(Attribute::Mana);
    let mut admitted = Vec::with_capacity(requests.len());

    for request in requests {
        if cancelled.contains(&request.handle) {
            continue;
        }
        let Some(granted) = entity.abilities.get(request.handle).copied() else {
            continue;
        };
        let Some(def) = db.ability(granted.ability_id) else {
            continue;
        };

        let on_cooldown_tag = def.cooldown_tag.is_valid()
            && db
                .tags()
                .own_mask_of(def.cooldown_tag)
                .is_some_and(|mask| entity.tags.has_tag(&mask));
        if on_cooldown_tag {
            trace!("{}: {} blocked by cooldown tag", entity.id, def.id);
            continue;
        }
        if db
            .ability_requirements(def.id)
            .is_some_and(|query| !query.matches(entity.tags.combined_mask()))
        {
            trace!("{}: {} tag requirements unmet", entity.id, def.id);
            continue;
        }
        if granted.cooldown_remaining > 0.0 {
            continue;
        }
        if def.mana_cost > 0.0 {
            let available = match policy {
                ManaPolicy::Serialized => entity.attributes.get(Attribute::Mana),
                ManaPolicy::Unbounded => mana_at_start,
            };
            if available < def.mana_cost {
                trace!("{}: {} needs {} mana", entity.id, def.id, def.mana_cost);
                continue;
            }
            spend_mana(entity, def.mana_cost);
        }

        if def.cooldown_effect_id.is_valid() {
            entity.mailbox.apply_effect_by_id.push(ApplyEffectById {
                effect_id: def.cooldown_effect_id,
                source: entity.id,
                level: 1,
            });
        } else if let Some(record) = entity.abilities.get_mut(request.handle) {
            record.cooldown_remaining = def.cooldown_duration;
        }
        entity.changes |= ChangeFlags::ABILITIES;
        admitted.push(request);
    }

    entity.mailbox.try_activate = admitted;
    consumed
}

fn spend_mana(entity: &mut EntityState, cost: f32) {
    let mana = entity.attributes.get(Attribute::Mana) - cost;
    entity.attributes.set(Attribute::Mana, mana);
    entity.changes |= ChangeFlags::ATTRIBUTES;
    entity.mailbox.events.push(
        GameplayEvent::new(
            GameplayEventKind::AttributeChanged,
            entity.id,
            entity.id,
            Attribute::Mana.index() as u32,
        )
        .with_magnitude(mana),
    );
}

/// Dispatches every admitted activation on its execution type.
///
/// Everything aimed at another entity (or at self) goes through `out`.
pub(crate) fn execute_abilities(
    entity: &mut EntityState,
    db: &GameplayDatabase,
    out: &mut Outbox,
) -> usize {
    let requests = std::mem::take(&mut entity.mailbox.try_activate);
    for request in &requests {
        let Some(granted) = entity.abilities.get(request.handle) else {
            continue;
        };
        let Some(def) = db.ability(granted.ability_id) else {
            continue;
        };
        let target = request
            .target
            .or_else(|| request.target_data.and_then(|data| data.entity))
            .unwrap_or(entity.id);

        match def.execution_type {
            ExecutionType::ApplyEffectToTarget => {
                for effect_id in def.effects() {
                    out.send(
                        target,
                        Request::ApplyEffectById(ApplyEffectById {
                            effect_id,
                            source: entity.id,
                            level: 1,
                        }),
                    );
                }
            }
            ExecutionType::SpawnProjectileApplyOnHit => {
                out.launch(Projectile::new(entity.id, target, def));
                entity.mailbox.events.push(
                    GameplayEvent::new(
                        GameplayEventKind::ProjectileLaunched,
                        entity.id,
                        target,
                        def.id.0,
                    )
                    .with_magnitude(def.projectile_flight_time),
                );
            }
            ExecutionType::CleanseByTag => {
                if let Some(tag_request) = db.tags().request(def.cleanse_tag) {
                    out.send(target, Request::RemoveEffectsWithTag(def.cleanse_tag));
                    out.send(target, Request::RemoveTag(tag_request));
                }
            }
        }

        entity.mailbox.events.push(
            GameplayEvent::new(
                GameplayEventKind::AbilityActivated,
                entity.id,
                target,
                def.id.0,
            )
            .with_magnitude(def.mana_cost),
        );
    }
    requests.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{AbilityDefinition, AbilityId};
    use crate::attributes::AttributeSet;
    use crate::effects::{EffectDefinition, EffectId};
    use crate::mailbox::GrantAbility;
    use crate::state::EntityId;
    use crate::tags::{TagDatabaseBuilder, TagId, TagNode};

    const SILENCED: TagId = TagId(2);
    const COOLDOWN: TagId = TagId(3);

    fn db() -> GameplayDatabase {
        let tags = TagDatabaseBuilder::new()
            .tag(TagNode::root(1, "Status"))
            .tag(TagNode::child(2, "Status.Silenced", 1))
            .tag(TagNode::root(3, "Cooldown.Fireball"))
            .build()
            .unwrap();
        GameplayDatabase::builder(tags)
            .effect(EffectDefinition::new(1))
            .effect(EffectDefinition::new(2).with_duration(3.0).granting(COOLDOWN))
            .ability(
                AbilityDefinition::new(1, ExecutionType::ApplyEffectToTarget)
                    .with_cost(20.0)
                    .with_cooldown(10.0)
                    .with_effects(EffectId(1), EffectId::NONE)
                    .blocked_by(SILENCED),
            )
            .ability(
                AbilityDefinition::new(2, ExecutionType::ApplyEffectToTarget)
                    .with_cooldown_effect(EffectId(2), COOLDOWN),
            )
            .build()
            .unwrap()
    }

    fn caster(mana: f32) -> EntityState {
        let mut entity = EntityState::new(
            EntityId(1),
            AttributeSet::new()
                .with(Attribute::Mana, mana)
                .with(Attribute::MaxMana, 100.0),
        );
        entity.abilities.grant(GrantedAbility {
            handle: AbilityHandle(1),
            ability_id: AbilityId(1),
            cooldown_remaining: 0.0,
            slot: Some(0),
        });
        entity.abilities.grant(GrantedAbility {
            handle: AbilityHandle(2),
            ability_id: AbilityId(2),
            cooldown_remaining: 0.0,
            slot: None,
        });
        entity
    }

    fn activate(entity: &mut EntityState, handle: u64) {
        entity
            .mailbox
            .try_activate
            .push(TryActivateAbility::new(AbilityHandle(handle)));
    }

    #[test]
    fn gate_rejects_without_side_effects_then_admits() {
        let db = db();
        let mut entity = caster(0.0);
        entity.abilities.get_mut(AbilityHandle(1)).unwrap().cooldown_remaining = 5.0;
        activate(&mut entity, 1);

        gate_abilities(&mut entity, &db, ManaPolicy::Serialized, 0.0);
        assert!(entity.mailbox.try_activate.is_empty());
        assert_eq!(entity.attributes.get(Attribute::Mana), 0.0);
        assert_eq!(
            entity.abilities.get(AbilityHandle(1)).unwrap().cooldown_remaining,
            5.0
        );

        entity.abilities.get_mut(AbilityHandle(1)).unwrap().cooldown_remaining = 0.0;
        entity.attributes.set(Attribute::Mana, 50.0);
        activate(&mut entity, 1);

        gate_abilities(&mut entity, &db, ManaPolicy::Serialized, 0.0);
        assert_eq!(entity.mailbox.try_activate.len(), 1);
        assert_eq!(entity.attributes.get(Attribute::Mana), 30.0);
        assert!(entity.abilities.get(AbilityHandle(1)).unwrap().cooldown_remaining > 0.0);
    }

    #[test]
    fn cooldown_ticks_down_before_checks() {
        let db = db();
        let mut entity = caster(50.0);
        entity.abilities.get_mut(AbilityHandle(1)).unwrap().cooldown_remaining = 0.5;
        activate(&mut entity, 1);

        gate_abilities(&mut entity, &db, ManaPolicy::Serialized, 1.0);
        assert_eq!(entity.mailbox.try_activate.len(), 1);
    }

    #[test]
    fn blocked_tag_and_cancel_drop_requests() {
        let db = db();
        let mut entity = caster(100.0);
        entity
            .tags
            .apply(&[db.tags().request(SILENCED).unwrap()], &[], |_, _| {});
        activate(&mut entity, 1);
        activate(&mut entity, 2);
        entity.mailbox.cancel_ability.push(AbilityHandle(2));

        gate_abilities(&mut entity, &db, ManaPolicy::Serialized, 0.0);
        assert!(entity.mailbox.try_activate.is_empty());
        assert!(entity.mailbox.cancel_ability.is_empty());
        assert_eq!(entity.attributes.get(Attribute::Mana), 100.0);
    }

    #[test]
    fn mana_policy_controls_same_tick_overspend() {
        let db = db();
        let mut serialized = caster(30.0);
        let mut ability = *serialized.abilities.get(AbilityHandle(1)).unwrap();
        ability.handle = AbilityHandle(3);
        ability.slot = None;
        serialized.abilities.grant(ability);
        let mut unbounded = serialized.clone();

        for entity in [&mut serialized, &mut unbounded] {
            activate(entity, 1);
            activate(entity, 3);
        }
        gate_abilities(&mut serialized, &db, ManaPolicy::Serialized, 0.0);
        gate_abilities(&mut unbounded, &db, ManaPolicy::Unbounded, 0.0);

        assert_eq!(serialized.mailbox.try_activate.len(), 1);
        assert_eq!(serialized.attributes.get(Attribute::Mana), 10.0);
        assert_eq!(unbounded.mailbox.try_activate.len(), 2);
        assert_eq!(unbounded.attributes.get(Attribute::Mana), -10.0);
    }

    #[test]
    fn effect_cooldown_queues_effect_on_self() {
        let db = db();
        let mut entity = caster(0.0);
        activate(&mut entity, 2);

        gate_abilities(&mut entity, &db, ManaPolicy::Serialized, 0.0);
        assert_eq!(entity.mailbox.try_activate.len(), 1);
        assert_eq!(entity.mailbox.apply_effect_by_id[0].effect_id, EffectId(2));
        assert_eq!(
            entity.abilities.get(AbilityHandle(2)).unwrap().cooldown_remaining,
            0.0
        );

        entity
            .tags
            .apply(&[db.tags().request(COOLDOWN).unwrap()], &[], |_, _| {});
        activate(&mut entity, 2);
        entity.mailbox.try_activate.remove(0);
        gate_abilities(&mut entity, &db, ManaPolicy::Serialized, 0.0);
        assert!(entity.mailbox.try_activate.is_empty());
    }

    #[test]
    fn slot_press_and_grant() {
        let db = db();
        let mut entity = EntityState::new(EntityId(1), AttributeSet::new());
        entity.mailbox.grant_ability.push(GrantAbility {
            ability_id: AbilityId(1),
            slot: Some(2),
        });
        entity.mailbox.grant_ability.push(GrantAbility {
            ability_id: AbilityId(99),
            slot: None,
        });

        assert_eq!(grant_abilities(&mut entity, &db), 2);
        assert_eq!(entity.abilities.len(), 1);
        assert!(entity.abilities.in_slot(2).unwrap().handle.is_pending());

        entity.mailbox.slot_pressed.push(crate::mailbox::SlotPressed {
            slot: 2,
            target: Some(EntityId(5)),
        });
        entity.mailbox.slot_pressed.push(crate::mailbox::SlotPressed {
            slot: 7,
            target: None,
        });
        translate_input(&mut entity);
        assert_eq!(entity.mailbox.try_activate.len(), 1);
        assert_eq!(entity.mailbox.try_activate[0].target, Some(EntityId(5)));
    }

    #[test]
    fn dispatch_routes_effects_to_resolved_target() {
        let db = db();
        let mut entity = caster(100.0);
        entity
            .mailbox
            .try_activate
            .push(TryActivateAbility::new(AbilityHandle(1)).at(EntityId(4)));
        let mut out = Outbox::default();

        assert_eq!(execute_abilities(&mut entity, &db, &mut out), 1);
        assert_eq!(out.requests().len(), 1);
        assert_eq!(out.requests()[0].0, EntityId(4));
        assert_eq!(
            entity.mailbox.events.last().unwrap().kind,
            GameplayEventKind::AbilityActivated
        );
    }
}
