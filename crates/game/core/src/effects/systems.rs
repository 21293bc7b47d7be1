use super::{ActiveEffect, EffectDefinition, EffectLifecycle};
use crate::database::GameplayDatabase;
use crate::event::{GameplayEvent, GameplayEventKind};
use crate::mailbox::{ApplyAttributeModifier, ApplyEffect};
use crate::state::{ChangeFlags, EffectHandle, EntityId, EntityState};
use crate::tags::TagId;

use super::StackingPolicy;

/// Turns `ApplyEffectById` requests into resolved `ApplyEffect` requests.
///
/// Unknown ids are dropped. Returns the number of requests consumed.
pub(crate) fn resolve_effect_requests(entity: &mut EntityState, db: &GameplayDatabase) -> usize {
    let requests = std::mem::take(&mut entity.mailbox.apply_effect_by_id);
    let consumed = requests.len();
    for request in requests {
        if db.effect(request.effect_id).is_none() {
            trace!("{}: unknown {} dropped", entity.id, request.effect_id);
            continue;
        }
        entity.mailbox.apply_effect.push(ApplyEffect {
            effect_id: request.effect_id,
            source: request.source,
            level: request.level,
        });
    }
    consumed
}

/// Runs the effect pass for one entity: applies, explicit removals,
/// cleanses, then timers. All three effect queues are empty afterwards.
pub(crate) fn run_effect_pass(entity: &mut EntityState, db: &GameplayDatabase, dt: f32) -> usize {
    let applies = std::mem::take(&mut entity.mailbox.apply_effect);
    let removals = std::mem::take(&mut entity.mailbox.remove_effect);
    let cleanses = std::mem::take(&mut entity.mailbox.remove_effects_with_tag);
    let consumed = applies.len() + removals.len() + cleanses.len();

    for request in &applies {
        apply_effect(entity, db, request);
    }
    for handle in removals {
        remove_effect(entity, db, handle);
    }
    for tag in cleanses {
        remove_effects_with_tag(entity, db, tag);
    }
    tick_effects(entity, db, dt);

    consumed
}

/// Applies one effect to `entity`.
///
/// Returns `None` when nothing happened (unknown id or immunity), otherwise
/// whether the application was a one-shot or left a tracked instance.
pub fn apply_effect(
    entity: &mut EntityState,
    db: &GameplayDatabase,
    request: &ApplyEffect,
) -> Option<EffectLifecycle> {
    let def = db.effect(request.effect_id)?;

    if def.blocked_by_tag.is_valid()
        && let Some(mask) = db.tags().own_mask_of(def.blocked_by_tag)
        && entity.tags.has_tag(&mask)
    {
        trace!("{}: immune to {}", entity.id, def.id);
        return None;
    }

    entity.mailbox.events.push(
        GameplayEvent::new(
            GameplayEventKind::EffectApplied,
            request.source,
            entity.id,
            def.id.0,
        )
        .with_magnitude(request.level as f32),
    );

    // Every successful apply of a non-periodic effect lands its modifiers
    // once, merged or not.
    if !def.is_periodic {
        queue_modifiers(entity, def, request.source, 1);
    }

    if !def.is_tracked() {
        grant_tag(entity, db, def.granted_tag);
        return Some(EffectLifecycle::Instant);
    }

    // A merge keeps the tag reference count at one per instance, so the
    // single RemoveTag at expiry balances it.
    if def.stacking_policy != StackingPolicy::None
        && merge_into_existing(entity, def, request.source)
    {
        entity.changes |= ChangeFlags::EFFECTS;
        return Some(EffectLifecycle::Active);
    }

    grant_tag(entity, db, def.granted_tag);
    entity.effects.push(ActiveEffect {
        handle: EffectHandle::PENDING,
        effect_id: def.id,
        level: request.level,
        source: request.source,
        remaining_time: if def.is_permanent { 0.0 } else { def.duration },
        time_to_next_tick: if def.is_periodic { def.period } else { 0.0 },
        stack_count: 1,
    });
    entity.changes |= ChangeFlags::EFFECTS;
    Some(EffectLifecycle::Active)
}

/// Folds a reapplication into the first instance of the same effect.
///
/// A gained additive stack lands the modifiers one extra time on top of the
/// apply itself. Returns false when no instance exists and a new one must be
/// created.
fn merge_into_existing(entity: &mut EntityState, def: &EffectDefinition, source: EntityId) -> bool {
    let Some(existing) = entity.effects.find_mut(def.id) else {
        return false;
    };

    match def.stacking_policy {
        StackingPolicy::RefreshDuration => {
            if !def.is_permanent {
                existing.remaining_time = def.duration;
            }
        }
        StackingPolicy::StackAdditive => {
            let gained = existing.stack_count < def.max_stacks;
            if gained {
                existing.stack_count += 1;
            }
            if !def.is_permanent {
                existing.remaining_time = def.duration;
            }
            if gained {
                let stacks = existing.stack_count;
                if !def.is_periodic {
                    queue_modifiers(entity, def, source, 1);
                }
                entity.mailbox.events.push(
                    GameplayEvent::new(
                        GameplayEventKind::EffectStacked,
                        source,
                        entity.id,
                        def.id.0,
                    )
                    .with_magnitude(stacks as f32),
                );
            }
        }
        StackingPolicy::None => return false,
    }
    true
}

fn remove_effect(entity: &mut EntityState, db: &GameplayDatabase, handle: EffectHandle) {
    // Unsealed instances from this pass are not addressable yet.
    if handle.is_pending() {
        trace!("{}: pending handle ignored", entity.id);
        return;
    }
    let Some(index) = entity.effects.position(handle) else {
        trace!("{}: no effect with {}", entity.id, handle);
        return;
    };
    let removed = entity.effects.remove(index);
    if let Some(def) = db.effect(removed.effect_id) {
        revoke_tag(entity, db, def.granted_tag);
    }
    end_instance(entity, &removed, EffectLifecycle::RemovedExplicit);
}

fn remove_effects_with_tag(entity: &mut EntityState, db: &GameplayDatabase, tag: TagId) {
    if !tag.is_valid() {
        return;
    }
    let mut index = entity.effects.len();
    while index > 0 {
        index -= 1;
        let effect_id = entity.effects.as_slice()[index].effect_id;
        let matches = db
            .effect(effect_id)
            .is_some_and(|def| def.granted_tag == tag);
        if !matches {
            continue;
        }
        let removed = entity.effects.remove(index);
        revoke_tag(entity, db, tag);
        end_instance(entity, &removed, EffectLifecycle::RemovedByTag);
    }
}

/// Advances every timer by `dt`, firing periodic ticks and expiring
/// finished instances. Iterates newest first.
fn tick_effects(entity: &mut EntityState, db: &GameplayDatabase, dt: f32) {
    let mut index = entity.effects.len();
    while index > 0 {
        index -= 1;
        let effect = entity.effects.instances_mut()[index];
        let Some(def) = db.effect(effect.effect_id) else {
            entity.effects.remove(index);
            entity.changes |= ChangeFlags::EFFECTS;
            continue;
        };

        let mut updated = effect;
        if def.is_periodic && def.period > 0.0 {
            updated.time_to_next_tick -= dt;
            while updated.time_to_next_tick <= 0.0 {
                queue_modifiers(entity, def, effect.source, effect.stack_count);
                updated.time_to_next_tick += def.period;
            }
        }

        if !def.is_permanent {
            updated.remaining_time -= dt;
            if updated.remaining_time <= 0.0 {
                entity.effects.remove(index);
                revoke_tag(entity, db, def.granted_tag);
                if !def.is_periodic && def.revert_on_end {
                    revert_modifiers(entity, def, effect.source, effect.stack_count);
                }
                end_instance(entity, &updated, EffectLifecycle::Expired);
                continue;
            }
        }

        entity.effects.instances_mut()[index] = updated;
    }
}

fn queue_modifiers(entity: &mut EntityState, def: &EffectDefinition, source: EntityId, stacks: u32) {
    entity
        .mailbox
        .attribute_modifiers
        .extend(def.modifiers.iter().map(|modifier| ApplyAttributeModifier {
            source,
            modifier: modifier.scaled(stacks),
        }));
}

fn revert_modifiers(entity: &mut EntityState, def: &EffectDefinition, source: EntityId, stacks: u32) {
    entity.mailbox.attribute_modifiers.extend(
        def.modifiers
            .iter()
            .filter_map(|modifier| modifier.scaled(stacks).inverse())
            .map(|modifier| ApplyAttributeModifier { source, modifier }),
    );
}

fn grant_tag(entity: &mut EntityState, db: &GameplayDatabase, tag: TagId) {
    if let Some(request) = tag.is_valid().then(|| db.tags().request(tag)).flatten() {
        entity.mailbox.add_tag.push(request);
    }
}

fn revoke_tag(entity: &mut EntityState, db: &GameplayDatabase, tag: TagId) {
    if let Some(request) = tag.is_valid().then(|| db.tags().request(tag)).flatten() {
        entity.mailbox.remove_tag.push(request);
    }
}

fn end_instance(entity: &mut EntityState, effect: &ActiveEffect, how: EffectLifecycle) {
    let kind = match how {
        EffectLifecycle::Expired => GameplayEventKind::EffectExpired,
        _ => GameplayEventKind::EffectRemoved,
    };
    entity.mailbox.events.push(GameplayEvent::new(
        kind,
        effect.source,
        entity.id,
        effect.effect_id.0,
    ));
    entity.changes |= ChangeFlags::EFFECTS;
}
