//! Passes that do not belong to the effect or ability runtimes.

use super::Outbox;
use crate::attributes::{Attribute, AttributeAggregator};
use crate::event::{GameplayEvent, GameplayEventKind, TagChange};
use crate::mailbox::ApplyEffectById;
use crate::state::{ChangeFlags, EntityState, World};

/// Applies queued tag adds then removes and refreshes the masks.
pub(crate) fn apply_tag_requests(entity: &mut EntityState, out: &mut Outbox) -> usize {
    let adds = std::mem::take(&mut entity.mailbox.add_tag);
    let removes = std::mem::take(&mut entity.mailbox.remove_tag);
    if adds.is_empty() && removes.is_empty() {
        return 0;
    }

    let id = entity.id;
    let mut changed = false;
    entity.tags.apply(&adds, &removes, |kind, tag_mask| {
        changed = true;
        out.notify(TagChange {
            entity: id,
            tag_mask,
            kind,
        });
    });
    if changed {
        entity.changes |= ChangeFlags::TAGS;
    }
    adds.len() + removes.len()
}

/// Runs every queued modifier through the aggregator in FIFO order.
pub(crate) fn apply_attribute_modifiers(
    entity: &mut EntityState,
    aggregator: &dyn AttributeAggregator,
) -> usize {
    let requests = std::mem::take(&mut entity.mailbox.attribute_modifiers);
    for request in &requests {
        let modifier = &request.modifier;
        let (old, new) = aggregator.apply(&mut entity.attributes, modifier);
        if old == new {
            continue;
        }
        entity.changes |= ChangeFlags::ATTRIBUTES;
        entity.mailbox.events.push(
            GameplayEvent::new(
                GameplayEventKind::AttributeChanged,
                request.source,
                entity.id,
                modifier.attribute.index() as u32,
            )
            .with_magnitude(new),
        );
        if modifier.attribute == Attribute::Health && new < old {
            entity.mailbox.events.push(
                GameplayEvent::new(
                    GameplayEventKind::DamageTaken,
                    request.source,
                    entity.id,
                    modifier.damage_type as u32,
                )
                .with_magnitude(old - new),
            );
        }
    }
    requests.len()
}

/// Advances projectile timers and delivers the ones that arrive.
///
/// Projectiles launched this tick are left alone. A projectile whose target
/// is gone is discarded without applying anything.
pub(crate) fn advance_projectiles(world: &mut World, dt: f32) -> usize {
    let tick = world.tick;
    let mut landed = 0;
    for mut projectile in std::mem::take(&mut world.projectiles) {
        if projectile.launched_tick != tick {
            projectile.remaining_flight_time -= dt;
        }
        if projectile.launched_tick == tick || projectile.remaining_flight_time > 0.0 {
            world.projectiles.push(projectile);
            continue;
        }

        landed += 1;
        let Some(target) = world.entities.get_mut(&projectile.target) else {
            trace!("projectile {} lost its target {}", projectile.id, projectile.target);
            continue;
        };
        for effect_id in projectile.effects() {
            target.mailbox.apply_effect_by_id.push(ApplyEffectById {
                effect_id,
                source: projectile.source,
                level: 1,
            });
        }
        target.mailbox.events.push(GameplayEvent::new(
            GameplayEventKind::ProjectileHit,
            projectile.source,
            projectile.target,
            projectile.primary_effect_id.0,
        ));
    }
    landed
}

/// Moves every entity's pending events onto the world queue, in entity order.
pub(crate) fn dispatch_events(world: &mut World) -> usize {
    let before = world.events.len();
    for entity in world.entities.values_mut() {
        world.events.append(&mut entity.mailbox.events);
    }
    world.events.len() - before
}
