use crate::event::TagChange;
use crate::mailbox::Request;
use crate::state::{EntityId, Projectile, World};

/// Cross-entity writes produced by one entity during one pass.
///
/// Outboxes are routed after the pass barrier in ascending source order,
/// so delivery order never depends on how the pass was scheduled.
#[derive(Debug, Default)]
pub struct Outbox {
    requests: Vec<(EntityId, Request)>,
    projectiles: Vec<Projectile>,
    tag_changes: Vec<TagChange>,
}

impl Outbox {
    pub fn send(&mut self, target: EntityId, request: Request) {
        self.requests.push((target, request));
    }

    pub fn launch(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn notify(&mut self, change: TagChange) {
        self.tag_changes.push(change);
    }

    pub fn requests(&self) -> &[(EntityId, Request)] {
        &self.requests
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.projectiles.is_empty() && self.tag_changes.is_empty()
    }
}

/// Delivers every outbox into the world. Returns the number of requests
/// delivered; requests for entities that no longer exist are dropped.
pub(crate) fn route(world: &mut World, outboxes: Vec<Outbox>) -> usize {
    let mut delivered = 0;
    for outbox in outboxes {
        for (target, request) in outbox.requests {
            match world.entities.get_mut(&target) {
                Some(entity) => {
                    entity.mailbox.push(request);
                    delivered += 1;
                }
                None => trace!("dropped request for missing entity {}", target),
            }
        }
        for mut projectile in outbox.projectiles {
            projectile.id = world.handles.next_value();
            projectile.launched_tick = world.tick;
            world.projectiles.push(projectile);
        }
        world.tag_changes.extend(outbox.tag_changes);
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EffectHandle, EntitySpec};

    #[test]
    fn routing_skips_missing_targets() {
        let mut world = World::new();
        let alive = world.spawn(EntitySpec::default());

        let mut outbox = Outbox::default();
        outbox.send(alive, Request::RemoveEffect(EffectHandle(1)));
        outbox.send(EntityId(42), Request::RemoveEffect(EffectHandle(2)));

        assert_eq!(route(&mut world, vec![outbox]), 1);
        assert_eq!(world.entity(alive).unwrap().mailbox.remove_effect, vec![EffectHandle(1)]);
    }
}
