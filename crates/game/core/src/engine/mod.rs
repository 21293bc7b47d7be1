//! The per-tick pipeline.
//!
//! [`GameplayEngine`] borrows a [`World`] and runs the [`Pass`]es of one step
//! in their fixed order. Per-entity passes touch only the entity they are
//! given and write everything aimed at another entity into an [`Outbox`];
//! outboxes are routed between passes. Pending handles are sealed at the
//! barrier after every pass that can create them, so a step produces the
//! same world whether entities were processed serially or in parallel.

mod outbox;
mod pass;
mod systems;

pub use outbox::Outbox;
pub use pass::Pass;

use crate::abilities;
use crate::attributes::{AttributeAggregator, DefaultAggregator};
use crate::config::GameplayConfig;
use crate::database::GameplayDatabase;
use crate::effects;
use crate::state::{ChangeFlags, EntityId, EntityState, World};

static DEFAULT_CONFIG: GameplayConfig = GameplayConfig::new();
static DEFAULT_AGGREGATOR: DefaultAggregator = DefaultAggregator;

/// Summary of one [`GameplayEngine::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub tick: u64,
    /// Requests consumed across all passes.
    pub consumed: usize,
    /// Events added to the world queue.
    pub events: usize,
    /// Tag notifications added to the world queue.
    pub tag_changes: usize,
}

/// Runs simulation steps against a borrowed world.
///
/// Without a database only the passes that do not read definitions run;
/// everything else waits in its mailbox.
pub struct GameplayEngine<'a> {
    world: &'a mut World,
    database: Option<&'a GameplayDatabase>,
    config: &'a GameplayConfig,
    aggregator: &'a dyn AttributeAggregator,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl<'a> GameplayEngine<'a> {
    pub fn new(world: &'a mut World, database: Option<&'a GameplayDatabase>) -> Self {
        Self {
            world,
            database,
            config: &DEFAULT_CONFIG,
            aggregator: &DEFAULT_AGGREGATOR,
            parallel: false,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: &'a GameplayConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_aggregator(mut self, aggregator: &'a dyn AttributeAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Fans per-entity passes out over the rayon pool. Ignored unless the
    /// `parallel` feature is enabled.
    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn world(&self) -> &World {
        self.world
    }

    /// Advances the world by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> TickReport {
        self.world.tick += 1;
        for entity in self.world.entities.values_mut() {
            entity.changes = ChangeFlags::empty();
        }
        let tick = self.world.tick;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("tick", tick).entered();

        let events_before = self.world.events.len();
        let tag_changes_before = self.world.tag_changes.len();
        let consumed: usize = Pass::ORDER
            .into_iter()
            .map(|pass| self.run_pass(pass, dt))
            .sum();

        TickReport {
            tick,
            consumed,
            events: self.world.events.len() - events_before,
            tag_changes: self.world.tag_changes.len() - tag_changes_before,
        }
    }

    /// Runs a single pass over the whole world and returns the number of
    /// requests it consumed.
    ///
    /// [`step`](Self::step) calls this for every entry of [`Pass::ORDER`];
    /// calling it directly lets tests and tools stop between passes.
    pub fn run_pass(&mut self, pass: Pass, dt: f32) -> usize {
        let policy = self.config.mana_policy;
        let aggregator = self.aggregator;

        // Passes that read definitions match on `Some(db)` only; without a
        // database their queues stay untouched until one is bound.
        let consumed = match (pass, self.database) {
            (Pass::Input, _) => self.for_each_entity(|entity, _| abilities::translate_input(entity)),
            (Pass::Grant, Some(db)) => {
                self.for_each_entity(|entity, _| abilities::grant_abilities(entity, db))
            }
            (Pass::Gate, Some(db)) => self.for_each_entity(|entity, _| {
                abilities::gate_abilities(entity, db, policy, dt)
            }),
            (Pass::Execute, Some(db)) => self.for_each_entity(|entity, out| {
                abilities::execute_abilities(entity, db, out)
            }),
            (Pass::Projectiles, _) => systems::advance_projectiles(self.world, dt),
            (Pass::ResolveEffects, Some(db)) => {
                self.for_each_entity(|entity, _| effects::resolve_effect_requests(entity, db))
            }
            (Pass::Effects, Some(db)) => {
                self.for_each_entity(|entity, _| effects::run_effect_pass(entity, db, dt))
            }
            (Pass::Tags, _) => self.for_each_entity(systems::apply_tag_requests),
            (Pass::Attributes, _) => self.for_each_entity(|entity, _| {
                systems::apply_attribute_modifiers(entity, aggregator)
            }),
            (Pass::Events, _) => systems::dispatch_events(self.world),
            (_, None) => {
                trace!("{} skipped: no database bound", pass);
                return 0;
            }
        };

        if pass.creates_handles() {
            self.world.seal_handles();
        }
        trace!("{}: consumed {}", pass, consumed);
        consumed
    }

    /// Runs `f` once per entity, then routes the outboxes in entity order.
    fn for_each_entity<F>(&mut self, f: F) -> usize
    where
        F: Fn(&mut EntityState, &mut Outbox) -> usize + Send + Sync,
    {
        let run = |entity: &mut EntityState| {
            let mut out = Outbox::default();
            let consumed = f(entity, &mut out);
            (entity.id, consumed, out)
        };

        let mut results: Vec<(EntityId, usize, Outbox)> = self.collect(run);
        results.sort_unstable_by_key(|(id, _, _)| *id);

        let consumed: usize = results.iter().map(|(_, consumed, _)| consumed).sum();
        let outboxes = results
            .into_iter()
            .map(|(_, _, out)| out)
            .filter(|out| !out.is_empty())
            .collect();
        outbox::route(self.world, outboxes);
        consumed
    }

    #[cfg(feature = "parallel")]
    fn collect<R, G>(&mut self, run: G) -> Vec<R>
    where
        R: Send,
        G: Fn(&mut EntityState) -> R + Send + Sync,
    {
        use rayon::prelude::*;

        if self.parallel {
            self.world
                .entities
                .par_iter_mut()
                .map(|(_, entity)| run(entity))
                .collect()
        } else {
            self.world.entities.values_mut().map(run).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn collect<R, G>(&mut self, run: G) -> Vec<R>
    where
        G: Fn(&mut EntityState) -> R,
    {
        self.world.entities.values_mut().map(run).collect()
    }
}
