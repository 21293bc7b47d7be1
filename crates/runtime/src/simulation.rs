//! Owned simulation: a [`World`], its late-bound database and an event bus.
//!
//! [`GameplayEngine`] borrows everything it needs for one step; `Simulation`
//! is the thing that owns those borrows between steps, and the place where the
//! world's event queues are drained onto the bus.

use std::sync::Arc;

use gameplay_core::{
    EntityId, EntitySpec, EntityState, GameplayConfig, GameplayDatabase, GameplayEngine, Request,
    TickReport, World,
};

use crate::events::{Event, EventBus, GameplayNotice, TagNotice};

pub struct Simulation {
    world: World,
    database: Option<Arc<GameplayDatabase>>,
    config: GameplayConfig,
    parallel: bool,
    bus: EventBus,
}

impl Simulation {
    pub fn new(config: GameplayConfig) -> Self {
        Self {
            world: World::new(),
            database: None,
            config,
            parallel: false,
            bus: EventBus::new(),
        }
    }

    /// Publishes onto `bus` instead of a private one.
    #[must_use]
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    /// Starts from an existing world, e.g. one restored for replay.
    #[must_use]
    pub fn with_world(mut self, world: World) -> Self {
        self.world = world;
        self
    }

    /// Requests rayon fan-out. Only effective with the `parallel` feature.
    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Binds (or replaces) the database. Requests that waited in mailboxes
    /// while none was bound are processed by the next step.
    pub fn set_database(&mut self, database: Arc<GameplayDatabase>) {
        tracing::info!(
            tick = self.world.tick(),
            effects = database.effects().count(),
            abilities = database.abilities().count(),
            "gameplay database bound"
        );
        self.database = Some(database);
    }

    pub fn has_database(&self) -> bool {
        self.database.is_some()
    }

    pub fn database(&self) -> Option<&Arc<GameplayDatabase>> {
        self.database.as_ref()
    }

    pub fn config(&self) -> &GameplayConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tick(&self) -> u64 {
        self.world.tick()
    }

    pub fn spawn(&mut self, spec: EntitySpec) -> EntityId {
        let id = self.world.spawn(spec);
        tracing::debug!(entity = %id, "entity spawned");
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<EntityState> {
        let removed = self.world.despawn(id);
        if removed.is_some() {
            tracing::debug!(entity = %id, "entity despawned");
        }
        removed
    }

    pub fn entity(&self, id: EntityId) -> Option<&EntityState> {
        self.world.entity(id)
    }

    /// Queues `request` for `entity`. Returns false when it does not exist.
    pub fn submit(&mut self, entity: EntityId, request: Request) -> bool {
        let accepted = self.world.submit(entity, request);
        if !accepted {
            tracing::debug!(entity = %entity, "request for missing entity dropped");
        }
        accepted
    }

    /// Runs one step of `dt` seconds and publishes everything it produced.
    pub fn step(&mut self, dt: f32) -> TickReport {
        let report = GameplayEngine::new(&mut self.world, self.database.as_deref())
            .with_config(&self.config)
            .parallel(self.parallel)
            .step(dt);

        tracing::trace!(
            tick = report.tick,
            consumed = report.consumed,
            events = report.events,
            tag_changes = report.tag_changes,
            "step complete"
        );
        self.publish(report);
        report
    }

    pub fn state_root(&self) -> [u8; 32] {
        self.world.state_root()
    }

    fn publish(&mut self, report: TickReport) {
        let tick = report.tick;
        for event in self.world.drain_events() {
            self.bus.publish(Event::Gameplay(GameplayNotice { tick, event }));
        }
        for change in self.world.drain_tag_changes() {
            self.bus.publish(Event::Tag(TagNotice { tick, change }));
        }
        self.bus.publish(Event::Tick(report));
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(GameplayConfig::default())
    }
}
