//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping the simulation or streaming events from specific topics.
use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc, oneshot};

use gameplay_core::{EntityId, EntitySpec, EntityState, Request, TickReport};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queue a request in `entity`'s mailbox; it is processed by the next step.
    pub async fn submit(&self, entity: EntityId, request: Request) -> Result<()> {
        self.request(|reply| Command::Submit {
            entity,
            request,
            reply,
        })
        .await?
    }

    /// Advance the world by `dt` seconds.
    pub async fn step(&self, dt: f32) -> Result<TickReport> {
        self.request(|reply| Command::Step { dt, reply }).await?
    }

    pub async fn spawn_entity(&self, spec: EntitySpec) -> Result<EntityId> {
        self.request(|reply| Command::Spawn { spec, reply }).await
    }

    pub async fn despawn_entity(&self, entity: EntityId) -> Result<Option<EntityState>> {
        self.request(|reply| Command::Despawn { entity, reply }).await
    }

    /// Clone of one entity as of the last completed command.
    pub async fn entity_snapshot(&self, entity: EntityId) -> Result<EntityState> {
        self.request(|reply| Command::Snapshot { entity, reply })
            .await?
            .ok_or(RuntimeError::UnknownEntity(entity))
    }

    /// SHA-256 digest of the whole world.
    pub async fn state_root(&self) -> Result<[u8; 32]> {
        self.request(|reply| Command::StateRoot { reply }).await
    }

    /// Load content from `data_dir` and bind it. On failure the previously
    /// bound database (if any) stays in place.
    pub async fn load_database(&self, data_dir: impl Into<PathBuf>) -> Result<()> {
        let data_dir = data_dir.into();
        self.request(|reply| Command::LoadDatabase { data_dir, reply })
            .await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Gameplay` - Effect, ability, projectile and attribute events
    /// - `Topic::Tags` - Tag entries created or destroyed
    /// - `Topic::Tick` - One summary per completed step
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use gameplay_runtime::Topic;
    ///
    /// let mut tags = handle.subscribe(Topic::Tags);
    /// while let Ok(event) = tags.recv().await {
    ///     // mirror tag changes into the presentation layer
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
