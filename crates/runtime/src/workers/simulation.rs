//! Simulation worker that owns the authoritative [`Simulation`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! against the world in arrival order and answers over `oneshot` replies.
//! Step output reaches subscribers through the simulation's event bus.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use gameplay_content::ContentFactory;
use gameplay_core::{EntityId, EntitySpec, EntityState, Request, TickReport};

use crate::api::{Result, RuntimeError};
use crate::simulation::Simulation;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Queue a request in an entity's mailbox.
    Submit {
        entity: EntityId,
        request: Request,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Advance the world by `dt` seconds.
    Step {
        dt: f32,
        reply: oneshot::Sender<Result<TickReport>>,
    },
    Spawn {
        spec: EntitySpec,
        reply: oneshot::Sender<EntityId>,
    },
    Despawn {
        entity: EntityId,
        reply: oneshot::Sender<Option<EntityState>>,
    },
    /// Clone of one entity (read-only).
    Snapshot {
        entity: EntityId,
        reply: oneshot::Sender<Option<EntityState>>,
    },
    StateRoot {
        reply: oneshot::Sender<[u8; 32]>,
    },
    /// Load content from a data directory and bind the resulting database.
    LoadDatabase {
        data_dir: PathBuf,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Background task that processes simulation commands.
pub struct SimulationWorker {
    simulation: Simulation,
    command_rx: mpsc::Receiver<Command>,
}

impl SimulationWorker {
    pub fn new(simulation: Simulation, command_rx: mpsc::Receiver<Command>) -> Self {
        Self {
            simulation,
            command_rx,
        }
    }

    /// Main worker loop. Ends once every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }
        debug!(
            target: "runtime::worker",
            tick = self.simulation.tick(),
            "command channel closed, simulation worker stopping"
        );
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit {
                entity,
                request,
                reply,
            } => {
                let result = if self.simulation.submit(entity, request) {
                    Ok(())
                } else {
                    Err(RuntimeError::UnknownEntity(entity))
                };
                let _ = reply.send(result);
            }
            Command::Step { dt, reply } => {
                let _ = reply.send(self.step(dt));
            }
            Command::Spawn { spec, reply } => {
                let _ = reply.send(self.simulation.spawn(spec));
            }
            Command::Despawn { entity, reply } => {
                let _ = reply.send(self.simulation.despawn(entity));
            }
            Command::Snapshot { entity, reply } => {
                let _ = reply.send(self.simulation.entity(entity).cloned());
            }
            Command::StateRoot { reply } => {
                let _ = reply.send(self.simulation.state_root());
            }
            Command::LoadDatabase { data_dir, reply } => {
                let result = self.load_database(data_dir).await;
                let _ = reply.send(result);
            }
        }
    }

    fn step(&mut self, dt: f32) -> Result<TickReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(RuntimeError::InvalidStep(dt));
        }
        Ok(self.simulation.step(dt))
    }

    async fn load_database(&mut self, data_dir: PathBuf) -> Result<()> {
        let dir = data_dir.clone();
        let loaded = tokio::task::spawn_blocking(move || ContentFactory::new(dir).load_database())
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        match loaded {
            Ok(database) => {
                info!(
                    target: "runtime::worker",
                    dir = %data_dir.display(),
                    tick = self.simulation.tick(),
                    "content loaded"
                );
                self.simulation.set_database(Arc::new(database));
                Ok(())
            }
            Err(error) => {
                warn!(
                    target: "runtime::worker",
                    dir = %data_dir.display(),
                    error = %error,
                    "content load failed; keeping previous database"
                );
                Err(RuntimeError::content(data_dir, error))
            }
        }
    }
}
