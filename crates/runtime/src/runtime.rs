//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up the command channel and
//! event bus, and exposes a builder-based API for clients to drive fixed
//! steps.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use gameplay_content::{ContentFactory, SimulationConfig};
use gameplay_core::{GameplayDatabase, TickReport, World};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::simulation::Simulation;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Directory holding `tags.ron`, `effects.ron`, `abilities.ron` and an
    /// optional `simulation.toml`. Loaded during [`RuntimeBuilder::build`].
    pub content_dir: Option<PathBuf>,
    pub simulation: SimulationConfig,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            simulation: SimulationConfig::default(),
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// `simulation.toml` inside the content directory is read first; the
    /// variables below override it.
    ///
    /// Environment variables:
    /// - `GAMEPLAY_CONTENT_DIR` - Content data directory (default: none)
    /// - `GAMEPLAY_FIXED_DT` - Seconds per step (default: 0.1)
    /// - `GAMEPLAY_PARALLEL` - Fan entity passes out on rayon (default: false)
    /// - `GAMEPLAY_EVENT_CAPACITY` - Broadcast buffer per topic (default: 1024)
    pub fn from_env() -> Self {
        Self::read_env(None)
    }

    /// Like [`from_env`](Self::from_env), but uses `content_dir` when
    /// `GAMEPLAY_CONTENT_DIR` is unset.
    pub fn from_env_or(content_dir: impl Into<PathBuf>) -> Self {
        Self::read_env(Some(content_dir.into()))
    }

    fn read_env(fallback_dir: Option<PathBuf>) -> Self {
        let mut config = Self {
            content_dir: env::var("GAMEPLAY_CONTENT_DIR")
                .ok()
                .map(PathBuf::from)
                .or(fallback_dir),
            ..Self::default()
        };

        if let Some(dir) = &config.content_dir {
            match ContentFactory::new(dir).load_config() {
                Ok(simulation) => config.simulation = simulation,
                Err(error) => {
                    tracing::warn!(
                        "ignoring simulation config in {}: {:#}",
                        dir.display(),
                        error
                    );
                }
            }
        }

        if let Some(dt) = read_env::<f32>("GAMEPLAY_FIXED_DT")
            && dt.is_finite()
            && dt > 0.0
        {
            config.simulation.fixed_dt = dt;
        }
        if let Some(parallel) = read_env::<bool>("GAMEPLAY_PARALLEL") {
            config.simulation.parallel = parallel;
        }
        if let Some(capacity) = read_env::<usize>("GAMEPLAY_EVENT_CAPACITY") {
            config.simulation.event_capacity = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Main runtime that orchestrates the gameplay simulation
///
/// Design: Runtime owns the worker and coordinates fixed steps.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    fixed_dt: f32,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Advance the world by one fixed step.
    pub async fn step(&self) -> Result<TickReport> {
        self.handle.step(self.fixed_dt).await
    }

    /// Advance the world by `ticks` fixed steps and return the last report.
    pub async fn run_for(&self, ticks: u64) -> Result<Option<TickReport>> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step().await?);
        }
        Ok(last)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding [`RuntimeHandle`] clone has
    /// been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<World>,
    database: Option<Arc<GameplayDatabase>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            database: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from an existing world instead of an empty one
    pub fn initial_world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Bind an already built database. Takes precedence over
    /// [`RuntimeConfig::content_dir`].
    pub fn database(mut self, database: Arc<GameplayDatabase>) -> Self {
        self.database = Some(database);
        self
    }

    /// Build the runtime
    ///
    /// Without a database or content directory the runtime starts unbound;
    /// bind one later with [`RuntimeHandle::load_database`].
    pub async fn build(self) -> Result<Runtime> {
        let simulation_config = &self.config.simulation;
        if !(simulation_config.fixed_dt.is_finite() && simulation_config.fixed_dt > 0.0) {
            return Err(RuntimeError::InvalidStep(simulation_config.fixed_dt));
        }

        let event_bus = EventBus::with_capacity(simulation_config.event_capacity);
        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let mut simulation = Simulation::new(simulation_config.gameplay())
            .with_bus(event_bus)
            .parallel(simulation_config.parallel);
        if let Some(world) = self.world {
            simulation = simulation.with_world(world);
        }
        let preloaded = self.database.is_some();
        if let Some(database) = self.database {
            simulation.set_database(database);
        }

        let sim_worker = SimulationWorker::new(simulation, command_rx);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        if !preloaded && let Some(dir) = &self.config.content_dir {
            handle.load_database(dir.clone()).await?;
        }

        tracing::info!(
            fixed_dt = simulation_config.fixed_dt,
            parallel = simulation_config.parallel,
            mana_policy = %simulation_config.mana_policy,
            "runtime started"
        );

        Ok(Runtime {
            handle,
            fixed_dt: simulation_config.fixed_dt,
            sim_worker_handle,
        })
    }
}
