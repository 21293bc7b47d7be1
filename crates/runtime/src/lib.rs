//! Async orchestration for the gameplay simulation.
//!
//! Modules:
//! - [`simulation`] owns the world, its late-bound database and the event bus
//! - [`workers`] runs the simulation on a background task fed by commands
//! - [`api`] exposes the cloneable [`RuntimeHandle`] and runtime errors
//! - [`events`] provides the topic-based [`EventBus`]
//! - [`runtime`] wires everything together behind [`RuntimeBuilder`]
//!
//! ```rust,ignore
//! let runtime = Runtime::builder()
//!     .config(RuntimeConfig::from_env())
//!     .build()
//!     .await?;
//! let handle = runtime.handle();
//! let hero = handle.spawn_entity(spec).await?;
//! handle.submit(hero, Request::SlotPressed(SlotPressed { slot: 0, target: None })).await?;
//! runtime.step().await?;
//! ```

pub mod api;
pub mod events;
pub mod runtime;
pub mod simulation;
pub mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, GameplayNotice, TagNotice, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use simulation::Simulation;
pub use workers::{Command, SimulationWorker};
