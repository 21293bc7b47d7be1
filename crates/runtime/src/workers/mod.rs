//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the [`Simulation`](crate::Simulation) and
//! executes commands one at a time, so every step sees a consistent world.

mod simulation;

pub use simulation::{Command, SimulationWorker};
