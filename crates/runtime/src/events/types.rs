//! Event payloads for the bus topics.

use gameplay_core::{GameplayEvent, TagChange};
use serde::{Deserialize, Serialize};

/// A core gameplay event stamped with the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameplayNotice {
    pub tick: u64,
    pub event: GameplayEvent,
}

/// A tag entry created or destroyed during `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNotice {
    pub tick: u64,
    pub change: TagChange,
}
