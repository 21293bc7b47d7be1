//! Topic-based event bus for runtime events.
//!
//! The simulation drains the world's event and tag-change queues after every
//! step and publishes them here, so presentation, logging and AI consumers
//! subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{GameplayNotice, TagNotice};
