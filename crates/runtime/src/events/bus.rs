//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{GameplayNotice, TagNotice};
use gameplay_core::TickReport;

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Effect, ability, projectile and attribute events
    Gameplay,
    /// Tag entries created or destroyed
    Tags,
    /// One summary per completed step
    Tick,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Gameplay(GameplayNotice),
    Tag(TagNotice),
    Tick(TickReport),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Gameplay(_) => Topic::Gameplay,
            Event::Tag(_) => Topic::Tags,
            Event::Tick(_) => Topic::Tick,
        }
    }
}

struct Channels {
    gameplay: broadcast::Sender<Event>,
    tags: broadcast::Sender<Event>,
    tick: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Gameplay => &self.gameplay,
            Topic::Tags => &self.tags,
            Topic::Tick => &self.tick,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks: slow subscribers lag and
/// see [`broadcast::error::RecvError::Lagged`].
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                gameplay: broadcast::channel(capacity).0,
                tags: broadcast::channel(capacity).0,
                tick: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Number of live receivers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gameplay_core::{EntityId, GameplayEvent, GameplayEventKind};

    fn notice(tick: u64) -> Event {
        Event::Gameplay(GameplayNotice {
            tick,
            event: GameplayEvent::new(
                GameplayEventKind::EffectApplied,
                EntityId(1),
                EntityId(2),
                7,
            ),
        })
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut gameplay = bus.subscribe(Topic::Gameplay);
        let mut ticks = bus.subscribe(Topic::Tick);

        bus.publish(notice(1));
        bus.publish(Event::Tick(TickReport {
            tick: 1,
            ..TickReport::default()
        }));

        assert!(matches!(gameplay.recv().await, Ok(Event::Gameplay(n)) if n.tick == 1));
        assert!(matches!(ticks.recv().await, Ok(Event::Tick(r)) if r.tick == 1));
        assert!(gameplay.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(Topic::Tags), 0);
        bus.publish(notice(3));
    }

    #[test]
    fn clones_share_channels() {
        let bus = EventBus::new();
        let _rx = bus.clone().subscribe_multiple(&[Topic::Gameplay, Topic::Tags]);
        assert_eq!(bus.subscriber_count(Topic::Gameplay), 1);
        assert_eq!(bus.subscriber_count(Topic::Tags), 1);
    }
}
