use greenfield_core::events::EventSink;
use greenfield_shared::models::DomainEvent;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// In-process domain event fan-out. Every event is logged with its topic and
/// key; subscribers get a copy if they keep up with the channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

impl EventSink for EventBus {
    fn publish(&self, event: DomainEvent) {
        info!(topic = event.topic(), key = event.key(), "Published domain event");
        if let Ok(payload) = serde_json::to_string(&event) {
            debug!("Event payload: {}", payload);
        }
        // Err only means there are no receivers.
        let _ = self.tx.send(event);
    }
}
