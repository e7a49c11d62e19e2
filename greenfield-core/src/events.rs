use greenfield_shared::models::DomainEvent;

/// Where services announce committed state changes. Publishing never fails the
/// operation that produced the event.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: DomainEvent);
}
