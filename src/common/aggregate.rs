use crate::common::DomainEvent;

/// An entity that records the events caused by its commands until the owner collects them.
pub trait AggregateRoot: Send + Sync {
    type Event: DomainEvent;

    fn aggregate_id(&self) -> String;

    /// Get uncommitted events
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Remove and return the uncommitted events in the order they were raised
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;

    /// Add a new event to the uncommitted events list
    fn add_event(&mut self, event: Self::Event);
}
