use chrono::{DateTime, Utc};

pub trait DomainEvent: Send + Sync + Clone {
    fn event_type(&self) -> &'static str;
    /// Identifier of the entity the event belongs to ("simulation" for coordinator-level events).
    fn aggregate_id(&self) -> String;
    fn occurred_at(&self) -> DateTime<Utc>;
}
