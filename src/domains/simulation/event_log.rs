use super::events::SimulationEvent;
use crate::common::DomainEvent;
use crate::domains::logger::DynLogger;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub message: String,
    pub event: SimulationEvent,
}

/// Append-only record of simulation events, in the order their triggers happened.
///
/// Entries are mirrored to the injected [`DomainLogger`](crate::domains::logger::DomainLogger)
/// as they are appended.
pub struct EventLog {
    entries: Vec<LogEntry>,
    logger: Option<DynLogger>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            logger: None,
        }
    }

    pub fn with_logger(logger: DynLogger) -> Self {
        Self {
            entries: Vec::new(),
            logger: Some(logger),
        }
    }

    pub fn append(&mut self, event: SimulationEvent) -> u64 {
        let sequence = self.entries.len() as u64;
        let message = event.to_string();

        if let Some(logger) = &self.logger {
            match &event {
                SimulationEvent::NoRouteFound { .. } | SimulationEvent::AgentHalted { .. } => {
                    logger.warn(&message)
                }
                _ => logger.info(&message),
            }
        }

        self.entries.push(LogEntry {
            sequence,
            recorded_at: Utc::now(),
            message,
            event,
        });
        sequence
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.message.as_str())
    }

    /// Entries of one event type, e.g. `"RerouteTriggered"`.
    pub fn of_type<'a>(&'a self, event_type: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.event.event_type() == event_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
