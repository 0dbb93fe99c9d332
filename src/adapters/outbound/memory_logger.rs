use crate::domains::logger::DomainLogger;
use std::sync::{Arc, Mutex};

/// Keeps every message in memory, tagged with its level. Handy for asserting on log output.
#[derive(Default)]
pub struct MemoryLogger {
    messages: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    fn push(&self, level: &str, msg: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(format!("{}:{}", level, msg));
        }
    }
}

impl DomainLogger for MemoryLogger {
    fn info(&self, msg: &str) {
        self.push("INFO", msg);
    }

    fn warn(&self, msg: &str) {
        self.push("WARN", msg);
    }

    fn error(&self, msg: &str) {
        self.push("ERR", msg);
    }
}

struct NoOp;

impl DomainLogger for NoOp {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Logger that drops everything; the default for coordinators built in tests.
pub fn init_noop_logger() -> Arc<dyn DomainLogger> {
    Arc::new(NoOp)
}
