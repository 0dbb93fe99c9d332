use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Forwards every message to each attached sink, in attachment order.
pub struct FanoutLogger {
    sinks: Vec<Arc<dyn DomainLogger>>,
}

impl FanoutLogger {
    pub fn new(sinks: Vec<Arc<dyn DomainLogger>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DomainLogger for FanoutLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

/// File logger (which also echoes to the console through `fast_log`) when `path` is given and
/// can be installed, otherwise the plain console logger.
pub fn init_combined_logger(path: Option<&str>, level: log::LevelFilter) -> Arc<dyn DomainLogger> {
    let console = super::init_console_logger();
    let Some(path) = path else {
        return console;
    };
    match super::file_logger::init_file_logger(path, level) {
        Ok(file_logger) => file_logger,
        Err(e) => {
            console.warn(&format!("{}; falling back to console logging", e));
            console
        }
    }
}
