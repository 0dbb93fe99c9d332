use crate::domains::logger::DomainLogger;
use chrono::Utc;
use std::sync::Arc;

/// Prints simulation messages to stdout (warnings too) and stderr (errors).
pub struct ConsoleLogger {
    prefix: String,
}

impl ConsoleLogger {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    fn line(&self, level: &str, msg: &str) -> String {
        format!("{} [{}] {}: {}", Utc::now().format("%H:%M:%S%.3f"), level, self.prefix, msg)
    }
}

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        println!("{}", self.line("INFO", msg));
    }

    fn warn(&self, msg: &str) {
        println!("{}", self.line("WARN", msg));
    }

    fn error(&self, msg: &str) {
        eprintln!("{}", self.line("ERROR", msg));
    }
}

/// Console-backed DomainLogger, used when no file logger can be installed.
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleLogger::new("reroute-sim"))
}
