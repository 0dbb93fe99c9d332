use crate::domains::logger::{DomainLogger, FileLogger};
use std::sync::Arc;

/// Installs the `fast_log` backend and returns a domain logger that writes through it.
pub fn init_file_logger(path: &str, level: log::LevelFilter) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path, level).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger))
}
