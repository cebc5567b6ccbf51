use crate::domains::logger::{DomainLogger, FileLogger};
use std::sync::Arc;

/// Install the `fast_log` file backend and return the logger to inject.
pub fn init_file_logger(path: &str) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path, log::LevelFilter::Info)
        .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FileLogger))
}
