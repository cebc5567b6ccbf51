use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Fans every line out to all inner loggers, in order.
pub struct MultiLogger {
    sinks: Vec<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<Arc<dyn DomainLogger>>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
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

/// Tracing bridge, plus the file logger when `file` is set and can be opened.
pub fn init_domain_logger(file: Option<&str>) -> Arc<dyn DomainLogger> {
    let tracing_logger = super::init_tracing_logger();
    let Some(path) = file else {
        return tracing_logger;
    };
    match super::init_file_logger(path) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![tracing_logger, file_logger])),
        Err(e) => {
            tracing_logger.warn(&format!("{}; logging to the console only", e));
            tracing_logger
        }
    }
}
