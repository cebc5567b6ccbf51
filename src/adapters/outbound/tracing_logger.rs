use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Forwards domain log lines to `tracing` under the `crm_assign::domain` target.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: "crm_assign::domain", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "crm_assign::domain", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "crm_assign::domain", "{}", msg);
    }
}

/// Logger used when no file is configured; output follows the installed subscriber.
pub fn init_tracing_logger() -> Arc<dyn DomainLogger> {
    Arc::new(TracingBridge)
}
