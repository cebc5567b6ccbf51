pub mod buffered_logger;
pub mod event_log;
pub mod file_logger;
pub mod http_backend;
pub mod memory_gateway;
pub mod multi_logger;
pub mod noop_logger;
pub mod tracing_logger;
pub mod worker_file_source;

pub use buffered_logger::*;
pub use event_log::*;
pub use file_logger::*;
pub use http_backend::*;
pub use memory_gateway::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use tracing_logger::*;
pub use worker_file_source::*;
