pub mod actors;
pub mod distributor;
pub mod events;
pub mod ports;
pub mod projections;
pub mod role_filter;
pub mod selection;
pub mod types;

pub use actors::*;
pub use distributor::*;
pub use events::*;
pub use ports::*;
pub use projections::*;
pub use role_filter::*;
pub use selection::*;
pub use types::*;
