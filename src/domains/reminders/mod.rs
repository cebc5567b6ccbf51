pub mod poller;
pub mod ports;
pub mod types;

pub use poller::*;
pub use ports::*;
pub use types::*;
