pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;

pub use config::Config;

// Re-export common types
pub use common::*;

// Re-export the assignment domain, which is what most callers need
pub use domains::assignment::*;
pub use domains::logger::*;
