pub mod assignment;
pub mod logger;
pub mod reminders;
pub mod session;

pub use logger::*;
