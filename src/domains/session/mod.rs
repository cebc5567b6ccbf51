pub mod token;
pub mod watcher;

pub use token::*;
pub use watcher::*;
