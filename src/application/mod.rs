pub mod assignment_service;
pub mod assignment_submitter;

pub use assignment_service::*;
pub use assignment_submitter::*;
