use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No eligible workers: select at least one role with employees in it")]
    NoEligibleWorkers,

    #[error("No entities selected for assignment")]
    NoEntitiesSelected,

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

/// Failure of a single call across the backend boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("No access token available")]
    Unauthorized,

    #[error("Request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Malformed access token: {0}")]
    MalformedToken(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type GatewayResult<T> = Result<T, GatewayError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
