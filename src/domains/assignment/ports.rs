use super::types::{CreateAssignmentRequest, Worker};
use crate::common::GatewayResult;
use async_trait::async_trait;

/// Port for the endpoint that persists one worker's assignment.
#[async_trait]
pub trait AssignmentGateway: Send + Sync {
    async fn create_assignment(&self, request: &CreateAssignmentRequest) -> GatewayResult<()>;
}

/// Port supplying the employees assignments can go to.
#[async_trait]
pub trait WorkerSource: Send + Sync {
    async fn list_workers(&self) -> GatewayResult<Vec<Worker>>;
}
