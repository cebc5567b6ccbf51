use crate::common::{GatewayError, GatewayResult};
use crate::domains::assignment::{AssignmentGateway, CreateAssignmentRequest, Worker, WorkerId, WorkerSource};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// In-process backend used for dry runs and tests.
///
/// Accepted requests are recorded in arrival order. Requests for workers in
/// the failing set are rejected, requests for workers in the stalled set sleep
/// for `stall` before being accepted.
#[derive(Default)]
pub struct InMemoryGateway {
    workers: Vec<Worker>,
    failing: HashSet<WorkerId>,
    stalled: HashSet<WorkerId>,
    stall: Duration,
    accepted: Mutex<Vec<CreateAssignmentRequest>>,
    attempts: Mutex<usize>,
}

impl InMemoryGateway {
    pub fn new(workers: Vec<Worker>) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    pub fn fail_for(mut self, worker_id: impl Into<WorkerId>) -> Self {
        self.failing.insert(worker_id.into());
        self
    }

    pub fn stall_for(mut self, worker_id: impl Into<WorkerId>, stall: Duration) -> Self {
        self.stalled.insert(worker_id.into());
        self.stall = stall;
        self
    }

    pub fn accepted(&self) -> Vec<CreateAssignmentRequest> {
        self.accepted.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|a| *a).unwrap_or_default()
    }
}

#[async_trait]
impl AssignmentGateway for InMemoryGateway {
    async fn create_assignment(&self, request: &CreateAssignmentRequest) -> GatewayResult<()> {
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts += 1;
        }
        if self.stalled.contains(&request.worker_id) {
            tokio::time::sleep(self.stall).await;
        }
        if self.failing.contains(&request.worker_id) {
            return Err(GatewayError::Rejected {
                status: 500,
                message: format!("worker {} rejected", request.worker_id),
            });
        }
        if let Ok(mut accepted) = self.accepted.lock() {
            accepted.push(request.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl WorkerSource for InMemoryGateway {
    async fn list_workers(&self) -> GatewayResult<Vec<Worker>> {
        Ok(self.workers.clone())
    }
}
