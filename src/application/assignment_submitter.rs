use crate::common::{GatewayError, GatewayResult};
use crate::config::{DispatchMode, SubmissionConfig};
use crate::domains::assignment::{
    AssignmentEvent, AssignmentEventActor, AssignmentGateway, AssignmentRecord, CreateAssignmentRequest,
    SubmissionContext, SubmissionSummary, WorkerSubmission,
};
use crate::domains::DynLogger;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Sends one create-assignment request per record and reports what happened.
///
/// Failures never escape `submit`; they end up in the summary.
pub struct AssignmentSubmitter {
    gateway: Arc<dyn AssignmentGateway>,
    logger: DynLogger,
    mode: DispatchMode,
    max_in_flight: usize,
    request_timeout: Duration,
    events: Option<AssignmentEventActor>,
}

impl AssignmentSubmitter {
    pub fn new(gateway: Arc<dyn AssignmentGateway>, logger: DynLogger) -> Self {
        Self::from_config(gateway, logger, &SubmissionConfig::default())
    }

    pub fn from_config(gateway: Arc<dyn AssignmentGateway>, logger: DynLogger, config: &SubmissionConfig) -> Self {
        Self {
            gateway,
            logger,
            mode: config.mode,
            max_in_flight: config.max_in_flight.max(1),
            request_timeout: config.request_timeout(),
            events: None,
        }
    }

    pub fn with_mode(mut self, mode: DispatchMode, max_in_flight: usize) -> Self {
        self.mode = mode;
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_events(mut self, events: AssignmentEventActor) -> Self {
        self.events = Some(events);
        self
    }

    pub async fn submit(&self, records: &[AssignmentRecord], ctx: &SubmissionContext) -> SubmissionSummary {
        let batch_id = Uuid::new_v4();
        let requests: Vec<_> = records
            .iter()
            .map(|r| CreateAssignmentRequest::from_record(r, ctx))
            .collect();

        self.logger.info(&format!(
            "Submitting batch {}: {} request(s), {} entities, mode {:?}",
            batch_id,
            requests.len(),
            records.iter().map(|r| r.count).sum::<usize>(),
            self.mode
        ));

        let outcomes = match self.mode {
            DispatchMode::Sequential => self.send_sequential(&requests).await,
            DispatchMode::Concurrent => self.send_concurrent(requests).await,
        };

        let mut results = Vec::with_capacity(records.len());
        for (record, outcome) in records.iter().zip(outcomes) {
            let event = match &outcome {
                Ok(()) => AssignmentEvent::submitted(batch_id, record.worker_id.clone(), record.count, ctx.priority),
                Err(e) => {
                    self.logger.error(&format!(
                        "Assignment of {} entities to {} ({}) failed: {}",
                        record.count, record.worker_id, record.label, e
                    ));
                    AssignmentEvent::failed(batch_id, record.worker_id.clone(), record.count, e.to_string())
                }
            };
            if let Some(events) = &self.events {
                if let Err(e) = events.publish(event).await {
                    self.logger.warn(&e);
                }
            }
            results.push(WorkerSubmission {
                worker_id: record.worker_id.clone(),
                count: record.count,
                error: outcome.err().map(|e| e.to_string()),
            });
        }

        let summary = SubmissionSummary::new(batch_id, results);
        self.logger.info(&format!("Batch {} finished: {}", batch_id, summary));
        summary
    }

    async fn send_sequential(&self, requests: &[CreateAssignmentRequest]) -> Vec<GatewayResult<()>> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            outcomes.push(send_with_timeout(self.gateway.as_ref(), request, self.request_timeout).await);
        }
        outcomes
    }

    /// Outcomes are written into the slot of the request's index so each one
    /// stays attributed to its worker regardless of completion order.
    async fn send_concurrent(&self, requests: Vec<CreateAssignmentRequest>) -> Vec<GatewayResult<()>> {
        let total = requests.len();
        let mut slots: Vec<Option<GatewayResult<()>>> = vec![None; total];
        let mut in_flight = JoinSet::new();
        let mut pending = requests.into_iter().enumerate();

        loop {
            while in_flight.len() < self.max_in_flight {
                let Some((index, request)) = pending.next() else { break };
                let gateway = self.gateway.clone();
                let timeout = self.request_timeout;
                in_flight.spawn(async move {
                    (index, send_with_timeout(gateway.as_ref(), &request, timeout).await)
                });
            }

            match in_flight.join_next().await {
                Some(Ok((index, outcome))) => slots[index] = Some(outcome),
                Some(Err(e)) => self.logger.error(&format!("Assignment task aborted: {}", e)),
                None => break,
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Err(GatewayError::Transport("request task did not complete".into()))))
            .collect()
    }
}

async fn send_with_timeout(
    gateway: &dyn AssignmentGateway,
    request: &CreateAssignmentRequest,
    timeout: Duration,
) -> GatewayResult<()> {
    match tokio::time::timeout(timeout, gateway.create_assignment(request)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(GatewayError::Timeout {
            after_ms: timeout.as_millis() as u64,
        }),
    }
}
