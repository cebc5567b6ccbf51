use super::events::AssignmentEvent;
use super::types::WorkerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Per-batch totals folded from assignment events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProjection {
    pub assigned_count: usize,
    pub failed_count: usize,
    pub failed_workers: Vec<WorkerId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentProjection {
    batches: HashMap<Uuid, BatchProjection>,
}

impl AssignmentProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &AssignmentEvent) {
        let batch = self.batches.entry(event.batch_id()).or_default();
        match event {
            AssignmentEvent::AssignmentSubmitted { count, .. } => {
                batch.assigned_count += count;
            }
            AssignmentEvent::AssignmentFailed { count, worker_id, .. } => {
                batch.failed_count += count;
                batch.failed_workers.push(worker_id.clone());
            }
        }
    }

    pub fn batch(&self, batch_id: &Uuid) -> Option<&BatchProjection> {
        self.batches.get(batch_id)
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}
