use super::types::{Priority, WorkerId};
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AssignmentEvent {
    AssignmentSubmitted {
        batch_id: Uuid,
        batch_key: String,
        worker_id: WorkerId,
        count: usize,
        priority: Priority,
        timestamp: DateTime<Utc>,
    },
    AssignmentFailed {
        batch_id: Uuid,
        batch_key: String,
        worker_id: WorkerId,
        count: usize,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl AssignmentEvent {
    pub fn submitted(batch_id: Uuid, worker_id: WorkerId, count: usize, priority: Priority) -> Self {
        AssignmentEvent::AssignmentSubmitted {
            batch_id,
            batch_key: batch_id.to_string(),
            worker_id,
            count,
            priority,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(batch_id: Uuid, worker_id: WorkerId, count: usize, reason: String) -> Self {
        AssignmentEvent::AssignmentFailed {
            batch_id,
            batch_key: batch_id.to_string(),
            worker_id,
            count,
            reason,
            timestamp: Utc::now(),
        }
    }

    pub fn batch_id(&self) -> Uuid {
        match self {
            AssignmentEvent::AssignmentSubmitted { batch_id, .. } => *batch_id,
            AssignmentEvent::AssignmentFailed { batch_id, .. } => *batch_id,
        }
    }
}

impl DomainEvent for AssignmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AssignmentEvent::AssignmentSubmitted { .. } => "AssignmentSubmitted",
            AssignmentEvent::AssignmentFailed { .. } => "AssignmentFailed",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            AssignmentEvent::AssignmentSubmitted { batch_key, .. } => batch_key,
            AssignmentEvent::AssignmentFailed { batch_key, .. } => batch_key,
        }
    }

    fn event_version(&self) -> u64 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AssignmentEvent::AssignmentSubmitted { timestamp, .. } => *timestamp,
            AssignmentEvent::AssignmentFailed { timestamp, .. } => *timestamp,
        }
    }
}
