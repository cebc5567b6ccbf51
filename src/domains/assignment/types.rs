use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(EntityId);
string_id!(WorkerId);
string_id!(GroupId);

/// A target recipient of a share of entities (an employee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    #[serde(alias = "_id")]
    pub id: WorkerId,
    #[serde(default, alias = "role", alias = "roleId")]
    pub group_id: Option<GroupId>,
    #[serde(default, alias = "name")]
    pub label: String,
}

impl Worker {
    pub fn new(id: impl Into<WorkerId>, group_id: Option<GroupId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group_id,
            label: label.into(),
        }
    }
}

/// One worker's share of a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub worker_id: WorkerId,
    pub entity_ids: Vec<EntityId>,
    pub count: usize,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionContext {
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of a single create-assignment call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub worker_id: WorkerId,
    pub entity_ids: Vec<EntityId>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateAssignmentRequest {
    pub fn from_record(record: &AssignmentRecord, ctx: &SubmissionContext) -> Self {
        Self {
            worker_id: record.worker_id.clone(),
            entity_ids: record.entity_ids.clone(),
            priority: ctx.priority,
            notes: ctx.notes.clone(),
        }
    }
}

/// Result of one worker's request inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSubmission {
    pub worker_id: WorkerId,
    pub count: usize,
    pub error: Option<String>,
}

impl WorkerSubmission {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    Succeeded,
    PartialFailure,
    TotalFailure,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub batch_id: Uuid,
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<WorkerSubmission>,
}

impl SubmissionSummary {
    pub fn new(batch_id: Uuid, results: Vec<WorkerSubmission>) -> Self {
        let (success_count, failure_count) =
            results.iter().fold((0, 0), |(ok, failed), r| {
                if r.succeeded() {
                    (ok + r.count, failed)
                } else {
                    (ok, failed + r.count)
                }
            });
        Self {
            batch_id,
            success_count,
            failure_count,
            results,
        }
    }

    pub fn outcome(&self) -> SubmissionOutcome {
        let any_ok = self.results.iter().any(WorkerSubmission::succeeded);
        let any_failed = self.results.iter().any(|r| !r.succeeded());
        match (any_ok, any_failed) {
            (false, false) => SubmissionOutcome::Empty,
            (true, false) => SubmissionOutcome::Succeeded,
            (true, true) => SubmissionOutcome::PartialFailure,
            (false, true) => SubmissionOutcome::TotalFailure,
        }
    }

    pub fn failed_workers(&self) -> impl Iterator<Item = &WorkerId> {
        self.results
            .iter()
            .filter(|r| !r.succeeded())
            .map(|r| &r.worker_id)
    }
}

impl fmt::Display for SubmissionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Assigned {}, failed {}",
            self.success_count, self.failure_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(worker: &str, count: usize, error: Option<&str>) -> WorkerSubmission {
        WorkerSubmission {
            worker_id: WorkerId::from(worker),
            count,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn summary_sums_counts_by_result() {
        let summary = SubmissionSummary::new(
            Uuid::new_v4(),
            vec![
                submission("e1", 4, None),
                submission("e2", 3, Some("boom")),
                submission("e3", 3, None),
            ],
        );
        assert_eq!(summary.success_count, 7);
        assert_eq!(summary.failure_count, 3);
        assert_eq!(summary.outcome(), SubmissionOutcome::PartialFailure);
        assert_eq!(summary.failed_workers().collect::<Vec<_>>(), vec![&WorkerId::from("e2")]);
        assert_eq!(summary.to_string(), "Assigned 7, failed 3");
    }

    #[test]
    fn outcome_distinguishes_total_failure_and_empty() {
        let failed = SubmissionSummary::new(Uuid::new_v4(), vec![submission("e1", 2, Some("x"))]);
        assert_eq!(failed.outcome(), SubmissionOutcome::TotalFailure);

        let empty = SubmissionSummary::new(Uuid::new_v4(), Vec::new());
        assert_eq!(empty.outcome(), SubmissionOutcome::Empty);
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("soon".parse::<Priority>().is_err());
    }

    #[test]
    fn request_body_uses_camel_case_and_skips_missing_notes() {
        let record = AssignmentRecord {
            worker_id: WorkerId::from("e1"),
            entity_ids: vec![EntityId::from("u1")],
            count: 1,
            label: "Alice".to_string(),
        };
        let body = CreateAssignmentRequest::from_record(&record, &SubmissionContext::default());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["workerId"], "e1");
        assert_eq!(json["entityIds"][0], "u1");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn worker_accepts_backend_field_names() {
        let w: Worker = serde_json::from_str(r#"{"_id":"e9","name":"Bob","role":"sales"}"#).unwrap();
        assert_eq!(w.id, WorkerId::from("e9"));
        assert_eq!(w.label, "Bob");
        assert_eq!(w.group_id, Some(GroupId::from("sales")));
    }
}
