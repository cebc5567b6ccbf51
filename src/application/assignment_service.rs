// Auto-assign workflow: select, filter by role, distribute, submit
use super::assignment_submitter::AssignmentSubmitter;
use crate::common::{ApplicationResult, DomainError};
use crate::domains::assignment::{
    distribute, filter_workers_by_groups, select_unassigned, AssignmentRecord, EntityId, GroupId,
    SubmissionContext, SubmissionSummary, WorkerSource,
};
use crate::domains::DynLogger;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// What the caller selected for one auto-assign run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignRequest {
    pub entity_ids: Vec<EntityId>,
    #[serde(default)]
    pub groups: Vec<GroupId>,
    /// Entities that already have an owner and must be skipped.
    #[serde(default)]
    pub exclude: Vec<EntityId>,
    #[serde(flatten)]
    pub context: SubmissionContext,
}

pub struct AssignmentService {
    workers: Arc<dyn WorkerSource>,
    submitter: AssignmentSubmitter,
    logger: DynLogger,
}

impl AssignmentService {
    pub fn new(workers: Arc<dyn WorkerSource>, submitter: AssignmentSubmitter, logger: DynLogger) -> Self {
        Self {
            workers,
            submitter,
            logger,
        }
    }

    /// Compute the distribution without sending anything.
    pub async fn plan(&self, request: &AutoAssignRequest) -> ApplicationResult<Vec<AssignmentRecord>> {
        let excluded: HashSet<EntityId> = request.exclude.iter().cloned().collect();
        let entities = select_unassigned(&request.entity_ids, &excluded);
        if entities.is_empty() {
            return Err(DomainError::NoEntitiesSelected.into());
        }

        let groups: HashSet<GroupId> = request.groups.iter().cloned().collect();
        if groups.is_empty() {
            return Err(DomainError::NoEligibleWorkers.into());
        }

        let all_workers = self.workers.list_workers().await?;
        let eligible = filter_workers_by_groups(&all_workers, &groups);
        self.logger.info(&format!(
            "{} of {} employees match the selected roles; distributing {} entities",
            eligible.len(),
            all_workers.len(),
            entities.len()
        ));

        Ok(distribute(&entities, &eligible)?)
    }

    pub async fn auto_assign(&self, request: &AutoAssignRequest) -> ApplicationResult<SubmissionSummary> {
        let records = self.plan(request).await?;
        Ok(self.submitter.submit(&records, &request.context).await)
    }
}
