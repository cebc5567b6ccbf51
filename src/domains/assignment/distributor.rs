use super::types::{AssignmentRecord, EntityId, Worker};
use crate::common::{DomainError, DomainResult};

/// Split `entity_ids` across `workers` in contiguous, order-preserving slices.
///
/// With `n` entities and `w` workers every worker gets `n / w` entities and the
/// first `n % w` workers (in iteration order) get one more. Shares of zero are
/// not emitted, so an empty entity list produces no records and `w > n` produces
/// exactly `n` single-entity records.
pub fn distribute(entity_ids: &[EntityId], workers: &[Worker]) -> DomainResult<Vec<AssignmentRecord>> {
    if workers.is_empty() {
        return Err(DomainError::NoEligibleWorkers);
    }

    let base = entity_ids.len() / workers.len();
    let remainder = entity_ids.len() % workers.len();

    let mut records = Vec::with_capacity(workers.len().min(entity_ids.len()));
    let mut start = 0;
    for (i, worker) in workers.iter().enumerate() {
        let count = if i < remainder { base + 1 } else { base };
        if count == 0 {
            // Later workers can only receive `base`, which is zero here too.
            break;
        }
        let end = start + count;
        records.push(AssignmentRecord {
            worker_id: worker.id.clone(),
            entity_ids: entity_ids[start..end].to_vec(),
            count,
            label: worker.label.clone(),
        });
        start = end;
    }

    debug_assert_eq!(start, entity_ids.len());
    Ok(records)
}
