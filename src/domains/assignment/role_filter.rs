use super::types::{GroupId, Worker};
use std::collections::HashSet;

/// Keep the workers whose group is one of `selected`, in their original order.
///
/// An empty selection means no eligible workers rather than all of them.
/// Workers without a group never match.
pub fn filter_workers_by_groups(workers: &[Worker], selected: &HashSet<GroupId>) -> Vec<Worker> {
    if selected.is_empty() {
        return Vec::new();
    }
    workers
        .iter()
        .filter(|w| w.group_id.as_ref().is_some_and(|g| selected.contains(g)))
        .cloned()
        .collect()
}
