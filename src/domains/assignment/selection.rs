use super::types::EntityId;
use std::collections::HashSet;

/// Candidates not in `already_assigned`, first occurrence wins, order kept.
///
/// `already_assigned` is only read.
pub fn select_unassigned(candidates: &[EntityId], already_assigned: &HashSet<EntityId>) -> Vec<EntityId> {
    let mut picked = HashSet::with_capacity(candidates.len());
    candidates
        .iter()
        .filter(|id| !already_assigned.contains(*id))
        .filter(|id| picked.insert(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<EntityId> {
        raw.iter().map(|s| EntityId::from(*s)).collect()
    }

    #[test]
    fn drops_assigned_and_duplicates() {
        let assigned: HashSet<_> = ids(&["u2"]).into_iter().collect();
        let selected = select_unassigned(&ids(&["u1", "u2", "u3", "u1", "u4"]), &assigned);
        assert_eq!(selected, ids(&["u1", "u3", "u4"]));
    }

    #[test]
    fn everything_assigned_leaves_nothing() {
        let assigned: HashSet<_> = ids(&["u1", "u2"]).into_iter().collect();
        assert!(select_unassigned(&ids(&["u1", "u2"]), &assigned).is_empty());
    }
}
