//! Post mutation planning.
//!
//! Stores apply a [`PostChanges`](crate::domain::PostChanges) in one
//! transaction: scalar columns first, then tag-set replacement. The
//! replacement itself is computed here so every store reconciles the join
//! table the same way.

use std::collections::BTreeSet;

use crate::domain::TagId;

/// Join-table edits that turn a post's current tag ids into the requested set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagReconciliation {
    /// Associations to remove.
    pub detach: Vec<TagId>,
    /// Associations to add.
    pub attach: Vec<TagId>,
}

impl TagReconciliation {
    pub fn plan(
        current: impl IntoIterator<Item = TagId>,
        requested: impl IntoIterator<Item = TagId>,
    ) -> Self {
        let current: BTreeSet<TagId> = current.into_iter().collect();
        let requested: BTreeSet<TagId> = requested.into_iter().collect();

        Self {
            detach: current.difference(&requested).copied().collect(),
            attach: requested.difference(&current).copied().collect(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.detach.is_empty() && self.attach.is_empty()
    }
}

/// Drop blank names and duplicates, keeping first occurrences.
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_replaces_set() {
        let plan = TagReconciliation::plan([1, 2, 3], [2, 3, 4]);
        assert_eq!(plan.detach, vec![1]);
        assert_eq!(plan.attach, vec![4]);
    }

    #[test]
    fn test_plan_empty_request_detaches_everything() {
        let plan = TagReconciliation::plan([5, 6], []);
        assert_eq!(plan.detach, vec![5, 6]);
        assert!(plan.attach.is_empty());
    }

    #[test]
    fn test_plan_same_set_is_noop() {
        assert!(TagReconciliation::plan([1, 2], [2, 1]).is_noop());
    }

    #[test]
    fn test_normalize_drops_blank_and_duplicate_names() {
        let names = vec![
            "#a".to_string(),
            " ".to_string(),
            "#b ".to_string(),
            "#a".to_string(),
        ];
        assert_eq!(normalize_tag_names(&names), vec!["#a", "#b"]);
    }
}
