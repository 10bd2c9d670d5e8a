//! Canonical return ordering.
//!
//! Every result set handed to a caller satisfies one total order, regardless
//! of which strategy produced it: priority tier first (critical sorts ahead),
//! then `created_at_epoch` descending within a tier. Relevance ranking only
//! decides which items make the cut under a limit; this order decides the
//! sequence they are returned in.

use crate::records::{Observation, Priority, SessionSummary, UserPrompt};
use crate::timeline::TimelineItem;

/// Anything that can be placed in the canonical return order.
pub trait Ranked {
    fn priority(&self) -> Priority;
    fn created_at_epoch(&self) -> i64;
}

impl Ranked for Observation {
    fn priority(&self) -> Priority {
        self.priority
    }
    fn created_at_epoch(&self) -> i64 {
        self.created_at_epoch
    }
}

impl Ranked for SessionSummary {
    fn priority(&self) -> Priority {
        self.priority
    }
    fn created_at_epoch(&self) -> i64 {
        self.created_at_epoch
    }
}

impl Ranked for UserPrompt {
    /// Prompts carry no priority column; they all sit in the default tier.
    fn priority(&self) -> Priority {
        Priority::Informational
    }
    fn created_at_epoch(&self) -> i64 {
        self.created_at_epoch
    }
}

impl Ranked for TimelineItem {
    fn priority(&self) -> Priority {
        TimelineItem::priority(self)
    }
    fn created_at_epoch(&self) -> i64 {
        TimelineItem::created_at_epoch(self)
    }
}

/// Sort into the canonical return order.
///
/// The sort is stable, so items equal on both keys keep their incoming
/// relative order (which is how relevance rank survives inside a tier for
/// same-epoch items).
pub fn sort_canonical<T: Ranked>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.priority()
            .tier()
            .cmp(&b.priority().tier())
            .then_with(|| b.created_at_epoch().cmp(&a.created_at_epoch()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn obs(id: i64, priority: Priority, epoch: i64) -> Observation {
        Observation {
            id,
            project: "demo".to_string(),
            kind: "discovery".to_string(),
            priority,
            title: None,
            subtitle: None,
            narrative: None,
            facts: vec![],
            concepts: vec![],
            files_read: vec![],
            files_modified: vec![],
            commit_sha: None,
            created_at_epoch: epoch,
        }
    }

    #[test]
    fn same_epoch_orders_by_tier() {
        let mut items = vec![
            obs(1, Priority::Informational, 1_000),
            obs(2, Priority::Important, 1_000),
            obs(3, Priority::Critical, 1_000),
        ];
        sort_canonical(&mut items);
        let ids: Vec<i64> = items.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn priority_beats_recency() {
        let mut items = vec![
            obs(1, Priority::Informational, 2_000),
            obs(2, Priority::Critical, 1_000),
        ];
        sort_canonical(&mut items);
        let ids: Vec<i64> = items.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn newest_first_within_a_tier() {
        let mut items = vec![
            obs(1, Priority::Important, 1_000),
            obs(2, Priority::Important, 3_000),
            obs(3, Priority::Important, 2_000),
        ];
        sort_canonical(&mut items);
        let ids: Vec<i64> = items.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn adjacent_pairs_satisfy_the_invariant() {
        let mut items = vec![
            obs(1, Priority::Informational, 5_000),
            obs(2, Priority::Critical, 100),
            obs(3, Priority::Important, 9_000),
            obs(4, Priority::Critical, 7_000),
            obs(5, Priority::Informational, 7_000),
        ];
        sort_canonical(&mut items);
        for pair in items.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.priority.tier() < b.priority.tier()
                    || (a.priority.tier() == b.priority.tier()
                        && a.created_at_epoch >= b.created_at_epoch),
                "order violated between #{} and #{}",
                a.id,
                b.id
            );
        }
    }
}
