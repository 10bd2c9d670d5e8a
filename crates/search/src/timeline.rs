//! Chronological window reconstruction.
//!
//! Answers "what happened around X": merge observations, summaries, and
//! prompts into one ascending timeline, locate an anchor, and slice a
//! bounded window around it. Visibility filtering happens on the input
//! collections before anything reaches these functions; the builder only
//! orders and windows what it is given.

use recall_protocol::{Observation, SessionSummary, TimelineItem, UserPrompt};

/// Merge the three collections into one list, ascending by epoch.
///
/// The sort is stable, so same-epoch items keep the merge order:
/// observations, then summaries, then prompts.
#[must_use]
pub fn build_timeline(
    observations: Vec<Observation>,
    summaries: Vec<SessionSummary>,
    prompts: Vec<UserPrompt>,
) -> Vec<TimelineItem> {
    let mut items: Vec<TimelineItem> = observations
        .into_iter()
        .map(TimelineItem::Observation)
        .chain(summaries.into_iter().map(TimelineItem::Summary))
        .chain(prompts.into_iter().map(TimelineItem::Prompt))
        .collect();
    items.sort_by_key(TimelineItem::created_at_epoch);
    items
}

/// Slice a window of `depth_before` items strictly preceding the anchor and
/// `depth_after` strictly following it, anchor included, chronological order
/// preserved.
///
/// The anchor is located by ID when one is given; a bare timestamp anchors
/// on the first item at or after it. An anchor that matches nothing returns
/// an empty list: "anchor not in this dataset" must stay distinguishable
/// from "anchor found with no surroundings", which returns at least the
/// anchor itself.
#[must_use]
pub fn filter_by_depth(
    items: &[TimelineItem],
    anchor_id: Option<i64>,
    anchor_epoch: Option<i64>,
    depth_before: usize,
    depth_after: usize,
) -> Vec<TimelineItem> {
    let position = if let Some(id) = anchor_id {
        items.iter().position(|item| item.anchor_id() == Some(id))
    } else if let Some(epoch) = anchor_epoch {
        items.iter().position(|item| item.created_at_epoch() >= epoch)
    } else {
        None
    };

    let Some(position) = position else {
        return Vec::new();
    };

    let start = position.saturating_sub(depth_before);
    let end = (position + depth_after + 1).min(items.len());
    items[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recall_protocol::Priority;

    use super::*;

    fn obs(id: i64, epoch: i64) -> Observation {
        Observation {
            id,
            project: "demo".to_string(),
            kind: "discovery".to_string(),
            priority: Priority::Informational,
            title: Some(format!("obs-{id}")),
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

    fn prompt(id: i64, epoch: i64) -> UserPrompt {
        UserPrompt {
            id,
            session_id: "s1".to_string(),
            seq: id,
            text: format!("prompt-{id}"),
            created_at_epoch: epoch,
        }
    }

    fn sample() -> Vec<TimelineItem> {
        build_timeline(
            vec![obs(1, 1_000), obs(2, 3_000), obs(3, 5_000), obs(4, 7_000)],
            vec![],
            vec![prompt(10, 2_000), prompt(11, 4_000), prompt(12, 6_000)],
        )
    }

    #[test]
    fn merged_timeline_ascends_by_epoch() {
        let items = sample();
        let epochs: Vec<i64> = items.iter().map(TimelineItem::created_at_epoch).collect();
        assert_eq!(epochs, vec![1_000, 2_000, 3_000, 4_000, 5_000, 6_000, 7_000]);
    }

    #[test]
    fn window_holds_at_most_before_plus_anchor_plus_after() {
        let items = sample();
        let window = filter_by_depth(&items, Some(3), None, 2, 2);

        assert_eq!(window.len(), 5);
        let anchors = window
            .iter()
            .filter(|item| item.anchor_id() == Some(3))
            .count();
        assert_eq!(anchors, 1);
        for pair in window.windows(2) {
            assert!(pair[0].created_at_epoch() < pair[1].created_at_epoch());
        }
    }

    #[test]
    fn window_clamps_at_dataset_edges() {
        let items = sample();
        let window = filter_by_depth(&items, Some(1), None, 5, 1);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].anchor_id(), Some(1));

        let tail = filter_by_depth(&items, Some(4), None, 1, 5);
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn absent_anchor_returns_empty() {
        let items = sample();
        assert!(filter_by_depth(&items, Some(999), None, 2, 2).is_empty());
        assert!(filter_by_depth(&items, None, None, 2, 2).is_empty());
    }

    #[test]
    fn bare_timestamp_anchors_on_first_item_at_or_after() {
        let items = sample();
        let window = filter_by_depth(&items, None, Some(3_500), 1, 1);
        let epochs: Vec<i64> = window.iter().map(TimelineItem::created_at_epoch).collect();
        assert_eq!(epochs, vec![3_000, 4_000, 5_000]);

        // A timestamp past the newest item matches nothing.
        assert!(filter_by_depth(&items, None, Some(8_000), 1, 1).is_empty());
    }

    #[test]
    fn anchor_with_no_surroundings_returns_just_the_anchor() {
        let items = build_timeline(vec![obs(1, 1_000)], vec![], vec![]);
        let window = filter_by_depth(&items, Some(1), None, 3, 3);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn prompts_are_never_anchor_candidates() {
        // Prompt id 10 exists in the dataset, but prompts anchor by nothing.
        let items = sample();
        assert!(filter_by_depth(&items, Some(10), None, 1, 1).is_empty());
    }
}
