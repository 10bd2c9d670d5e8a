use std::sync::Arc;

use serde::Serialize;

use recall_protocol::{RawSearchArgs, SearchOptions, StrategySearchResult, TimelineItem};

use crate::error::Result;
use crate::orchestrator::{SearchOrchestrator, TimelineRequest};

pub const DEFAULT_TOKEN_BUDGET: usize = 2_000;

/// One context-injection request: a search, optionally a timeline window
/// around an anchor, and the token budget the rendered context must fit.
#[derive(Debug, Clone)]
pub struct ContextRequest {
    pub args: RawSearchArgs,
    pub anchor_id: Option<i64>,
    pub anchor_epoch: Option<i64>,
    pub depth_before: usize,
    pub depth_after: usize,
    pub max_tokens: usize,
}

impl Default for ContextRequest {
    fn default() -> Self {
        Self {
            args: RawSearchArgs::default(),
            anchor_id: None,
            anchor_epoch: None,
            depth_before: 0,
            depth_after: 0,
            max_tokens: DEFAULT_TOKEN_BUDGET,
        }
    }
}

/// Selected context, ready for rendering (rendering itself happens in the
/// host adapter, not here).
#[derive(Debug, Clone)]
pub struct BuiltContext {
    pub search: StrategySearchResult,
    pub timeline: Vec<TimelineItem>,
    pub estimated_tokens: usize,
    pub truncated: bool,
}

/// Thin consumer over the orchestrator and timeline builder.
///
/// Truncation drops from the tail only, so the canonical ordering of what
/// survives is exactly the ordering the strategies produced.
pub struct ContextBuilder {
    orchestrator: Arc<SearchOrchestrator>,
}

impl ContextBuilder {
    #[must_use]
    pub fn new(orchestrator: Arc<SearchOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn build(&self, request: ContextRequest) -> Result<BuiltContext> {
        let normalized = SearchOptions::from_raw(request.args.clone());
        let mut search = self.orchestrator.search(request.args).await?;

        let mut timeline = if request.anchor_id.is_some() || request.anchor_epoch.is_some() {
            self.orchestrator
                .get_timeline(TimelineRequest {
                    project: normalized.project.clone(),
                    cwd: normalized.cwd.clone(),
                    commit_shas: normalized.commit_shas.clone(),
                    anchor_id: request.anchor_id,
                    anchor_epoch: request.anchor_epoch,
                    depth_before: request.depth_before,
                    depth_after: request.depth_after,
                })
                .await?
        } else {
            Vec::new()
        };

        let (estimated_tokens, truncated) =
            enforce_budget(&mut search, &mut timeline, request.max_tokens);

        Ok(BuiltContext {
            search,
            timeline,
            estimated_tokens,
            truncated,
        })
    }
}

fn enforce_budget(
    search: &mut StrategySearchResult,
    timeline: &mut Vec<TimelineItem>,
    max_tokens: usize,
) -> (usize, bool) {
    let mut used = 0usize;
    let mut truncated = false;
    truncate_tail(&mut search.results.observations, &mut used, max_tokens, &mut truncated);
    truncate_tail(&mut search.results.sessions, &mut used, max_tokens, &mut truncated);
    truncate_tail(&mut search.results.prompts, &mut used, max_tokens, &mut truncated);
    truncate_tail(timeline, &mut used, max_tokens, &mut truncated);
    (used, truncated)
}

fn truncate_tail<T: Serialize>(
    items: &mut Vec<T>,
    used: &mut usize,
    budget: usize,
    truncated: &mut bool,
) {
    let mut keep = 0usize;
    for item in items.iter() {
        let cost = estimate_tokens(item);
        if *used + cost > budget {
            break;
        }
        *used += cost;
        keep += 1;
    }
    if keep < items.len() {
        items.truncate(keep);
        *truncated = true;
    }
}

/// Rough serialized-size estimate, ~4 chars per token.
fn estimate_tokens<T: Serialize>(item: &T) -> usize {
    serde_json::to_string(item)
        .map(|rendered| rendered.len().div_ceil(4))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use recall_protocol::{Priority, ResultSet, StrategyName};

    use super::*;

    fn search_result(count: usize) -> StrategySearchResult {
        let observations = (0..count)
            .map(|i| recall_protocol::Observation {
                id: i as i64,
                project: "demo".to_string(),
                kind: "discovery".to_string(),
                priority: Priority::Informational,
                title: Some(format!("observation number {i}")),
                subtitle: None,
                narrative: Some("a narrative long enough to cost real tokens".to_string()),
                facts: vec![],
                concepts: vec![],
                files_read: vec![],
                files_modified: vec![],
                commit_sha: None,
                created_at_epoch: 1_000 + i as i64,
            })
            .collect();
        StrategySearchResult::new(
            ResultSet {
                observations,
                ..ResultSet::default()
            },
            StrategyName::Sqlite,
        )
    }

    #[test]
    fn small_budget_truncates_from_the_tail() {
        let mut search = search_result(10);
        let expected_first = search.results.observations[0].clone();
        let mut timeline = Vec::new();

        let (used, truncated) = enforce_budget(&mut search, &mut timeline, 200);
        assert!(truncated);
        assert!(used <= 200);
        assert!(search.results.observations.len() < 10);
        assert_eq!(search.results.observations[0], expected_first);
    }

    #[test]
    fn ample_budget_keeps_everything() {
        let mut search = search_result(3);
        let mut timeline = Vec::new();

        let (used, truncated) = enforce_budget(&mut search, &mut timeline, 1_000_000);
        assert!(!truncated);
        assert!(used > 0);
        assert_eq!(search.results.observations.len(), 3);
    }
}
