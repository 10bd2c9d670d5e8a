use std::sync::Arc;

use recall_protocol::{
    sort_canonical, Observation, ResultSet, SearchOptions, SearchType, SessionSummary,
    StrategyName, StrategySearchResult, UserPrompt,
};
use recall_storage::MemoryStore;

use crate::error::Result;

/// Ranked lexical search over the storage reader's full-text index.
///
/// The selected strategy whenever free text is present and no vector reader
/// is configured; also the lexical leg of the blended path, which consumes
/// the `ranked_*` accessors to keep BM25 order for fusion.
pub struct Bm25SearchStrategy {
    store: Arc<MemoryStore>,
}

impl Bm25SearchStrategy {
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn search(&self, opts: &SearchOptions) -> Result<StrategySearchResult> {
        let query = opts.query.as_deref().unwrap_or_default();
        let mut results = ResultSet::default();
        match opts.search_type {
            SearchType::Observations => {
                results.observations = self.ranked_observations(query, opts, opts.limit)?;
                sort_canonical(&mut results.observations);
            }
            SearchType::Sessions => {
                results.sessions = self.ranked_summaries(query, opts, opts.limit)?;
                sort_canonical(&mut results.sessions);
            }
            SearchType::Prompts => {
                results.prompts = self.ranked_prompts(query, opts, opts.limit)?;
                sort_canonical(&mut results.prompts);
            }
        }
        Ok(StrategySearchResult::new(results, StrategyName::Bm25))
    }

    /// BM25 rank order, best first; no canonical ordering applied.
    pub(crate) fn ranked_observations(
        &self,
        query: &str,
        opts: &SearchOptions,
        limit: usize,
    ) -> Result<Vec<Observation>> {
        Ok(self.store.search_observations(Some(query), opts, limit)?)
    }

    pub(crate) fn ranked_summaries(
        &self,
        query: &str,
        opts: &SearchOptions,
        limit: usize,
    ) -> Result<Vec<SessionSummary>> {
        Ok(self.store.search_summaries(Some(query), opts, limit)?)
    }

    pub(crate) fn ranked_prompts(
        &self,
        query: &str,
        opts: &SearchOptions,
        limit: usize,
    ) -> Result<Vec<UserPrompt>> {
        Ok(self.store.search_user_prompts(Some(query), opts, limit)?)
    }
}
