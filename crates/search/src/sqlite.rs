use std::sync::Arc;

use recall_protocol::{
    sort_canonical, ResultSet, SearchOptions, SearchType, StrategyName, StrategySearchResult,
};
use recall_storage::MemoryStore;

use crate::error::Result;

/// Filter-only keyword search.
///
/// Used whenever the caller gave no free text: fully deterministic, no
/// ranking ambiguity, and the capability-absent fallback target for the
/// scoped `find_by_*` lookups.
pub struct SqliteSearchStrategy {
    store: Arc<MemoryStore>,
}

impl SqliteSearchStrategy {
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn search(&self, opts: &SearchOptions) -> Result<StrategySearchResult> {
        let mut results = ResultSet::default();
        match opts.search_type {
            SearchType::Observations => {
                results.observations = self.store.search_observations(None, opts, opts.limit)?;
                sort_canonical(&mut results.observations);
            }
            SearchType::Sessions => {
                results.sessions = self.store.search_summaries(None, opts, opts.limit)?;
                sort_canonical(&mut results.sessions);
            }
            SearchType::Prompts => {
                results.prompts = self.store.search_user_prompts(None, opts, opts.limit)?;
                sort_canonical(&mut results.prompts);
            }
        }
        Ok(StrategySearchResult::new(results, StrategyName::Sqlite))
    }

    pub fn find_by_concept(&self, concept: &str, opts: &SearchOptions) -> Result<StrategySearchResult> {
        let mut rows = self.store.find_by_concept(concept, opts, opts.limit)?;
        sort_canonical(&mut rows);
        Ok(StrategySearchResult::new(
            ResultSet {
                observations: rows,
                ..ResultSet::default()
            },
            StrategyName::Sqlite,
        ))
    }

    pub fn find_by_kind(&self, kind: &str, opts: &SearchOptions) -> Result<StrategySearchResult> {
        let mut rows = self.store.find_by_kind(kind, opts, opts.limit)?;
        sort_canonical(&mut rows);
        Ok(StrategySearchResult::new(
            ResultSet {
                observations: rows,
                ..ResultSet::default()
            },
            StrategyName::Sqlite,
        ))
    }

    pub fn find_by_file(&self, file: &str, opts: &SearchOptions) -> Result<StrategySearchResult> {
        let mut rows = self.store.find_by_file(file, opts, opts.limit)?;
        sort_canonical(&mut rows);
        Ok(StrategySearchResult::new(
            ResultSet {
                observations: rows,
                ..ResultSet::default()
            },
            StrategyName::Sqlite,
        ))
    }
}
