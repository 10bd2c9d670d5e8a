use std::sync::Arc;
use std::time::Duration;

use recall_protocol::{RawSearchArgs, SearchOptions, StrategySearchResult, TimelineItem};
use recall_storage::MemoryStore;
use recall_vector_store::{TimeBounded, VectorReader};

use crate::ancestry::AncestryResolver;
use crate::blend::HybridBlendingStrategy;
use crate::bm25::Bm25SearchStrategy;
use crate::error::Result;
use crate::hybrid::HybridSearchStrategy;
use crate::sqlite::SqliteSearchStrategy;
use crate::timeline::{build_timeline, filter_by_depth};
use crate::tuning::RetrievalTuning;
use crate::visibility::resolve_branch_filter;

/// Timeline reconstruction parameters.
#[derive(Debug, Clone, Default)]
pub struct TimelineRequest {
    pub project: Option<String>,
    pub cwd: Option<String>,
    /// Explicit commit restriction; `None` resolves from `cwd` + `project`.
    pub commit_shas: Option<Vec<String>>,
    pub anchor_id: Option<i64>,
    pub anchor_epoch: Option<i64>,
    pub depth_before: usize,
    pub depth_after: usize,
}

/// Top-level retrieval entry point.
///
/// Normalizes parameters, resolves branch visibility, picks a strategy, and
/// returns the strategy's tagged result unmodified; selection, not result
/// mutation, is the orchestrator's job. Stateless per request: nothing here
/// is shared mutable state between concurrent searches.
pub struct SearchOrchestrator {
    store: Arc<MemoryStore>,
    vector: Option<Arc<dyn VectorReader>>,
    ancestry: Arc<dyn AncestryResolver>,
    tuning: RetrievalTuning,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        vector: Option<Arc<dyn VectorReader>>,
        ancestry: Arc<dyn AncestryResolver>,
    ) -> Self {
        Self::with_tuning(store, vector, ancestry, RetrievalTuning::default())
    }

    #[must_use]
    pub fn with_tuning(
        store: Arc<MemoryStore>,
        vector: Option<Arc<dyn VectorReader>>,
        ancestry: Arc<dyn AncestryResolver>,
        tuning: RetrievalTuning,
    ) -> Self {
        Self {
            store,
            vector,
            ancestry,
            tuning,
        }
    }

    /// Whether a semantic backend was configured at all. Says nothing about
    /// whether it is currently healthy; that shows up per-result as
    /// `fell_back`.
    #[must_use]
    pub fn is_vector_store_available(&self) -> bool {
        self.vector.is_some()
    }

    /// Free-text or filter-only search.
    ///
    /// Decision tree, first match wins: no free text → filter-only SQLite;
    /// free text with a vector reader → hybrid blending; free text without →
    /// BM25.
    pub async fn search(&self, raw: RawSearchArgs) -> Result<StrategySearchResult> {
        let mut opts = SearchOptions::from_raw(raw);
        self.apply_branch_filter(&mut opts).await?;

        if !opts.has_query() {
            return SqliteSearchStrategy::new(Arc::clone(&self.store)).search(&opts);
        }

        match self.bounded_vector() {
            Some(vector) => {
                HybridBlendingStrategy::new(Arc::clone(&self.store), vector, self.tuning.clone())
                    .search(&opts)
                    .await
            }
            None => Bm25SearchStrategy::new(Arc::clone(&self.store)).search(&opts),
        }
    }

    pub async fn find_by_concept(
        &self,
        concept: &str,
        raw: RawSearchArgs,
    ) -> Result<StrategySearchResult> {
        let mut opts = SearchOptions::from_raw(raw);
        self.apply_branch_filter(&mut opts).await?;
        match self.bounded_vector() {
            Some(vector) => {
                HybridSearchStrategy::new(Arc::clone(&self.store), vector, self.tuning.clone())
                    .find_by_concept(concept, &opts)
                    .await
            }
            None => SqliteSearchStrategy::new(Arc::clone(&self.store)).find_by_concept(concept, &opts),
        }
    }

    pub async fn find_by_kind(
        &self,
        kind: &str,
        raw: RawSearchArgs,
    ) -> Result<StrategySearchResult> {
        let mut opts = SearchOptions::from_raw(raw);
        self.apply_branch_filter(&mut opts).await?;
        match self.bounded_vector() {
            Some(vector) => {
                HybridSearchStrategy::new(Arc::clone(&self.store), vector, self.tuning.clone())
                    .find_by_kind(kind, &opts)
                    .await
            }
            None => SqliteSearchStrategy::new(Arc::clone(&self.store)).find_by_kind(kind, &opts),
        }
    }

    pub async fn find_by_file(
        &self,
        file: &str,
        raw: RawSearchArgs,
    ) -> Result<StrategySearchResult> {
        let mut opts = SearchOptions::from_raw(raw);
        self.apply_branch_filter(&mut opts).await?;
        match self.bounded_vector() {
            Some(vector) => {
                HybridSearchStrategy::new(Arc::clone(&self.store), vector, self.tuning.clone())
                    .find_by_file(file, &opts)
                    .await
            }
            None => SqliteSearchStrategy::new(Arc::clone(&self.store)).find_by_file(file, &opts),
        }
    }

    /// Chronological window around an anchor.
    ///
    /// Branch visibility is resolved through the same path as search, then
    /// applied to the input collections before the timeline is built; the
    /// builder itself never filters.
    pub async fn get_timeline(&self, request: TimelineRequest) -> Result<Vec<TimelineItem>> {
        let mut opts = SearchOptions {
            project: request.project.clone(),
            cwd: request.cwd.clone(),
            commit_shas: request.commit_shas.clone(),
            ..SearchOptions::default()
        };
        self.apply_branch_filter(&mut opts).await?;

        let window = self.tuning.timeline_fetch_window;
        let observations = self.store.search_observations(None, &opts, window)?;
        let summaries = self.store.search_summaries(None, &opts, window)?;
        let prompts = self.store.search_user_prompts(None, &opts, window)?;

        let items = build_timeline(observations, summaries, prompts);
        Ok(filter_by_depth(
            &items,
            request.anchor_id,
            request.anchor_epoch,
            request.depth_before,
            request.depth_after,
        ))
    }

    /// Resolve the commit filter in place. Explicit SHAs from normalization
    /// are forwarded untouched and never overwritten.
    async fn apply_branch_filter(&self, opts: &mut SearchOptions) -> Result<()> {
        let projects: Vec<&str> = opts.project.as_deref().into_iter().collect();
        opts.commit_shas = resolve_branch_filter(
            opts.commit_shas.take(),
            opts.cwd.as_deref(),
            &projects,
            &self.store,
            self.ancestry.as_ref(),
        )
        .await?;
        Ok(())
    }

    /// Every vector call goes out behind the configured timeout, so a hung
    /// backend degrades into a recoverable failure instead of a stall.
    fn bounded_vector(&self) -> Option<Arc<dyn VectorReader>> {
        self.vector.as_ref().map(|vector| {
            Arc::new(TimeBounded::new(
                Arc::clone(vector),
                Duration::from_millis(self.tuning.vector_timeout_ms),
            )) as Arc<dyn VectorReader>
        })
    }
}
