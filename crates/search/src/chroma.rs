use std::collections::HashMap;
use std::sync::Arc;

use recall_protocol::{
    sort_canonical, ResultSet, SearchOptions, SearchType, StrategyName, StrategySearchResult,
};
use recall_storage::MemoryStore;
use recall_vector_store::{MetadataFilter, VectorReader};

use crate::error::Result;
use crate::filter;
use crate::tuning::RetrievalTuning;

/// Semantic nearest-neighbour search backed by the vector reader.
///
/// Vector hits are only IDs; rows are resolved through the storage reader in
/// a single batch call and re-checked against the structured filters, since
/// the backend's own metadata filtering is best-effort.
pub struct ChromaSearchStrategy {
    store: Arc<MemoryStore>,
    vector: Arc<dyn VectorReader>,
    tuning: RetrievalTuning,
}

impl ChromaSearchStrategy {
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        vector: Arc<dyn VectorReader>,
        tuning: RetrievalTuning,
    ) -> Self {
        Self {
            store,
            vector,
            tuning,
        }
    }

    /// Ranked candidate IDs, vector order. The one place a vector error is
    /// surfaced as-is, so the blended path can catch it and fall back.
    pub(crate) async fn ranked_ids(
        &self,
        query: &str,
        opts: &SearchOptions,
        limit: usize,
    ) -> recall_vector_store::Result<Vec<i64>> {
        let where_filter = metadata_filter(opts);
        let hits = self.vector.query(query, limit, Some(&where_filter)).await?;
        Ok(hits.ids)
    }

    pub async fn search(&self, opts: &SearchOptions) -> Result<StrategySearchResult> {
        let query = opts.query.as_deref().unwrap_or_default();
        let ids = self
            .ranked_ids(query, opts, self.tuning.overfetch(opts.limit))
            .await?;

        let mut results = ResultSet::default();
        match opts.search_type {
            SearchType::Observations => {
                let rows = self.store.get_observations_by_ids(&ids)?;
                let mut by_id: HashMap<i64, _> =
                    rows.into_iter().map(|row| (row.id, row)).collect();
                results.observations = ids
                    .iter()
                    .filter_map(|id| by_id.remove(id))
                    .filter(|row| filter::observation_matches(opts, row))
                    .take(opts.limit)
                    .collect();
                sort_canonical(&mut results.observations);
            }
            SearchType::Sessions => {
                let rows = self.store.get_summaries_by_ids(&ids)?;
                let mut by_id: HashMap<i64, _> =
                    rows.into_iter().map(|row| (row.id, row)).collect();
                results.sessions = ids
                    .iter()
                    .filter_map(|id| by_id.remove(id))
                    .filter(|row| filter::summary_matches(opts, row))
                    .take(opts.limit)
                    .collect();
                sort_canonical(&mut results.sessions);
            }
            SearchType::Prompts => {
                let rows = self.store.get_prompts_by_ids(&ids)?;
                let mut by_id: HashMap<i64, _> =
                    rows.into_iter().map(|row| (row.id, row)).collect();
                results.prompts = ids
                    .iter()
                    .filter_map(|id| by_id.remove(id))
                    .filter(|row| filter::prompt_matches(opts, row))
                    .take(opts.limit)
                    .collect();
                sort_canonical(&mut results.prompts);
            }
        }

        Ok(StrategySearchResult {
            results,
            used_vector_store: true,
            fell_back: false,
            strategy: StrategyName::Chroma,
        })
    }
}

pub(crate) fn metadata_filter(opts: &SearchOptions) -> MetadataFilter {
    MetadataFilter {
        project: opts.project.clone(),
        doc: Some(opts.search_type),
        kinds: opts.obs_kinds.clone(),
        concepts: opts.concepts.clone(),
        files: opts.files.clone(),
    }
}
