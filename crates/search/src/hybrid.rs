use std::collections::HashMap;
use std::sync::Arc;

use recall_protocol::{
    sort_canonical, Observation, ResultSet, SearchOptions, StrategyName, StrategySearchResult,
};
use recall_storage::MemoryStore;
use recall_vector_store::VectorReader;

use crate::chroma::metadata_filter;
use crate::error::Result;
use crate::filter;
use crate::tuning::RetrievalTuning;

/// Scoped lookups: "find by concept", "find by type", "find by file".
///
/// Vector pre-filtering ranks candidates by semantic closeness to the
/// needle; rows come from the storage reader and are post-checked against
/// the structured predicate. When the vector candidates underfill the limit,
/// the storage reader's own filter query tops the result up, so a sparse
/// index never hides rows that plainly match.
pub struct HybridSearchStrategy {
    store: Arc<MemoryStore>,
    vector: Arc<dyn VectorReader>,
    tuning: RetrievalTuning,
}

enum Scope {
    Concept,
    Kind,
    File,
}

impl HybridSearchStrategy {
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

    pub async fn find_by_concept(
        &self,
        concept: &str,
        opts: &SearchOptions,
    ) -> Result<StrategySearchResult> {
        self.scoped_lookup(concept, opts, Scope::Concept).await
    }

    pub async fn find_by_kind(
        &self,
        kind: &str,
        opts: &SearchOptions,
    ) -> Result<StrategySearchResult> {
        self.scoped_lookup(kind, opts, Scope::Kind).await
    }

    pub async fn find_by_file(
        &self,
        file: &str,
        opts: &SearchOptions,
    ) -> Result<StrategySearchResult> {
        self.scoped_lookup(file, opts, Scope::File).await
    }

    async fn scoped_lookup(
        &self,
        needle: &str,
        opts: &SearchOptions,
        scope: Scope,
    ) -> Result<StrategySearchResult> {
        let mut scoped = opts.clone();
        match scope {
            Scope::Concept => scoped.concepts = vec![needle.to_string()],
            Scope::Kind => scoped.obs_kinds = vec![needle.to_string()],
            Scope::File => scoped.files = vec![needle.to_string()],
        }

        let overfetch = self.tuning.overfetch(scoped.limit);
        let where_filter = metadata_filter(&scoped);

        let (mut rows, used_vector_store, fell_back) = match self
            .vector
            .query(needle, overfetch, Some(&where_filter))
            .await
        {
            Ok(hits) => {
                let fetched = self.store.get_observations_by_ids(&hits.ids)?;
                let mut by_id: HashMap<i64, Observation> =
                    fetched.into_iter().map(|row| (row.id, row)).collect();
                let rows: Vec<Observation> = hits
                    .ids
                    .iter()
                    .filter_map(|id| by_id.remove(id))
                    .filter(|row| filter::observation_matches(&scoped, row))
                    .take(scoped.limit)
                    .collect();
                (rows, true, false)
            }
            Err(err) => {
                log::warn!("Vector pre-filter failed, using storage filters only: {err}");
                (Vec::new(), false, true)
            }
        };

        if rows.len() < scoped.limit {
            let top_up = self
                .store
                .search_observations(None, &scoped, scoped.limit)?;
            for row in top_up {
                if rows.len() >= scoped.limit {
                    break;
                }
                if !rows.iter().any(|existing| existing.id == row.id) {
                    rows.push(row);
                }
            }
        }

        sort_canonical(&mut rows);
        Ok(StrategySearchResult {
            results: ResultSet {
                observations: rows,
                ..ResultSet::default()
            },
            used_vector_store,
            fell_back,
            strategy: StrategyName::Hybrid,
        })
    }
}
