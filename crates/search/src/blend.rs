//! Hybrid blending: one ranked list out of two differently-scaled sources.
//!
//! BM25 relevance and vector cosine distance do not share a numeric range,
//! so raw scores are never compared across sources. Fusion is rank-only:
//! each list contributes `1/(k + rank)` per item, ranks 1-based, and an item
//! missing from a list contributes nothing for it. The constant `k` dampens
//! rank-1 dominance.

use std::collections::HashMap;
use std::sync::Arc;

use recall_protocol::{
    sort_canonical, Observation, ResultSet, SearchOptions, SearchType, SessionSummary,
    StrategyName, StrategySearchResult, UserPrompt,
};
use recall_storage::MemoryStore;
use recall_vector_store::VectorReader;

use crate::bm25::Bm25SearchStrategy;
use crate::chroma::ChromaSearchStrategy;
use crate::error::Result;
use crate::filter;
use crate::tuning::RetrievalTuning;

/// Fuses the lexical and semantic strategies into one ordered list.
///
/// Selected whenever free text is present and a vector reader is
/// configured. A vector failure at call time degrades to lexical-only
/// results with `fell_back: true`, the single path where that flag is set.
pub struct HybridBlendingStrategy {
    store: Arc<MemoryStore>,
    bm25: Bm25SearchStrategy,
    chroma: ChromaSearchStrategy,
    tuning: RetrievalTuning,
}

impl HybridBlendingStrategy {
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        vector: Arc<dyn VectorReader>,
        tuning: RetrievalTuning,
    ) -> Self {
        Self {
            bm25: Bm25SearchStrategy::new(Arc::clone(&store)),
            chroma: ChromaSearchStrategy::new(Arc::clone(&store), vector, tuning.clone()),
            store,
            tuning,
        }
    }

    pub async fn search(&self, opts: &SearchOptions) -> Result<StrategySearchResult> {
        let query = opts.query.as_deref().unwrap_or_default();
        let overfetch = self.tuning.overfetch(opts.limit);

        // Fan out: the two legs are independent I/O, issued concurrently and
        // joined once both settle.
        let (lexical, semantic) = tokio::join!(
            async { self.lexical_leg(query, opts, overfetch) },
            self.chroma.ranked_ids(query, opts, overfetch),
        );
        let lexical = lexical?;

        let (semantic_ids, used_vector_store, fell_back) = match semantic {
            Ok(ids) => (ids, true, false),
            Err(err) => {
                log::warn!("Vector leg failed, continuing with lexical results only: {err}");
                (Vec::new(), false, true)
            }
        };

        let fused = fuse_rrf(
            &[lexical.ids(), semantic_ids],
            self.tuning.rrf_k,
        );

        let results = self.resolve(opts, lexical, fused)?;
        Ok(StrategySearchResult {
            results,
            used_vector_store,
            fell_back,
            strategy: StrategyName::HybridBlend,
        })
    }

    fn lexical_leg(&self, query: &str, opts: &SearchOptions, limit: usize) -> Result<Lexical> {
        Ok(match opts.search_type {
            SearchType::Observations => {
                Lexical::Observations(self.bm25.ranked_observations(query, opts, limit)?)
            }
            SearchType::Sessions => {
                Lexical::Sessions(self.bm25.ranked_summaries(query, opts, limit)?)
            }
            SearchType::Prompts => Lexical::Prompts(self.bm25.ranked_prompts(query, opts, limit)?),
        })
    }

    /// Materialize the fused ID order as rows.
    ///
    /// Lexical candidates already carry their rows; semantic-only IDs are
    /// resolved through one batch storage call and re-checked against the
    /// structured filters before they can enter the result.
    fn resolve(&self, opts: &SearchOptions, lexical: Lexical, fused: Vec<i64>) -> Result<ResultSet> {
        let mut results = ResultSet::default();
        match lexical {
            Lexical::Observations(rows) => {
                let mut by_id: HashMap<i64, Observation> =
                    rows.into_iter().map(|row| (row.id, row)).collect();
                let missing: Vec<i64> = fused
                    .iter()
                    .copied()
                    .filter(|id| !by_id.contains_key(id))
                    .collect();
                for row in self.store.get_observations_by_ids(&missing)? {
                    if filter::observation_matches(opts, &row) {
                        by_id.insert(row.id, row);
                    }
                }
                results.observations = fused
                    .into_iter()
                    .filter_map(|id| by_id.remove(&id))
                    .take(opts.limit)
                    .collect();
                sort_canonical(&mut results.observations);
            }
            Lexical::Sessions(rows) => {
                let mut by_id: HashMap<i64, SessionSummary> =
                    rows.into_iter().map(|row| (row.id, row)).collect();
                let missing: Vec<i64> = fused
                    .iter()
                    .copied()
                    .filter(|id| !by_id.contains_key(id))
                    .collect();
                for row in self.store.get_summaries_by_ids(&missing)? {
                    if filter::summary_matches(opts, &row) {
                        by_id.insert(row.id, row);
                    }
                }
                results.sessions = fused
                    .into_iter()
                    .filter_map(|id| by_id.remove(&id))
                    .take(opts.limit)
                    .collect();
                sort_canonical(&mut results.sessions);
            }
            Lexical::Prompts(rows) => {
                let mut by_id: HashMap<i64, UserPrompt> =
                    rows.into_iter().map(|row| (row.id, row)).collect();
                let missing: Vec<i64> = fused
                    .iter()
                    .copied()
                    .filter(|id| !by_id.contains_key(id))
                    .collect();
                for row in self.store.get_prompts_by_ids(&missing)? {
                    if filter::prompt_matches(opts, &row) {
                        by_id.insert(row.id, row);
                    }
                }
                results.prompts = fused
                    .into_iter()
                    .filter_map(|id| by_id.remove(&id))
                    .take(opts.limit)
                    .collect();
                sort_canonical(&mut results.prompts);
            }
        }
        Ok(results)
    }
}

enum Lexical {
    Observations(Vec<Observation>),
    Sessions(Vec<SessionSummary>),
    Prompts(Vec<UserPrompt>),
}

impl Lexical {
    fn ids(&self) -> Vec<i64> {
        match self {
            Self::Observations(rows) => rows.iter().map(|r| r.id).collect(),
            Self::Sessions(rows) => rows.iter().map(|r| r.id).collect(),
            Self::Prompts(rows) => rows.iter().map(|r| r.id).collect(),
        }
    }
}

/// Reciprocal rank fusion over candidate ID lists.
///
/// Returns unique IDs ordered by decreasing fused score. On score ties, an
/// ID present in more lists wins; agreement between independent signals is
/// itself evidence of relevance; remaining ties break on ID for determinism.
pub(crate) fn fuse_rrf(rankings: &[Vec<i64>], k: f32) -> Vec<i64> {
    let mut scores: HashMap<i64, (f32, u32)> = HashMap::new();

    for ranking in rankings {
        for (rank, id) in ranking.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let contribution = 1.0 / (k + rank as f32 + 1.0);
            let entry = scores.entry(*id).or_insert((0.0, 0));
            entry.0 += contribution;
            entry.1 += 1;
        }
    }

    let mut fused: Vec<(i64, f32, u32)> = scores
        .into_iter()
        .map(|(id, (score, lists))| (id, score, lists))
        .collect();
    fused.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(&b.0))
    });
    fused.into_iter().map(|(id, _, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_in_both_lists_rank_first() {
        let fused = fuse_rrf(&[vec![1, 2, 3], vec![3, 4, 5]], 60.0);
        assert_eq!(fused[0], 3);
        assert_eq!(fused.len(), 5);
    }

    #[test]
    fn missing_list_contributes_zero() {
        let solo = fuse_rrf(&[vec![9], vec![]], 60.0);
        assert_eq!(solo, vec![9]);
    }

    #[test]
    fn agreement_beats_an_equal_single_source_score() {
        // With k = 0: rank 1 in one list scores 1.0, and rank 2 in both
        // lists scores 1/2 + 1/2 = 1.0, an exact tie. The ID present in
        // both lists must win it; the remaining tie breaks on ID.
        let fused = fuse_rrf(&[vec![1, 2], vec![3, 2]], 0.0);
        assert_eq!(fused, vec![2, 1, 3]);
    }

    #[test]
    fn equal_everything_breaks_on_id() {
        let tied = fuse_rrf(&[vec![7], vec![4]], 60.0);
        assert_eq!(tied, vec![4, 7]);
    }

    #[test]
    fn rank_one_dominance_is_dampened() {
        // With a large k the gap between rank 1 and rank 2 is small, so an
        // item placed second in both lists outranks one placed first in one.
        let fused = fuse_rrf(&[vec![1, 2], vec![3, 2]], 60.0);
        assert_eq!(fused[0], 2);
    }
}
