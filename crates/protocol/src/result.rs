use serde::{Deserialize, Serialize};

use crate::records::{Observation, SessionSummary, UserPrompt};

/// Which strategy produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    Sqlite,
    Bm25,
    Chroma,
    Hybrid,
    HybridBlend,
}

/// The three result collections a query can populate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub observations: Vec<Observation>,
    #[serde(default)]
    pub sessions: Vec<SessionSummary>,
    #[serde(default)]
    pub prompts: Vec<UserPrompt>,
}

impl ResultSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty() && self.sessions.is_empty() && self.prompts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len() + self.sessions.len() + self.prompts.len()
    }
}

/// Uniform envelope every search strategy returns.
///
/// The provenance flags let callers distinguish a vector store that was never
/// configured (`used_vector_store: false, fell_back: false`) from one that
/// failed at call time (`fell_back: true`), without inspecting strategy
/// internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySearchResult {
    pub results: ResultSet,
    pub used_vector_store: bool,
    pub fell_back: bool,
    pub strategy: StrategyName,
}

impl StrategySearchResult {
    #[must_use]
    pub fn new(results: ResultSet, strategy: StrategyName) -> Self {
        Self {
            results,
            used_vector_store: false,
            fell_back: false,
            strategy,
        }
    }
}
