use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Retrieval knobs with reference defaults.
///
/// The fusion constant and over-fetch multiplier are tunables, not
/// invariants; deployments override them through a JSON or TOML file the
/// same way other engine profiles are shipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalTuning {
    /// Reciprocal-rank-fusion dampening constant.
    pub rrf_k: f32,
    /// Candidate over-fetch multiplier for ranked legs feeding fusion.
    pub overfetch_factor: usize,
    /// Wall-clock bound on any single vector query.
    pub vector_timeout_ms: u64,
    /// Cap on `git rev-list` output scanned during ancestry resolution.
    pub rev_list_limit: usize,
    /// How many recent rows of each kind feed a timeline reconstruction.
    pub timeline_fetch_window: usize,
}

impl Default for RetrievalTuning {
    fn default() -> Self {
        Self {
            rrf_k: 60.0,
            overfetch_factor: 3,
            vector_timeout_ms: 3_000,
            rev_list_limit: 20_000,
            timeline_fetch_window: 500,
        }
    }
}

impl RetrievalTuning {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tuning file {}", path.display()))?;
        Self::from_str_any(&raw)
    }

    /// Accepts JSON or TOML, trying JSON first.
    pub fn from_str_any(raw: &str) -> Result<Self> {
        match serde_json::from_str(raw) {
            Ok(tuning) => Ok(tuning),
            Err(json_err) => toml::from_str(raw).map_err(|toml_err| {
                anyhow!(
                    "Tuning is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}"
                )
            }),
        }
    }

    #[must_use]
    pub fn overfetch(&self, limit: usize) -> usize {
        limit.max(1) * self.overfetch_factor.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_carry_reference_constants() {
        let tuning = RetrievalTuning::default();
        assert_eq!(tuning.rrf_k, 60.0);
        assert_eq!(tuning.overfetch(10), 30);
    }

    #[test]
    fn loads_from_json_and_toml() {
        let json: RetrievalTuning =
            RetrievalTuning::from_str_any(r#"{ "rrf_k": 30.0, "overfetch_factor": 2 }"#).unwrap();
        assert_eq!(json.rrf_k, 30.0);
        assert_eq!(json.overfetch_factor, 2);
        assert_eq!(json.vector_timeout_ms, RetrievalTuning::default().vector_timeout_ms);

        let toml: RetrievalTuning =
            RetrievalTuning::from_str_any("rrf_k = 15.0\nvector_timeout_ms = 250\n").unwrap();
        assert_eq!(toml.rrf_k, 15.0);
        assert_eq!(toml.vector_timeout_ms, 250);
    }

    #[test]
    fn rejects_garbage() {
        assert!(RetrievalTuning::from_str_any("rrf_k: nope").is_err());
    }

    #[test]
    fn overfetch_never_collapses_to_zero() {
        let mut tuning = RetrievalTuning::default();
        tuning.overfetch_factor = 0;
        assert_eq!(tuning.overfetch(0), 1);
    }
}
