//! Source-control ancestry resolution.
//!
//! Given the commit SHAs ever recorded for a project and a working
//! directory, decide which of them are ancestors of the current checkout.
//! No git client is guaranteed to exist on the host; every failure mode
//! (missing binary, not a repository, hostile cwd) must collapse into
//! "not applicable" rather than an error the search path has to reason
//! about.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum AncestryError {
    #[error("Failed to invoke git: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Answers "which of these commits are ancestors of the current position?".
#[async_trait]
pub trait AncestryResolver: Send + Sync {
    /// `Ok(None)` means "not a git repository / no answer applicable" and is
    /// treated by callers exactly like an error: no filter.
    async fn resolve_visible_commit_shas(
        &self,
        candidates: &[String],
        cwd: &Path,
    ) -> Result<Option<Vec<String>>, AncestryError>;
}

/// Default resolver shelling out to the `git` binary.
pub struct GitCliResolver {
    /// Upper bound on the history walked by `rev-list`; ancient commits
    /// beyond it are simply treated as not visible.
    rev_list_limit: usize,
}

impl GitCliResolver {
    #[must_use]
    pub fn new(rev_list_limit: usize) -> Self {
        Self { rev_list_limit }
    }
}

impl Default for GitCliResolver {
    fn default() -> Self {
        Self::new(20_000)
    }
}

#[async_trait]
impl AncestryResolver for GitCliResolver {
    async fn resolve_visible_commit_shas(
        &self,
        candidates: &[String],
        cwd: &Path,
    ) -> Result<Option<Vec<String>>, AncestryError> {
        if candidates.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let output = Command::new("git")
            .arg("-C")
            .arg(cwd)
            .arg("rev-list")
            .arg("--max-count")
            .arg(self.rev_list_limit.to_string())
            .arg("HEAD")
            .output()
            .await?;

        if !output.status.success() {
            // Not a repository, detached into nothing, shallow without HEAD:
            // all read as "no answer".
            log::debug!(
                "git rev-list failed in {:?}: {}",
                cwd,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let ancestors: HashSet<&str> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let visible: Vec<String> = candidates
            .iter()
            .filter(|sha| ancestors.contains(sha.as_str()))
            .cloned()
            .collect();

        Ok(Some(visible))
    }
}

/// Scripted resolver for tests: canned outcome plus a record of every
/// candidate set it was asked about.
pub struct StaticAncestryResolver {
    outcome: StaticOutcome,
    seen: Mutex<Vec<Vec<String>>>,
}

enum StaticOutcome {
    Visible(Vec<String>),
    NotARepo,
    Fails(String),
    /// Echo the candidates back unchanged.
    Passthrough,
}

impl StaticAncestryResolver {
    #[must_use]
    pub fn visible(shas: Vec<String>) -> Self {
        Self {
            outcome: StaticOutcome::Visible(shas),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn not_a_repo() -> Self {
        Self {
            outcome: StaticOutcome::NotARepo,
            seen: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: StaticOutcome::Fails(message.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn passthrough() -> Self {
        Self {
            outcome: StaticOutcome::Passthrough,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Candidate sets this resolver has been invoked with, in call order.
    #[must_use]
    pub fn seen_candidates(&self) -> Vec<Vec<String>> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }
}

#[async_trait]
impl AncestryResolver for StaticAncestryResolver {
    async fn resolve_visible_commit_shas(
        &self,
        candidates: &[String],
        _cwd: &Path,
    ) -> Result<Option<Vec<String>>, AncestryError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(candidates.to_vec());
        }
        match &self.outcome {
            StaticOutcome::Visible(shas) => Ok(Some(shas.clone())),
            StaticOutcome::NotARepo => Ok(None),
            StaticOutcome::Fails(message) => Err(AncestryError::Other(message.clone())),
            StaticOutcome::Passthrough => Ok(Some(candidates.to_vec())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_repo_directory_is_not_applicable() {
        let dir = tempfile::TempDir::new().unwrap();
        let resolver = GitCliResolver::default();
        let result = resolver
            .resolve_visible_commit_shas(&["a".repeat(40)], dir.path())
            .await;
        // Either git is installed (Ok(None): not a repo) or missing entirely
        // (spawn error); both must read as "no filter" to the caller.
        match result {
            Ok(answer) => assert!(answer.is_none()),
            Err(AncestryError::Io(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_candidate_set_short_circuits() {
        let resolver = GitCliResolver::default();
        let visible = resolver
            .resolve_visible_commit_shas(&[], Path::new("/nonexistent"))
            .await
            .unwrap();
        assert_eq!(visible, Some(Vec::new()));
    }
}
