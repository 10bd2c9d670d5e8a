//! Branch-scoped visibility.
//!
//! Search results are restricted to observations recorded on commits that
//! are ancestors of the caller's current checkout, so context from abandoned
//! branches does not leak into the active branch. Visibility is a precision
//! enhancement, not a security boundary. Whenever it cannot be computed the
//! policy is fail-open: no filter, show more.

use std::collections::BTreeSet;
use std::path::Path;

use recall_storage::MemoryStore;

use crate::ancestry::AncestryResolver;
use crate::error::Result;

/// Resolve the commit filter for a request.
///
/// Explicit SHAs always win, untouched, and the ancestry resolver is never
/// consulted for them. Otherwise, with both `cwd` and at least one project,
/// the candidate set is the union of every SHA recorded for those projects;
/// the resolver narrows it to ancestors of the current position. `None`
/// means "no filter", distinct from `Some(vec![])`, which hides everything.
///
/// Storage failures propagate; resolver failures do not.
pub async fn resolve_branch_filter(
    explicit: Option<Vec<String>>,
    cwd: Option<&str>,
    projects: &[&str],
    store: &MemoryStore,
    resolver: &dyn AncestryResolver,
) -> Result<Option<Vec<String>>> {
    if let Some(shas) = explicit {
        return Ok(Some(shas));
    }

    let Some(cwd) = cwd else {
        return Ok(None);
    };
    if projects.is_empty() {
        return Ok(None);
    }

    // Set union: duplicates collapse; input order never affects the answer.
    let mut candidates: BTreeSet<String> = BTreeSet::new();
    for project in projects {
        candidates.extend(store.get_unique_commit_shas_for_project(project)?);
    }
    if candidates.is_empty() {
        return Ok(None);
    }

    let candidates: Vec<String> = candidates.into_iter().collect();
    match resolver
        .resolve_visible_commit_shas(&candidates, Path::new(cwd))
        .await
    {
        Ok(Some(visible)) => Ok(Some(visible)),
        Ok(None) => Ok(None),
        Err(err) => {
            log::warn!("Ancestry resolution failed, searching without a commit filter: {err}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use recall_storage::NewObservation;

    use super::*;
    use crate::ancestry::StaticAncestryResolver;

    fn store_with_shas(project_shas: &[(&str, &str)]) -> (tempfile::TempDir, MemoryStore) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = MemoryStore::open(dir.path().join("memory.db")).unwrap();
        for (i, (project, sha)) in project_shas.iter().enumerate() {
            store
                .insert_observation(&NewObservation {
                    project: (*project).to_string(),
                    kind: "discovery".to_string(),
                    commit_sha: Some((*sha).to_string()),
                    created_at_epoch: 1_000 + i as i64,
                    ..NewObservation::default()
                })
                .unwrap();
        }
        (dir, store)
    }

    #[tokio::test]
    async fn explicit_shas_skip_resolution_entirely() {
        let (_dir, store) = store_with_shas(&[("p1", "sha-a")]);
        let resolver = StaticAncestryResolver::failing("should never run");

        let filter = resolve_branch_filter(
            Some(vec!["chosen".to_string()]),
            Some("/repo"),
            &["p1"],
            &store,
            &resolver,
        )
        .await
        .unwrap();

        assert_eq!(filter, Some(vec!["chosen".to_string()]));
        assert_eq!(resolver.call_count(), 0);
    }

    #[tokio::test]
    async fn union_of_projects_deduplicates_candidates() {
        let (_dir, store) =
            store_with_shas(&[("p1", "sha-a"), ("p1", "sha-b"), ("p2", "sha-b"), ("p2", "sha-c")]);
        let resolver = StaticAncestryResolver::passthrough();

        let filter = resolve_branch_filter(None, Some("/repo"), &["p1", "p2"], &store, &resolver)
            .await
            .unwrap()
            .unwrap();

        let mut got = filter;
        got.sort();
        assert_eq!(got, vec!["sha-a", "sha-b", "sha-c"]);

        let seen = resolver.seen_candidates();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 3);
    }

    #[tokio::test]
    async fn resolver_failure_is_fail_open() {
        let (_dir, store) = store_with_shas(&[("p1", "sha-a")]);
        let resolver = StaticAncestryResolver::failing("git exploded");

        let filter = resolve_branch_filter(None, Some("/repo"), &["p1"], &store, &resolver)
            .await
            .unwrap();
        assert_eq!(filter, None);
    }

    #[tokio::test]
    async fn non_repo_answer_is_fail_open() {
        let (_dir, store) = store_with_shas(&[("p1", "sha-a")]);
        let resolver = StaticAncestryResolver::not_a_repo();

        let filter = resolve_branch_filter(None, Some("/tmp"), &["p1"], &store, &resolver)
            .await
            .unwrap();
        assert_eq!(filter, None);
    }

    #[tokio::test]
    async fn empty_visible_set_is_a_real_filter() {
        let (_dir, store) = store_with_shas(&[("p1", "sha-a")]);
        let resolver = StaticAncestryResolver::visible(vec![]);

        let filter = resolve_branch_filter(None, Some("/repo"), &["p1"], &store, &resolver)
            .await
            .unwrap();
        assert_eq!(filter, Some(vec![]));
    }

    #[tokio::test]
    async fn missing_cwd_or_project_skips_resolution() {
        let (_dir, store) = store_with_shas(&[("p1", "sha-a")]);
        let resolver = StaticAncestryResolver::passthrough();

        let no_cwd = resolve_branch_filter(None, None, &["p1"], &store, &resolver)
            .await
            .unwrap();
        assert_eq!(no_cwd, None);

        let no_project = resolve_branch_filter(None, Some("/repo"), &[], &store, &resolver)
            .await
            .unwrap();
        assert_eq!(no_project, None);
        assert_eq!(resolver.call_count(), 0);
    }

    #[tokio::test]
    async fn no_recorded_shas_means_no_filter() {
        let (_dir, store) = store_with_shas(&[]);
        let resolver = StaticAncestryResolver::passthrough();

        let filter = resolve_branch_filter(None, Some("/repo"), &["p1"], &store, &resolver)
            .await
            .unwrap();
        assert_eq!(filter, None);
        assert_eq!(resolver.call_count(), 0);
    }
}
