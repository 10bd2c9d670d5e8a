//! In-memory counterparts of the storage-side SQL filters.
//!
//! Rows resolved from vector IDs bypass the SQL WHERE clauses, so semantic
//! candidates are re-checked here before they can enter a result set. These
//! predicates must accept exactly what the SQL filters accept.

use recall_protocol::{Observation, SearchOptions, SessionSummary, UserPrompt};

pub(crate) fn observation_matches(opts: &SearchOptions, obs: &Observation) -> bool {
    if let Some(project) = &opts.project {
        if &obs.project != project {
            return false;
        }
    }
    if !opts.obs_kinds.is_empty() && !opts.obs_kinds.iter().any(|k| k == &obs.kind) {
        return false;
    }
    if let Some(shas) = &opts.commit_shas {
        match &obs.commit_sha {
            Some(sha) if shas.contains(sha) => {}
            _ => return false,
        }
    }
    if let Some(range) = &opts.date_range {
        if !range.contains(obs.created_at_epoch) {
            return false;
        }
    }
    if !opts.concepts.is_empty() && !opts.concepts.iter().all(|c| obs.concepts.contains(c)) {
        return false;
    }
    if !opts.files.is_empty()
        && !opts
            .files
            .iter()
            .all(|f| obs.files_read.contains(f) || obs.files_modified.contains(f))
    {
        return false;
    }
    true
}

pub(crate) fn summary_matches(opts: &SearchOptions, summary: &SessionSummary) -> bool {
    if let Some(project) = &opts.project {
        if &summary.project != project {
            return false;
        }
    }
    if let Some(shas) = &opts.commit_shas {
        match &summary.commit_sha {
            Some(sha) if shas.contains(sha) => {}
            _ => return false,
        }
    }
    if let Some(range) = &opts.date_range {
        if !range.contains(summary.created_at_epoch) {
            return false;
        }
    }
    true
}

pub(crate) fn prompt_matches(opts: &SearchOptions, prompt: &UserPrompt) -> bool {
    if let Some(range) = &opts.date_range {
        if !range.contains(prompt.created_at_epoch) {
            return false;
        }
    }
    true
}
