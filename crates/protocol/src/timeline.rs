use serde::{Deserialize, Serialize};

use crate::records::{Observation, Priority, SessionSummary, UserPrompt};

/// Marker for the record kind behind a timeline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Observation,
    Summary,
    Prompt,
}

/// One entry in a chronological window of mixed record kinds.
///
/// The serde tag is `record`, not `kind`: observations already carry a
/// `kind` field of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "lowercase")]
pub enum TimelineItem {
    Observation(Observation),
    Summary(SessionSummary),
    Prompt(UserPrompt),
}

impl TimelineItem {
    #[must_use]
    pub const fn kind(&self) -> TimelineKind {
        match self {
            Self::Observation(_) => TimelineKind::Observation,
            Self::Summary(_) => TimelineKind::Summary,
            Self::Prompt(_) => TimelineKind::Prompt,
        }
    }

    #[must_use]
    pub const fn created_at_epoch(&self) -> i64 {
        match self {
            Self::Observation(o) => o.created_at_epoch,
            Self::Summary(s) => s.created_at_epoch,
            Self::Prompt(p) => p.created_at_epoch,
        }
    }

    /// Integer ID usable as a timeline anchor.
    ///
    /// Prompts are keyed by session and sequence, not by a caller-visible ID,
    /// so they are never anchor candidates.
    #[must_use]
    pub const fn anchor_id(&self) -> Option<i64> {
        match self {
            Self::Observation(o) => Some(o.id),
            Self::Summary(s) => Some(s.id),
            Self::Prompt(_) => None,
        }
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        match self {
            Self::Observation(o) => o.priority,
            Self::Summary(s) => s.priority,
            Self::Prompt(_) => Priority::Informational,
        }
    }
}
