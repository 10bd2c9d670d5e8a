use serde::{Deserialize, Serialize};

/// Priority tier of a memory record.
///
/// Critical records sort ahead of everything else in every result set; the
/// tier is the primary key of the canonical return order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Important,
    #[default]
    Informational,
}

impl Priority {
    /// Ordering tier: 0 = critical, 1 = important, 2 = informational.
    #[must_use]
    pub const fn tier(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Important => 1,
            Self::Informational => 2,
        }
    }

    /// Parse a stored priority value.
    ///
    /// Missing or unrecognized values collapse to `Informational`: rows
    /// written before the priority column existed must read as the default
    /// tier, never as an error or a fourth tier.
    #[must_use]
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("critical") => Self::Critical,
            Some("important") => Self::Important,
            _ => Self::Informational,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Informational => "informational",
        }
    }
}

/// An immutable fact record distilled from agent tool use.
///
/// Created once by the ingestion pipeline and never mutated afterwards;
/// `id` is stable and monotonic by insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: i64,
    pub project: String,
    /// Mode-defined observation type, e.g. `discovery`, `bugfix`, `decision`.
    pub kind: String,
    pub priority: Priority,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub narrative: Option<String>,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub files_read: Vec<String>,
    #[serde(default)]
    pub files_modified: Vec<String>,
    /// Source-control commit active when the observation was recorded.
    pub commit_sha: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub created_at_epoch: i64,
}

/// One summary per logical agent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: i64,
    pub project: String,
    pub priority: Priority,
    pub request: Option<String>,
    pub investigated: Option<String>,
    pub learned: Option<String>,
    pub completed: Option<String>,
    pub next_steps: Option<String>,
    pub commit_sha: Option<String>,
    pub created_at_epoch: i64,
}

/// Raw prompt text, keyed by session and a per-session sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPrompt {
    pub id: i64,
    pub session_id: String,
    pub seq: i64,
    pub text: String,
    pub created_at_epoch: i64,
}
