use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 10;

/// Which result collection a search targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Observations,
    Sessions,
    Prompts,
}

impl SearchType {
    /// Map a bare category name onto a search type, if it names one.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "observations" | "observation" => Some(Self::Observations),
            "sessions" | "session" | "summaries" => Some(Self::Sessions),
            "prompts" | "prompt" => Some(Self::Prompts),
            _ => None,
        }
    }
}

/// Inclusive date window over `created_at_epoch`, milliseconds since epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl DateRange {
    #[must_use]
    pub fn contains(&self, epoch: i64) -> bool {
        self.start.map_or(true, |s| epoch >= s) && self.end.map_or(true, |e| epoch <= e)
    }
}

/// Loosely-typed inbound search arguments, as received from transports.
///
/// String list fields arrive comma-separated; `type` may either name a result
/// category (`observations`/`sessions`/`prompts`) or one or more observation
/// kinds. [`SearchOptions::from_raw`] resolves all of that.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchArgs {
    pub query: Option<String>,
    pub project: Option<String>,
    pub limit: Option<usize>,
    #[serde(rename = "type")]
    pub type_field: Option<String>,
    pub search_type: Option<String>,
    pub obs_type: Option<String>,
    pub concepts: Option<String>,
    pub files: Option<String>,
    pub commit_sha: Option<String>,
    pub date_start: Option<i64>,
    pub date_end: Option<i64>,
    pub cwd: Option<String>,
}

/// Normalized, fully-typed query options every strategy consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub query: Option<String>,
    pub project: Option<String>,
    pub limit: usize,
    pub search_type: SearchType,
    pub concepts: Vec<String>,
    pub files: Vec<String>,
    pub obs_kinds: Vec<String>,
    pub date_range: Option<DateRange>,
    /// Explicit commit restriction, or `None` meaning "resolve automatically
    /// from `cwd` + `project`".
    pub commit_shas: Option<Vec<String>>,
    pub cwd: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: None,
            project: None,
            limit: DEFAULT_LIMIT,
            search_type: SearchType::default(),
            concepts: Vec::new(),
            files: Vec::new(),
            obs_kinds: Vec::new(),
            date_range: None,
            commit_shas: None,
            cwd: None,
        }
    }
}

impl SearchOptions {
    /// Normalize raw transport arguments.
    ///
    /// Comma-separated string fields split into arrays, `date_start`/`date_end`
    /// fold into one [`DateRange`], and a bare `type` value naming a result
    /// category is lifted onto `search_type` (any other `type` value is an
    /// observation-kind filter).
    #[must_use]
    pub fn from_raw(raw: RawSearchArgs) -> Self {
        let mut obs_kinds = split_csv(raw.obs_type.as_deref());
        let mut search_type = raw.search_type.as_deref().and_then(SearchType::parse);

        for value in split_csv(raw.type_field.as_deref()) {
            match SearchType::parse(&value) {
                Some(category) => {
                    search_type.get_or_insert(category);
                }
                None => obs_kinds.push(value),
            }
        }

        let commit_shas = match raw.commit_sha.as_deref() {
            Some(field) => {
                let shas = split_csv(Some(field));
                // A present-but-blank field is noise, not an explicit empty
                // restriction (an empty restriction would hide everything).
                if shas.is_empty() {
                    None
                } else {
                    Some(shas)
                }
            }
            None => None,
        };

        let date_range = if raw.date_start.is_some() || raw.date_end.is_some() {
            Some(DateRange {
                start: raw.date_start,
                end: raw.date_end,
            })
        } else {
            None
        };

        Self {
            query: raw.query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
            project: raw.project.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            limit: raw.limit.unwrap_or(DEFAULT_LIMIT).max(1),
            search_type: search_type.unwrap_or_default(),
            concepts: split_csv(raw.concepts.as_deref()),
            files: split_csv(raw.files.as_deref()),
            obs_kinds,
            date_range,
            commit_shas,
            cwd: raw.cwd.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        }
    }

    /// True when the caller gave free text to rank by.
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.trim().is_empty())
    }
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|field| {
        field
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_comma_separated_fields() {
        let opts = SearchOptions::from_raw(RawSearchArgs {
            concepts: Some("auth, retry-loop,,caching ".to_string()),
            files: Some("src/lib.rs,src/db.rs".to_string()),
            commit_sha: Some("abc123,def456".to_string()),
            ..RawSearchArgs::default()
        });

        assert_eq!(opts.concepts, vec!["auth", "retry-loop", "caching"]);
        assert_eq!(opts.files, vec!["src/lib.rs", "src/db.rs"]);
        assert_eq!(opts.commit_shas, Some(vec!["abc123".to_string(), "def456".to_string()]));
    }

    #[test]
    fn bare_type_naming_a_category_maps_to_search_type() {
        let opts = SearchOptions::from_raw(RawSearchArgs {
            type_field: Some("sessions".to_string()),
            ..RawSearchArgs::default()
        });
        assert_eq!(opts.search_type, SearchType::Sessions);
        assert!(opts.obs_kinds.is_empty());
    }

    #[test]
    fn non_category_type_becomes_observation_kind_filter() {
        let opts = SearchOptions::from_raw(RawSearchArgs {
            type_field: Some("bugfix,decision".to_string()),
            ..RawSearchArgs::default()
        });
        assert_eq!(opts.search_type, SearchType::Observations);
        assert_eq!(opts.obs_kinds, vec!["bugfix", "decision"]);
    }

    #[test]
    fn date_bounds_fold_into_one_range() {
        let opts = SearchOptions::from_raw(RawSearchArgs {
            date_start: Some(1_000),
            date_end: Some(2_000),
            ..RawSearchArgs::default()
        });
        let range = opts.date_range.unwrap();
        assert!(range.contains(1_000));
        assert!(range.contains(2_000));
        assert!(!range.contains(2_001));
    }

    #[test]
    fn blank_commit_sha_field_is_not_an_explicit_filter() {
        let opts = SearchOptions::from_raw(RawSearchArgs {
            commit_sha: Some("  , ".to_string()),
            ..RawSearchArgs::default()
        });
        assert_eq!(opts.commit_shas, None);
    }

    #[test]
    fn empty_query_is_dropped() {
        let opts = SearchOptions::from_raw(RawSearchArgs {
            query: Some("   ".to_string()),
            ..RawSearchArgs::default()
        });
        assert!(!opts.has_query());
        assert_eq!(opts.limit, DEFAULT_LIMIT);
    }
}
