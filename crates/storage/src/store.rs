use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{Type, Value};
use rusqlite::{params, Row};

use recall_protocol::{Observation, Priority, SearchOptions, SessionSummary, UserPrompt};

use crate::error::Result;
use crate::fts::fts_phrase_query;
use crate::schema::SCHEMA;

/// Read connections kept warm for query parallelism; WAL allows them to
/// proceed while a writer is active.
const READ_POOL_SIZE: u32 = 4;

const OBS_COLUMNS: &str = "o.id, o.project, o.kind, o.priority, o.title, o.subtitle, \
     o.narrative, o.facts, o.concepts, o.files_read, o.files_modified, \
     o.commit_sha, o.created_at_epoch";

const SUMMARY_COLUMNS: &str = "s.id, s.project, s.priority, s.request, s.investigated, \
     s.learned, s.completed, s.next_steps, s.commit_sha, s.created_at_epoch";

const PROMPT_COLUMNS: &str = "p.id, p.session_id, p.seq, p.text, p.created_at_epoch";

/// Observation fields as supplied by the ingestion pipeline; the store
/// assigns the ID.
#[derive(Debug, Clone, Default)]
pub struct NewObservation {
    pub project: String,
    pub kind: String,
    pub priority: Priority,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub narrative: Option<String>,
    pub facts: Vec<String>,
    pub concepts: Vec<String>,
    pub files_read: Vec<String>,
    pub files_modified: Vec<String>,
    pub commit_sha: Option<String>,
    pub created_at_epoch: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewSessionSummary {
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

#[derive(Debug, Clone, Default)]
pub struct NewUserPrompt {
    pub session_id: String,
    pub seq: i64,
    pub text: String,
    pub created_at_epoch: i64,
}

/// SQLite-backed store for observations, session summaries, and prompts.
///
/// Read results come back in fetch order (BM25 rank for ranked reads,
/// recency for filter-only reads); callers that hand data to users apply the
/// canonical priority ordering themselves.
pub struct MemoryStore {
    pool: Pool<SqliteConnectionManager>,
}

impl MemoryStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref()).with_init(|conn| {
            conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
        });
        log::debug!("Opening memory store at {:?}", path.as_ref());
        Self::from_manager(manager, READ_POOL_SIZE)
    }

    /// In-memory store for tests and smoke runs.
    ///
    /// Pool size is pinned to 1: every pooled connection would otherwise see
    /// its own private database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_manager(SqliteConnectionManager::memory(), 1)
    }

    fn from_manager(manager: SqliteConnectionManager, max_size: u32) -> Result<Self> {
        let pool = Pool::builder().max_size(max_size).build(manager)?;
        pool.get()?.execute_batch(SCHEMA)?;
        Ok(Self { pool })
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Keyword or filter-only observation search.
    ///
    /// With `query`: FTS5 `MATCH` ranked by `bm25()`, best first. Without:
    /// structured filters only, newest first. `limit` is passed explicitly so
    /// ranking strategies can over-fetch without mutating the caller's
    /// options.
    pub fn search_observations(
        &self,
        query: Option<&str>,
        opts: &SearchOptions,
        limit: usize,
    ) -> Result<Vec<Observation>> {
        let mut params: Vec<Value> = Vec::new();
        let mut filters = String::new();
        observation_filters(opts, &mut filters, &mut params);

        let sql = match query.and_then(fts_phrase_query) {
            Some(match_expr) => {
                params.insert(0, Value::from(match_expr));
                format!(
                    "SELECT {OBS_COLUMNS}, bm25(observations_fts) AS rank \
                     FROM observations_fts f \
                     JOIN observations o ON f.rowid = o.id \
                     WHERE observations_fts MATCH ?{filters} \
                     ORDER BY rank LIMIT {limit}"
                )
            }
            None if query.is_some() => return Ok(Vec::new()),
            None => format!(
                "SELECT {OBS_COLUMNS} FROM observations o \
                 WHERE 1=1{filters} \
                 ORDER BY o.created_at_epoch DESC LIMIT {limit}"
            ),
        };

        self.query_observations(&sql, params)
    }

    pub fn search_summaries(
        &self,
        query: Option<&str>,
        opts: &SearchOptions,
        limit: usize,
    ) -> Result<Vec<SessionSummary>> {
        let mut params: Vec<Value> = Vec::new();
        let mut filters = String::new();
        summary_filters(opts, &mut filters, &mut params);

        let sql = match query.and_then(fts_phrase_query) {
            Some(match_expr) => {
                params.insert(0, Value::from(match_expr));
                format!(
                    "SELECT {SUMMARY_COLUMNS}, bm25(summaries_fts) AS rank \
                     FROM summaries_fts f \
                     JOIN session_summaries s ON f.rowid = s.id \
                     WHERE summaries_fts MATCH ?{filters} \
                     ORDER BY rank LIMIT {limit}"
                )
            }
            None if query.is_some() => return Ok(Vec::new()),
            None => format!(
                "SELECT {SUMMARY_COLUMNS} FROM session_summaries s \
                 WHERE 1=1{filters} \
                 ORDER BY s.created_at_epoch DESC LIMIT {limit}"
            ),
        };

        self.query_summaries(&sql, params)
    }

    /// Prompts carry no project or priority column; only the date window
    /// applies besides the text match.
    pub fn search_user_prompts(
        &self,
        query: Option<&str>,
        opts: &SearchOptions,
        limit: usize,
    ) -> Result<Vec<UserPrompt>> {
        let mut params: Vec<Value> = Vec::new();
        let mut filters = String::new();
        if let Some(range) = &opts.date_range {
            if let Some(start) = range.start {
                filters.push_str(" AND p.created_at_epoch >= ?");
                params.push(Value::from(start));
            }
            if let Some(end) = range.end {
                filters.push_str(" AND p.created_at_epoch <= ?");
                params.push(Value::from(end));
            }
        }

        let sql = match query.and_then(fts_phrase_query) {
            Some(match_expr) => {
                params.insert(0, Value::from(match_expr));
                format!(
                    "SELECT {PROMPT_COLUMNS}, bm25(prompts_fts) AS rank \
                     FROM prompts_fts f \
                     JOIN user_prompts p ON f.rowid = p.id \
                     WHERE prompts_fts MATCH ?{filters} \
                     ORDER BY rank LIMIT {limit}"
                )
            }
            None if query.is_some() => return Ok(Vec::new()),
            None => format!(
                "SELECT {PROMPT_COLUMNS} FROM user_prompts p \
                 WHERE 1=1{filters} \
                 ORDER BY p.created_at_epoch DESC LIMIT {limit}"
            ),
        };

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), prompt_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Batch row lookup. Row order is whatever SQLite returns; callers
    /// re-order to their own rank.
    pub fn get_observations_by_ids(&self, ids: &[i64]) -> Result<Vec<Observation>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {OBS_COLUMNS} FROM observations o WHERE o.id IN ({})",
            placeholders(ids.len())
        );
        let params: Vec<Value> = ids.iter().copied().map(Value::from).collect();
        self.query_observations(&sql, params)
    }

    pub fn get_summaries_by_ids(&self, ids: &[i64]) -> Result<Vec<SessionSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM session_summaries s WHERE s.id IN ({})",
            placeholders(ids.len())
        );
        let params: Vec<Value> = ids.iter().copied().map(Value::from).collect();
        self.query_summaries(&sql, params)
    }

    pub fn get_prompts_by_ids(&self, ids: &[i64]) -> Result<Vec<UserPrompt>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {PROMPT_COLUMNS} FROM user_prompts p WHERE p.id IN ({})",
            placeholders(ids.len())
        );
        let params: Vec<Value> = ids.iter().copied().map(Value::from).collect();
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), prompt_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Distinct commit SHAs ever recorded for a project, across observations
    /// and session summaries. Candidate set for branch-visibility resolution.
    pub fn get_unique_commit_shas_for_project(&self, project: &str) -> Result<Vec<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT commit_sha FROM observations \
             WHERE project = ?1 AND commit_sha IS NOT NULL \
             UNION \
             SELECT DISTINCT commit_sha FROM session_summaries \
             WHERE project = ?1 AND commit_sha IS NOT NULL",
        )?;
        let rows = stmt.query_map(params![project], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Observations tagged with a concept, newest first.
    pub fn find_by_concept(&self, concept: &str, opts: &SearchOptions, limit: usize) -> Result<Vec<Observation>> {
        let mut scoped = opts.clone();
        scoped.concepts = vec![concept.to_string()];
        self.search_observations(None, &scoped, limit)
    }

    /// Observations of a given kind (e.g. `bugfix`), newest first.
    pub fn find_by_kind(&self, kind: &str, opts: &SearchOptions, limit: usize) -> Result<Vec<Observation>> {
        let mut scoped = opts.clone();
        scoped.obs_kinds = vec![kind.to_string()];
        self.search_observations(None, &scoped, limit)
    }

    /// Observations that read or modified a file, newest first.
    pub fn find_by_file(&self, file: &str, opts: &SearchOptions, limit: usize) -> Result<Vec<Observation>> {
        let mut scoped = opts.clone();
        scoped.files = vec![file.to_string()];
        self.search_observations(None, &scoped, limit)
    }

    // ------------------------------------------------------------------
    // Writes (ingestion pipeline and test fixtures)
    // ------------------------------------------------------------------

    pub fn insert_observation(&self, new: &NewObservation) -> Result<i64> {
        let facts = serde_json::to_string(&new.facts)?;
        let concepts = serde_json::to_string(&new.concepts)?;
        let files_read = serde_json::to_string(&new.files_read)?;
        let files_modified = serde_json::to_string(&new.files_modified)?;

        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO observations \
             (project, kind, priority, title, subtitle, narrative, facts, concepts, \
              files_read, files_modified, commit_sha, created_at_epoch) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                new.project,
                new.kind,
                new.priority.as_str(),
                new.title,
                new.subtitle,
                new.narrative,
                facts,
                concepts,
                files_read,
                files_modified,
                new.commit_sha,
                new.created_at_epoch,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO observations_fts (rowid, title, subtitle, narrative, facts, concepts) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, new.title, new.subtitle, new.narrative, facts, concepts],
        )?;
        tx.commit()?;
        Ok(id)
    }

    pub fn insert_summary(&self, new: &NewSessionSummary) -> Result<i64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO session_summaries \
             (project, priority, request, investigated, learned, completed, next_steps, \
              commit_sha, created_at_epoch) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                new.project,
                new.priority.as_str(),
                new.request,
                new.investigated,
                new.learned,
                new.completed,
                new.next_steps,
                new.commit_sha,
                new.created_at_epoch,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO summaries_fts (rowid, request, investigated, learned, completed, next_steps) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, new.request, new.investigated, new.learned, new.completed, new.next_steps],
        )?;
        tx.commit()?;
        Ok(id)
    }

    pub fn insert_prompt(&self, new: &NewUserPrompt) -> Result<i64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO user_prompts (session_id, seq, text, created_at_epoch) \
             VALUES (?1, ?2, ?3, ?4)",
            params![new.session_id, new.seq, new.text, new.created_at_epoch],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO prompts_fts (rowid, text) VALUES (?1, ?2)",
            params![id, new.text],
        )?;
        tx.commit()?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Row plumbing
    // ------------------------------------------------------------------

    fn query_observations(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Observation>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), observation_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn query_summaries(&self, sql: &str, params: Vec<Value>) -> Result<Vec<SessionSummary>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), summary_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn observation_filters(opts: &SearchOptions, sql: &mut String, params: &mut Vec<Value>) {
    if let Some(project) = &opts.project {
        sql.push_str(" AND o.project = ?");
        params.push(Value::from(project.clone()));
    }
    if !opts.obs_kinds.is_empty() {
        sql.push_str(&format!(" AND o.kind IN ({})", placeholders(opts.obs_kinds.len())));
        params.extend(opts.obs_kinds.iter().cloned().map(Value::from));
    }
    if let Some(shas) = &opts.commit_shas {
        if shas.is_empty() {
            // An explicit empty restriction matches nothing.
            sql.push_str(" AND 0");
        } else {
            sql.push_str(&format!(" AND o.commit_sha IN ({})", placeholders(shas.len())));
            params.extend(shas.iter().cloned().map(Value::from));
        }
    }
    if let Some(range) = &opts.date_range {
        if let Some(start) = range.start {
            sql.push_str(" AND o.created_at_epoch >= ?");
            params.push(Value::from(start));
        }
        if let Some(end) = range.end {
            sql.push_str(" AND o.created_at_epoch <= ?");
            params.push(Value::from(end));
        }
    }
    for concept in &opts.concepts {
        sql.push_str(" AND o.concepts LIKE ? ESCAPE '\\'");
        params.push(Value::from(json_token_pattern(concept)));
    }
    for file in &opts.files {
        sql.push_str(
            " AND (o.files_read LIKE ? ESCAPE '\\' OR o.files_modified LIKE ? ESCAPE '\\')",
        );
        let pattern = json_token_pattern(file);
        params.push(Value::from(pattern.clone()));
        params.push(Value::from(pattern));
    }
}

fn summary_filters(opts: &SearchOptions, sql: &mut String, params: &mut Vec<Value>) {
    if let Some(project) = &opts.project {
        sql.push_str(" AND s.project = ?");
        params.push(Value::from(project.clone()));
    }
    if let Some(shas) = &opts.commit_shas {
        if shas.is_empty() {
            sql.push_str(" AND 0");
        } else {
            sql.push_str(&format!(" AND s.commit_sha IN ({})", placeholders(shas.len())));
            params.extend(shas.iter().cloned().map(Value::from));
        }
    }
    if let Some(range) = &opts.date_range {
        if let Some(start) = range.start {
            sql.push_str(" AND s.created_at_epoch >= ?");
            params.push(Value::from(start));
        }
        if let Some(end) = range.end {
            sql.push_str(" AND s.created_at_epoch <= ?");
            params.push(Value::from(end));
        }
    }
}

fn placeholders(count: usize) -> String {
    let mut out = String::with_capacity(count * 2);
    for i in 0..count {
        if i > 0 {
            out.push(',');
        }
        out.push('?');
    }
    out
}

/// LIKE pattern matching one JSON-encoded string token inside a stored JSON
/// array column, with LIKE wildcards escaped.
fn json_token_pattern(token: &str) -> String {
    let encoded =
        serde_json::to_string(token).unwrap_or_else(|_| format!("\"{token}\""));
    let escaped = encoded
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn json_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<Observation> {
    let priority: Option<String> = row.get(3)?;
    Ok(Observation {
        id: row.get(0)?,
        project: row.get(1)?,
        kind: row.get(2)?,
        priority: Priority::from_stored(priority.as_deref()),
        title: row.get(4)?,
        subtitle: row.get(5)?,
        narrative: row.get(6)?,
        facts: json_list(row, 7)?,
        concepts: json_list(row, 8)?,
        files_read: json_list(row, 9)?,
        files_modified: json_list(row, 10)?,
        commit_sha: row.get(11)?,
        created_at_epoch: row.get(12)?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<SessionSummary> {
    let priority: Option<String> = row.get(2)?;
    Ok(SessionSummary {
        id: row.get(0)?,
        project: row.get(1)?,
        priority: Priority::from_stored(priority.as_deref()),
        request: row.get(3)?,
        investigated: row.get(4)?,
        learned: row.get(5)?,
        completed: row.get(6)?,
        next_steps: row.get(7)?,
        commit_sha: row.get(8)?,
        created_at_epoch: row.get(9)?,
    })
}

fn prompt_from_row(row: &Row<'_>) -> rusqlite::Result<UserPrompt> {
    Ok(UserPrompt {
        id: row.get(0)?,
        session_id: row.get(1)?,
        seq: row.get(2)?,
        text: row.get(3)?,
        created_at_epoch: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, MemoryStore) {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::open(dir.path().join("memory.db")).unwrap();
        (dir, store)
    }

    fn seed(store: &MemoryStore, title: &str, kind: &str, epoch: i64) -> i64 {
        store
            .insert_observation(&NewObservation {
                project: "demo".to_string(),
                kind: kind.to_string(),
                title: Some(title.to_string()),
                narrative: Some(format!("narrative about {title}")),
                concepts: vec!["caching".to_string()],
                files_read: vec!["src/cache.rs".to_string()],
                commit_sha: Some("sha-a".to_string()),
                created_at_epoch: epoch,
                ..NewObservation::default()
            })
            .unwrap()
    }

    #[test]
    fn keyword_search_ranks_with_fts() {
        let (_dir, store) = store();
        seed(&store, "connection pool exhaustion", "bugfix", 1_000);
        seed(&store, "cache invalidation bug", "bugfix", 2_000);

        let opts = SearchOptions::default();
        let hits = store.search_observations(Some("cache invalidation"), &opts, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title.as_deref(), Some("cache invalidation bug"));
    }

    #[test]
    fn filter_only_search_returns_newest_first() {
        let (_dir, store) = store();
        let a = seed(&store, "first", "discovery", 1_000);
        let b = seed(&store, "second", "discovery", 2_000);

        let opts = SearchOptions::default();
        let hits = store.search_observations(None, &opts, 10).unwrap();
        let ids: Vec<i64> = hits.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn kind_and_commit_filters_apply() {
        let (_dir, store) = store();
        seed(&store, "one", "bugfix", 1_000);
        seed(&store, "two", "decision", 2_000);

        let mut opts = SearchOptions::default();
        opts.obs_kinds = vec!["decision".to_string()];
        let hits = store.search_observations(None, &opts, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, "decision");

        let mut opts = SearchOptions::default();
        opts.commit_shas = Some(vec!["sha-other".to_string()]);
        assert!(store.search_observations(None, &opts, 10).unwrap().is_empty());

        // An explicit empty restriction hides everything.
        let mut opts = SearchOptions::default();
        opts.commit_shas = Some(vec![]);
        assert!(store.search_observations(None, &opts, 10).unwrap().is_empty());
    }

    #[test]
    fn concept_and_file_lookups_match_whole_tokens() {
        let (_dir, store) = store();
        seed(&store, "hit", "discovery", 1_000);

        let opts = SearchOptions::default();
        assert_eq!(store.find_by_concept("caching", &opts, 10).unwrap().len(), 1);
        assert!(store.find_by_concept("cach", &opts, 10).unwrap().is_empty());
        assert_eq!(store.find_by_file("src/cache.rs", &opts, 10).unwrap().len(), 1);
        assert!(store.find_by_file("cache.rs", &opts, 10).unwrap().is_empty());
    }

    #[test]
    fn batch_lookup_returns_requested_rows() {
        let (_dir, store) = store();
        let a = seed(&store, "a", "discovery", 1_000);
        let _b = seed(&store, "b", "discovery", 2_000);
        let c = seed(&store, "c", "discovery", 3_000);

        let mut got: Vec<i64> = store
            .get_observations_by_ids(&[c, a])
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        got.sort_unstable();
        assert_eq!(got, vec![a, c]);
        assert!(store.get_observations_by_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn unique_shas_union_observations_and_summaries() {
        let (_dir, store) = store();
        seed(&store, "a", "discovery", 1_000);
        store
            .insert_summary(&NewSessionSummary {
                project: "demo".to_string(),
                request: Some("ship it".to_string()),
                commit_sha: Some("sha-b".to_string()),
                created_at_epoch: 2_000,
                ..NewSessionSummary::default()
            })
            .unwrap();

        let mut shas = store.get_unique_commit_shas_for_project("demo").unwrap();
        shas.sort();
        assert_eq!(shas, vec!["sha-a".to_string(), "sha-b".to_string()]);
        assert!(store.get_unique_commit_shas_for_project("other").unwrap().is_empty());
    }

    #[test]
    fn hostile_query_text_is_not_an_error() {
        let (_dir, store) = store();
        seed(&store, "anything", "discovery", 1_000);

        let opts = SearchOptions::default();
        for nasty in ["AND OR NOT", "a NEAR/3 b", "col:x*", "\"\"\"", "((("] {
            store.search_observations(Some(nasty), &opts, 10).unwrap();
        }
    }

    #[test]
    fn prompt_search_matches_text() {
        let (_dir, store) = store();
        store
            .insert_prompt(&NewUserPrompt {
                session_id: "s1".to_string(),
                seq: 1,
                text: "please fix the flaky websocket test".to_string(),
                created_at_epoch: 1_000,
            })
            .unwrap();

        let opts = SearchOptions::default();
        let hits = store.search_user_prompts(Some("websocket"), &opts, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].session_id, "s1");
    }
}
