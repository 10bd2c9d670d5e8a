//! Table definitions.
//!
//! Records are immutable after insert, so the FTS5 shadow tables are kept in
//! sync by the insert path alone; no update/delete triggers exist. Schema
//! migrations across versions are handled by an external runner, not here;
//! this bootstrap only creates the current shape on first open.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS observations (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    project           TEXT NOT NULL,
    kind              TEXT NOT NULL,
    priority          TEXT NOT NULL DEFAULT 'informational',
    title             TEXT,
    subtitle          TEXT,
    narrative         TEXT,
    facts             TEXT NOT NULL DEFAULT '[]',
    concepts          TEXT NOT NULL DEFAULT '[]',
    files_read        TEXT NOT NULL DEFAULT '[]',
    files_modified    TEXT NOT NULL DEFAULT '[]',
    commit_sha        TEXT,
    created_at_epoch  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_observations_project
    ON observations(project);
CREATE INDEX IF NOT EXISTS idx_observations_epoch
    ON observations(created_at_epoch);

CREATE VIRTUAL TABLE IF NOT EXISTS observations_fts USING fts5(
    title, subtitle, narrative, facts, concepts,
    content='observations', content_rowid='id'
);

CREATE TABLE IF NOT EXISTS session_summaries (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    project           TEXT NOT NULL,
    priority          TEXT NOT NULL DEFAULT 'informational',
    request           TEXT,
    investigated      TEXT,
    learned           TEXT,
    completed         TEXT,
    next_steps        TEXT,
    commit_sha        TEXT,
    created_at_epoch  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_summaries_project
    ON session_summaries(project);

CREATE VIRTUAL TABLE IF NOT EXISTS summaries_fts USING fts5(
    request, investigated, learned, completed, next_steps,
    content='session_summaries', content_rowid='id'
);

CREATE TABLE IF NOT EXISTS user_prompts (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id        TEXT NOT NULL,
    seq               INTEGER NOT NULL,
    text              TEXT NOT NULL,
    created_at_epoch  INTEGER NOT NULL,
    UNIQUE(session_id, seq)
);

CREATE VIRTUAL TABLE IF NOT EXISTS prompts_fts USING fts5(
    text,
    content='user_prompts', content_rowid='id'
);
";
