//! # Recall Storage
//!
//! Disk-backed storage reader for the Recall memory layer.
//!
//! ## Architecture
//!
//! ```text
//! Retrieval engine / ingestion pipeline
//!         │
//!         └──> MemoryStore (r2d2 pool, WAL)
//!                 │
//!                 ├──> observations / session_summaries / user_prompts
//!                 │
//!                 └──> FTS5 shadow tables (BM25 ranking)
//! ```
//!
//! All calls are synchronous and fast: the store is a local SQLite file in
//! WAL mode with a small read pool, never network I/O. Storage errors are
//! mandatory-infrastructure failures and always propagate to the caller.

mod error;
mod fts;
mod schema;
mod store;

pub use error::{Result, StorageError};
pub use fts::fts_phrase_query;
pub use store::{MemoryStore, NewObservation, NewSessionSummary, NewUserPrompt};
