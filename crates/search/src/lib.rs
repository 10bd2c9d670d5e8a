//! # Recall Search
//!
//! Retrieval engine for the Recall memory layer.
//!
//! ## Pipeline
//!
//! ```text
//! RawSearchArgs
//!     │
//!     ├──> normalize (comma-split fields, date folding, type mapping)
//!     │
//!     ├──> branch visibility (commit ancestry, fail-open)
//!     │
//!     └──> strategy selection
//!            ├─ no free text ──────────────> SqliteSearchStrategy
//!            ├─ free text + vector reader ─> HybridBlendingStrategy
//!            └─ free text, no vector ─────> Bm25SearchStrategy
//! ```
//!
//! Every strategy returns the same tagged envelope, and every result set
//! leaves in the canonical priority order. The vector reader and the git
//! ancestry resolver are optional enhancements whose failures never escape a
//! search; the storage reader is mandatory and its failures always do.

mod ancestry;
mod blend;
mod bm25;
mod chroma;
mod context;
mod error;
mod filter;
mod hybrid;
mod orchestrator;
mod sqlite;
mod timeline;
mod tuning;
mod visibility;

pub use ancestry::{AncestryError, AncestryResolver, GitCliResolver, StaticAncestryResolver};
pub use blend::HybridBlendingStrategy;
pub use bm25::Bm25SearchStrategy;
pub use chroma::ChromaSearchStrategy;
pub use context::{BuiltContext, ContextBuilder, ContextRequest, DEFAULT_TOKEN_BUDGET};
pub use error::{Result, SearchError};
pub use hybrid::HybridSearchStrategy;
pub use orchestrator::{SearchOrchestrator, TimelineRequest};
pub use sqlite::SqliteSearchStrategy;
pub use timeline::{build_timeline, filter_by_depth};
pub use tuning::RetrievalTuning;
pub use visibility::resolve_branch_filter;
