//! # Recall Vector Store
//!
//! Query-side surface of the semantic index.
//!
//! The retrieval engine never indexes or embeds anything itself; it consumes
//! a nearest-neighbour query interface and nothing more. A backend may be
//! absent (never configured), present, or present-but-failing, and the
//! engine is required to tell those states apart; absence is modeled as
//! `Option<Arc<dyn VectorReader>>` at construction time, failure as a
//! [`VectorError`] at call time.
//!
//! Every production call path wraps the backend in [`TimeBounded`], so a
//! hung index process degrades into a recoverable timeout instead of
//! stalling a search indefinitely.

mod bounded;
mod error;
mod reader;
mod static_reader;

pub use bounded::TimeBounded;
pub use error::{Result, VectorError};
pub use reader::{MetadataFilter, VectorHits, VectorReader};
pub use static_reader::StaticVectorReader;
