//! # Recall Protocol
//!
//! Shared data model and query contracts for the Recall memory layer.
//!
//! Everything that crosses a crate boundary lives here: the persisted record
//! shapes (observations, session summaries, user prompts), the normalized
//! query options, the uniform result envelope every search strategy returns,
//! and the canonical return ordering applied to every result set.

mod ordering;
mod query;
mod records;
mod result;
mod timeline;

pub use ordering::{sort_canonical, Ranked};
pub use query::{DateRange, RawSearchArgs, SearchOptions, SearchType};
pub use records::{Observation, Priority, SessionSummary, UserPrompt};
pub use result::{ResultSet, StrategyName, StrategySearchResult};
pub use timeline::{TimelineItem, TimelineKind};
