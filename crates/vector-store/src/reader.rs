use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use recall_protocol::SearchType;

use crate::error::Result;

/// Metadata restriction attached to a nearest-neighbour query.
///
/// Backends that support server-side filtering apply it before ranking;
/// backends that do not may ignore it, since callers re-filter through the
/// storage layer anyway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub project: Option<String>,
    pub doc: Option<SearchType>,
    #[serde(default)]
    pub kinds: Vec<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// IDs with distance scores, best (smallest distance) first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorHits {
    pub ids: Vec<i64>,
    pub distances: Vec<f32>,
}

impl VectorHits {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Async nearest-neighbour query over embedded memory records.
///
/// Calls may be slow or fail at any time; callers catch errors at the call
/// site and degrade, they never let one escape a search.
#[async_trait]
pub trait VectorReader: Send + Sync {
    async fn query(
        &self,
        text: &str,
        limit: usize,
        where_filter: Option<&MetadataFilter>,
    ) -> Result<VectorHits>;
}

#[async_trait]
impl<R: VectorReader + ?Sized> VectorReader for Arc<R> {
    async fn query(
        &self,
        text: &str,
        limit: usize,
        where_filter: Option<&MetadataFilter>,
    ) -> Result<VectorHits> {
        (**self).query(text, limit, where_filter).await
    }
}
