use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, VectorError};
use crate::reader::{MetadataFilter, VectorHits, VectorReader};

enum Mode {
    Returning(VectorHits),
    Failing(String),
    Delayed(Duration, VectorHits),
}

/// In-memory reader with canned answers.
///
/// Backs the engine's tests and local smoke runs: it can answer instantly,
/// fail every call, or stall long enough to trip a [`crate::TimeBounded`]
/// timeout. The call counter lets tests assert whether the vector leg was
/// exercised at all.
pub struct StaticVectorReader {
    mode: Mode,
    calls: AtomicUsize,
}

impl StaticVectorReader {
    #[must_use]
    pub fn returning(hits: VectorHits) -> Self {
        Self {
            mode: Mode::Returning(hits),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            mode: Mode::Failing(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn delayed(delay: Duration, hits: VectorHits) -> Self {
        Self {
            mode: Mode::Delayed(delay, hits),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorReader for StaticVectorReader {
    async fn query(
        &self,
        _text: &str,
        limit: usize,
        _where_filter: Option<&MetadataFilter>,
    ) -> Result<VectorHits> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            Mode::Returning(hits) => Ok(truncated(hits, limit)),
            Mode::Failing(message) => Err(VectorError::Backend(message.clone())),
            Mode::Delayed(delay, hits) => {
                tokio::time::sleep(*delay).await;
                Ok(truncated(hits, limit))
            }
        }
    }
}

fn truncated(hits: &VectorHits, limit: usize) -> VectorHits {
    VectorHits {
        ids: hits.ids.iter().copied().take(limit).collect(),
        distances: hits.distances.iter().copied().take(limit).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn canned_hits_respect_the_limit() {
        let reader = StaticVectorReader::returning(VectorHits {
            ids: vec![1, 2, 3],
            distances: vec![0.1, 0.2, 0.3],
        });

        let hits = reader.query("q", 2, None).await.unwrap();
        assert_eq!(hits.ids, vec![1, 2]);
        assert_eq!(reader.call_count(), 1);
    }

    #[tokio::test]
    async fn failing_reader_reports_backend_error() {
        let reader = StaticVectorReader::failing("index offline");
        let err = reader.query("q", 5, None).await.unwrap_err();
        assert!(matches!(err, VectorError::Backend(_)));
    }
}
