use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, VectorError};
use crate::reader::{MetadataFilter, VectorHits, VectorReader};

/// Decorator that bounds every query with a wall-clock timeout.
///
/// An elapsed timeout surfaces as [`VectorError::Timeout`] and is handled by
/// callers exactly like any other backend failure.
pub struct TimeBounded<R> {
    inner: R,
    timeout: Duration,
}

impl<R> TimeBounded<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<R: VectorReader> VectorReader for TimeBounded<R> {
    async fn query(
        &self,
        text: &str,
        limit: usize,
        where_filter: Option<&MetadataFilter>,
    ) -> Result<VectorHits> {
        match tokio::time::timeout(self.timeout, self.inner.query(text, limit, where_filter)).await
        {
            Ok(result) => result,
            Err(_) => {
                log::warn!("Vector query exceeded {:?}", self.timeout);
                Err(VectorError::Timeout(self.timeout))
            }
        }
    }
}
