//! In-flight request coalescing.
//!
//! Concurrent misses for the same [`CacheKey`] share one model call instead
//! of each paying for their own. Built on moka's `try_get_with`, which runs
//! a single initializer per key and hands its outcome to every waiter.
//! Entries are dropped as soon as the call settles; the disk cache stays the
//! only persistent store.

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;

use crate::Result;
use crate::types::{CacheKey, ModelResult};

/// Upper bound on settled entries awaiting invalidation.
const MAX_SETTLED: u64 = 10_000;

/// Map from cache key to the pending model call for that key.
pub struct InFlight {
    calls: Cache<CacheKey, Arc<ModelResult>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self {
            calls: Cache::new(MAX_SETTLED),
        }
    }

    /// Run `init` unless a call for `key` is already pending, in which case
    /// wait for that call's outcome instead.
    ///
    /// Errors are shared too: every waiter gets a clone of the leader's
    /// error.
    pub async fn run<F>(&self, key: &CacheKey, init: F) -> Result<Arc<ModelResult>>
    where
        F: Future<Output = Result<ModelResult>>,
    {
        let outcome = self
            .calls
            .try_get_with(key.clone(), async { init.await.map(Arc::new) })
            .await;
        self.calls.invalidate(key).await;
        outcome.map_err(|shared| (*shared).clone())
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}
