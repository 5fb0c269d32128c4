use std::sync::Arc;

use time::OffsetDateTime;

use crate::error::AppResult;
use domain::account::UserId;
use domain::matching::{CacheKey, MatchQuery, MatchSet, ResultSource};

/// One stored match result. TTL and retention policy live in the
/// application-level cache, not here.
#[derive(Debug, Clone)]
pub struct MatchCacheRecord {
    pub user_id: UserId,
    pub key: CacheKey,
    pub query: MatchQuery,
    pub practices: MatchSet,
    pub source: ResultSource,
    pub retry_count: i32,
    pub created_at: OffsetDateTime,
}

#[async_trait::async_trait]
pub trait MatchCacheStorePort: Send + Sync {
    async fn fetch(&self, user_id: &UserId, key: &CacheKey)
    -> AppResult<Option<MatchCacheRecord>>;

    /// Insert or replace the record at `(user_id, key)`.
    async fn store(&self, record: &MatchCacheRecord) -> AppResult<()>;

    /// Drop the user's entries beyond the `keep` most recent (by
    /// creation time), returning how many were evicted.
    async fn prune(&self, user_id: &UserId, keep: usize) -> AppResult<u64>;
}

pub type DynMatchCacheStorePort = Arc<dyn MatchCacheStorePort>;
