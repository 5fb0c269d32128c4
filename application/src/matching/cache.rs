use time::OffsetDateTime;
use tracing::{debug, instrument};

use domain::account::UserId;
use domain::matching::{MatchQuery, MatchSet, ResultSource};

use crate::config::CacheSettings;
use crate::error::AppResult;
use crate::ports::outgoing::match_cache_store::{DynMatchCacheStorePort, MatchCacheRecord};

/// Content-addressable cache of match results. Normalization, hashing,
/// TTL and the per-user retention bound all live here; the store port
/// underneath is a plain keyed collection.
pub struct MatchCache {
    store: DynMatchCacheStorePort,
    settings: CacheSettings,
}

impl MatchCache {
    pub fn new(store: DynMatchCacheStorePort, settings: CacheSettings) -> Self {
        Self { store, settings }
    }

    /// Expired entries are treated as absent even while still stored.
    #[instrument(skip(self, query))]
    pub async fn get(
        &self,
        user_id: &UserId,
        query: &MatchQuery,
    ) -> AppResult<Option<MatchCacheRecord>> {
        let key = query.cache_key();
        let Some(record) = self.store.fetch(user_id, &key).await? else {
            debug!(key = %key, "Match cache miss");
            return Ok(None);
        };

        let age = OffsetDateTime::now_utc() - record.created_at;
        if age > self.settings.ttl {
            debug!(key = %key, "Match cache entry expired");
            return Ok(None);
        }

        debug!(key = %key, "Match cache hit");
        Ok(Some(record))
    }

    /// Store a live result, then enforce the per-user retention bound.
    /// Fallback results never reach this method; the record is tagged
    /// Live by construction.
    #[instrument(skip(self, query, practices))]
    pub async fn put(
        &self,
        user_id: &UserId,
        query: &MatchQuery,
        practices: MatchSet,
        retry_count: i32,
    ) -> AppResult<()> {
        let record = MatchCacheRecord {
            user_id: user_id.clone(),
            key: query.cache_key(),
            query: query.clone(),
            practices,
            source: ResultSource::Live,
            retry_count,
            created_at: OffsetDateTime::now_utc(),
        };

        self.store.store(&record).await?;
        let evicted = self
            .store
            .prune(user_id, self.settings.max_entries_per_user)
            .await?;
        if evicted > 0 {
            debug!(evicted, "Evicted match cache entries beyond retention bound");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use time::Duration;

    use super::*;
    use crate::testing::InMemoryMatchCacheStore;
    use domain::matching::PracticeMatch;

    fn settings() -> CacheSettings {
        CacheSettings {
            ttl: Duration::hours(2),
            max_entries_per_user: 10,
        }
    }

    fn cache(store: &Arc<InMemoryMatchCacheStore>) -> MatchCache {
        MatchCache::new(Arc::clone(store) as DynMatchCacheStorePort, settings())
    }

    fn sample_set() -> MatchSet {
        MatchSet::new(vec![PracticeMatch {
            id: "p1".to_string(),
            name: "City Centre Practice".to_string(),
            location: "London".to_string(),
            score: 0.92,
            summary: "Strong skills overlap".to_string(),
        }])
    }

    #[tokio::test]
    async fn test_hit_within_ttl_returns_the_stored_payload() {
        let user = UserId::new();
        let store = Arc::new(InMemoryMatchCacheStore::default());
        let cache = cache(&store);
        let query = MatchQuery::new("Senior Dentist", "resume-1");

        cache.put(&user, &query, sample_set(), 0).await.unwrap();

        let record = cache.get(&user, &query).await.unwrap().unwrap();
        assert_eq!(record.practices, sample_set());
        assert_eq!(record.source, ResultSource::Live);
    }

    #[tokio::test]
    async fn test_equivalent_spellings_hit_the_same_entry() {
        let user = UserId::new();
        let store = Arc::new(InMemoryMatchCacheStore::default());
        let cache = cache(&store);

        cache
            .put(&user, &MatchQuery::new("Senior  Dentist ", "resume-1"), sample_set(), 0)
            .await
            .unwrap();

        let hit = cache
            .get(&user, &MatchQuery::new("senior dentist", "resume-1"))
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_expired_entries_are_logically_absent() {
        let user = UserId::new();
        let store = Arc::new(InMemoryMatchCacheStore::default());
        let cache = cache(&store);
        let query = MatchQuery::new("dentist", "resume-1");

        cache.put(&user, &query, sample_set(), 0).await.unwrap();
        store.age_entry(&user, &query.cache_key(), Duration::hours(3));

        assert!(cache.get(&user, &query).await.unwrap().is_none());
        // Physically still stored, logically gone.
        assert_eq!(store.entry_count(&user), 1);
    }

    #[tokio::test]
    async fn test_eleventh_entry_evicts_the_oldest() {
        let user = UserId::new();
        let store = Arc::new(InMemoryMatchCacheStore::default());
        let cache = cache(&store);

        for i in 0..11 {
            let query = MatchQuery::new(format!("position {i}"), "resume-1");
            cache.put(&user, &query, sample_set(), 0).await.unwrap();
            // Spread creation times so ordering is unambiguous.
            store.age_entry(&user, &query.cache_key(), Duration::minutes(60 - i));
        }

        assert_eq!(store.entry_count(&user), 10);
        let oldest = MatchQuery::new("position 0", "resume-1");
        assert!(cache.get(&user, &oldest).await.unwrap().is_none());
        for i in 1..11 {
            let query = MatchQuery::new(format!("position {i}"), "resume-1");
            assert!(cache.get(&user, &query).await.unwrap().is_some(), "entry {i} must survive");
        }
    }

    #[tokio::test]
    async fn test_retention_is_per_user() {
        let alice = UserId::new();
        let bob = UserId::new();
        let store = Arc::new(InMemoryMatchCacheStore::default());
        let cache = cache(&store);

        for i in 0..10 {
            let query = MatchQuery::new(format!("position {i}"), "resume-a");
            cache.put(&alice, &query, sample_set(), 0).await.unwrap();
        }
        cache
            .put(&bob, &MatchQuery::new("position 0", "resume-b"), sample_set(), 0)
            .await
            .unwrap();

        assert_eq!(store.entry_count(&alice), 10);
        assert_eq!(store.entry_count(&bob), 1);
    }
}
