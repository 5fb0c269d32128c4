use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use domain::account::UserId;
use domain::matching::{CacheKey, MatchQuery, MatchSet, ResultSource};

use careerdesk_application::{
    error::{AppError, AppResult},
    ports::outgoing::match_cache_store::{MatchCacheRecord, MatchCacheStorePort},
};

use super::utils::PostgresExecutor;

pub struct PostgresMatchCacheStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresMatchCacheStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

fn record_from_row(row: &PgRow) -> AppResult<MatchCacheRecord> {
    let user_uuid: Uuid = row.try_get("user_id").map_err(|e| AppError::DatabaseError {
        message: format!("Failed to get user_id: {}", e),
    })?;
    let key: String = row.try_get("cache_key").map_err(|e| AppError::DatabaseError {
        message: format!("Failed to get cache_key: {}", e),
    })?;
    let practices: serde_json::Value =
        row.try_get("practices").map_err(|e| AppError::DatabaseError {
            message: format!("Failed to get practices: {}", e),
        })?;
    let source: String = row.try_get("source").map_err(|e| AppError::DatabaseError {
        message: format!("Failed to get source: {}", e),
    })?;
    let position: String = row.try_get("position").map_err(|e| AppError::DatabaseError {
        message: format!("Failed to get position: {}", e),
    })?;
    let resume_reference: String =
        row.try_get("resume_reference")
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to get resume_reference: {}", e),
            })?;
    let retry_count: i32 = row.try_get("retry_count").map_err(|e| AppError::DatabaseError {
        message: format!("Failed to get retry_count: {}", e),
    })?;
    let created_at: OffsetDateTime =
        row.try_get("created_at").map_err(|e| AppError::DatabaseError {
            message: format!("Failed to get created_at: {}", e),
        })?;

    Ok(MatchCacheRecord {
        user_id: UserId::from_uuid(user_uuid),
        key: CacheKey(key),
        query: MatchQuery::new(position, resume_reference),
        practices: serde_json::from_value::<MatchSet>(practices)?,
        source: source.parse::<ResultSource>().map_err(AppError::from)?,
        retry_count,
        created_at,
    })
}

#[async_trait::async_trait]
impl MatchCacheStorePort for PostgresMatchCacheStoreAdapter {
    #[instrument(skip(self))]
    async fn fetch(
        &self,
        user_id: &UserId,
        key: &CacheKey,
    ) -> AppResult<Option<MatchCacheRecord>> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    SELECT user_id, cache_key, practices, source, position,
                           resume_reference, retry_count, created_at
                    FROM match_cache
                    WHERE user_id = $1 AND cache_key = $2
                    ",
                    )
                    .bind(user_id.as_uuid())
                    .bind(key.as_str())
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to fetch cache entry for user {}", user_id.as_uuid()),
            )
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    #[instrument(skip(self, record))]
    async fn store(&self, record: &MatchCacheRecord) -> AppResult<()> {
        let practices = serde_json::to_value(&record.practices)?;

        self.executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    INSERT INTO match_cache
                        (user_id, cache_key, practices, source, position,
                         resume_reference, retry_count, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    ON CONFLICT (user_id, cache_key) DO UPDATE
                    SET practices = EXCLUDED.practices,
                        source = EXCLUDED.source,
                        retry_count = EXCLUDED.retry_count,
                        created_at = EXCLUDED.created_at
                    ",
                    )
                    .bind(record.user_id.as_uuid())
                    .bind(record.key.as_str())
                    .bind(&practices)
                    .bind(record.source.as_str())
                    .bind(&record.query.position)
                    .bind(&record.query.resume_reference)
                    .bind(record.retry_count)
                    .bind(record.created_at)
                    .execute(&self.pool)
                },
                "Failed to store cache entry",
            )
            .await?;

        debug!(
            key = %record.key,
            "Stored match cache entry for user {}",
            record.user_id.as_uuid()
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn prune(&self, user_id: &UserId, keep: usize) -> AppResult<u64> {
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);

        let result = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    DELETE FROM match_cache
                    WHERE user_id = $1 AND cache_key IN (
                        SELECT cache_key
                        FROM match_cache
                        WHERE user_id = $1
                        ORDER BY created_at DESC
                        OFFSET $2
                    )
                    ",
                    )
                    .bind(user_id.as_uuid())
                    .bind(keep)
                    .execute(&self.pool)
                },
                &format!("Failed to prune cache entries for user {}", user_id.as_uuid()),
            )
            .await?;

        let evicted = result.rows_affected();
        if evicted > 0 {
            debug!(
                evicted,
                "Pruned match cache entries for user {}",
                user_id.as_uuid()
            );
        }
        Ok(evicted)
    }
}
