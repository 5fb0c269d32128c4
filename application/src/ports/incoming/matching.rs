use crate::error::AppResult;
use domain::account::UserId;
use domain::matching::{MatchQuery, MatchSet, ResultSource};

/// What the caller gets back from a paid match run: the result set,
/// whether it is live or canned, and whether it was served from cache.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub practices: MatchSet,
    pub source: ResultSource,
    pub from_cache: bool,
    pub charged: bool,
}

#[async_trait::async_trait]
pub trait JobMatchUseCase: Send + Sync {
    async fn find_matches(&self, user_id: &UserId, query: MatchQuery) -> AppResult<MatchOutcome>;
}
