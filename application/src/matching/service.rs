use std::sync::Arc;

use tracing::{debug, instrument, warn};

use domain::account::UserId;
use domain::matching::{MatchQuery, MatchSet, ResultSource};
use domain::tool::Tool;

use crate::billing::service::{BillingService, ToolRun};
use crate::error::AppResult;
use crate::matching::cache::MatchCache;
use crate::matching::fallback::fallback_matches;
use crate::matching::retry::Retrier;
use crate::ports::incoming::matching::{JobMatchUseCase, MatchOutcome};
use crate::ports::outgoing::match_runner::DynMatchRunnerPort;

/// Payload threaded through the coordinator for one match run.
struct MatchRun {
    practices: MatchSet,
    from_cache: bool,
}

/// The integrated job-match flow: reserve credits, consult the cache,
/// run the external matcher under the retry policy on a miss, then
/// cache live results once the hold is settled.
pub struct MatchService {
    billing: Arc<BillingService>,
    cache: MatchCache,
    runner: DynMatchRunnerPort,
    retrier: Retrier,
}

impl MatchService {
    pub fn new(
        billing: Arc<BillingService>,
        cache: MatchCache,
        runner: DynMatchRunnerPort,
        retrier: Retrier,
    ) -> Self {
        Self {
            billing,
            cache,
            runner,
            retrier,
        }
    }

    /// Cache lookup that degrades to a miss when the cache itself is
    /// unhealthy; a broken cache must not fail a paid operation.
    async fn lookup_cached(&self, user_id: &UserId, query: &MatchQuery) -> Option<MatchSet> {
        match self.cache.get(user_id, query).await {
            Ok(Some(record)) => Some(record.practices),
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "Match cache lookup failed, treating as miss");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl JobMatchUseCase for MatchService {
    #[instrument(skip(self, query), fields(position = %query.position))]
    async fn find_matches(&self, user_id: &UserId, query: MatchQuery) -> AppResult<MatchOutcome> {
        let description = format!("job match for '{}'", query.normalized_position());
        let query_ref = &query;

        let outcome = self
            .billing
            .perform(user_id, Tool::JobMatch, description, move || async move {
                if let Some(practices) = self.lookup_cached(user_id, query_ref).await {
                    debug!("Serving cached match result");
                    return Ok(ToolRun {
                        payload: MatchRun {
                            practices,
                            from_cache: true,
                        },
                        source: ResultSource::Live,
                        attempts: 0,
                    });
                }

                let run = self
                    .retrier
                    .run(|| self.runner.find_matches(query_ref), fallback_matches)
                    .await?;

                Ok(ToolRun {
                    payload: MatchRun {
                        practices: run.payload,
                        from_cache: false,
                    },
                    source: run.source,
                    attempts: run.attempts,
                })
            })
            .await?;

        if outcome.source.is_live() && !outcome.payload.from_cache {
            let retry_count = outcome.attempts.saturating_sub(1) as i32;
            if let Err(err) = self
                .cache
                .put(user_id, &query, outcome.payload.practices.clone(), retry_count)
                .await
            {
                warn!(error = %err, "Failed to cache live match result");
            }
        }

        Ok(MatchOutcome {
            practices: outcome.payload.practices,
            source: outcome.source,
            from_cache: outcome.payload.from_cache,
            charged: outcome.charged,
        })
    }
}
