use std::sync::Arc;

use crate::error::AppResult;
use domain::matching::{MatchQuery, MatchSet};

/// The external job-matching service. Unreachability and timeouts must
/// surface as `ExternalServiceError` so the retry layer can tell them
/// apart from hard precondition failures.
#[async_trait::async_trait]
pub trait MatchRunnerPort: Send + Sync {
    async fn find_matches(&self, query: &MatchQuery) -> AppResult<MatchSet>;
}

pub type DynMatchRunnerPort = Arc<dyn MatchRunnerPort>;
