use std::future::Future;
use std::time::Duration;

use tracing::warn;

use domain::matching::ResultSource;

use crate::config::RetrySettings;
use crate::error::AppResult;
use crate::ports::outgoing::delay::DynDelayPort;

/// Result of running an operation under the retry policy.
#[derive(Debug, Clone)]
pub struct RunOutcome<T> {
    pub payload: T,
    pub source: ResultSource,
    pub attempts: u32,
}

/// Runs a remote operation with bounded retries and a jittered backoff
/// between attempts. Exhausted transient failures downgrade to the
/// supplied static fallback; hard failures propagate untouched on the
/// first occurrence.
pub struct Retrier {
    settings: RetrySettings,
    delay: DynDelayPort,
}

impl Retrier {
    pub fn new(settings: RetrySettings, delay: DynDelayPort) -> Self {
        Self { settings, delay }
    }

    pub async fn run<T, F, Fut, FB>(&self, operation: F, fallback: FB) -> AppResult<RunOutcome<T>>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = AppResult<T>> + Send,
        FB: FnOnce() -> T + Send,
        T: Send,
    {
        let mut attempts = 0;

        while attempts < self.settings.max_attempts {
            if attempts > 0 {
                self.delay.sleep(self.backoff_with_jitter()).await;
            }
            attempts += 1;

            match operation().await {
                Ok(payload) => {
                    return Ok(RunOutcome {
                        payload,
                        source: ResultSource::Live,
                        attempts,
                    });
                }
                Err(err) if err.is_transient() => {
                    warn!(
                        attempt = attempts,
                        max_attempts = self.settings.max_attempts,
                        error = %err,
                        "External operation attempt failed"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        warn!(
            attempts,
            "External operation exhausted retries, serving fallback dataset"
        );
        Ok(RunOutcome {
            payload: fallback(),
            source: ResultSource::Fallback,
            attempts,
        })
    }

    fn backoff_with_jitter(&self) -> Duration {
        use rand::Rng;

        let min_percent = f64::from(self.settings.jitter_min_percent) / 100.0;
        let max_percent = f64::from(self.settings.jitter_max_percent) / 100.0;

        let mut rng = rand::rng();
        let jitter_factor = rng.random_range((1.0 + min_percent)..=(1.0 + max_percent));

        #[allow(clippy::cast_precision_loss)]
        let millis = (self.settings.backoff.as_millis() as f64 * jitter_factor).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let millis_u64 = millis as u64;
        Duration::from_millis(millis_u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::AppError;
    use crate::testing::RecordingDelay;

    fn retrier(delay: &Arc<RecordingDelay>) -> Retrier {
        Retrier::new(
            RetrySettings {
                max_attempts: 2,
                backoff: Duration::from_millis(2000),
                jitter_min_percent: 0,
                jitter_max_percent: 0,
            },
            Arc::clone(delay) as DynDelayPort,
        )
    }

    fn transient() -> AppError {
        AppError::ExternalServiceError {
            message: "matching service timed out".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_is_live_with_no_wait() {
        let delay = Arc::new(RecordingDelay::default());
        let outcome = retrier(&delay)
            .run(|| async { Ok("live data") }, || "fallback data")
            .await
            .unwrap();

        assert_eq!(outcome.source, ResultSource::Live);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(delay.sleep_count(), 0);
    }

    #[tokio::test]
    async fn test_fail_then_succeed_waits_exactly_once_and_stays_live() {
        let delay = Arc::new(RecordingDelay::default());
        let calls = AtomicU32::new(0);
        let outcome = retrier(&delay)
            .run(
                || async {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(transient())
                    } else {
                        Ok("live data")
                    }
                },
                || "fallback data",
            )
            .await
            .unwrap();

        assert_eq!(outcome.source, ResultSource::Live);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(delay.sleep_count(), 1);
        assert_eq!(delay.total_slept(), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_exhausted_retries_serve_the_fallback() {
        let delay = Arc::new(RecordingDelay::default());
        let calls = AtomicU32::new(0);
        let outcome = retrier(&delay)
            .run(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<&str, _>(transient())
                },
                || "fallback data",
            )
            .await
            .unwrap();

        assert_eq!(outcome.source, ResultSource::Fallback);
        assert_eq!(outcome.payload, "fallback data");
        assert_eq!(outcome.attempts, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(delay.sleep_count(), 1);
    }

    #[tokio::test]
    async fn test_hard_failure_propagates_without_retry() {
        let delay = Arc::new(RecordingDelay::default());
        let calls = AtomicU32::new(0);
        let err = retrier(&delay)
            .run(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<&str, _>(AppError::ValidationError {
                        message: "resume reference is required".to_string(),
                    })
                },
                || "fallback data",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(delay.sleep_count(), 0);
    }
}
