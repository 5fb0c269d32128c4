use std::sync::Arc;
use std::time::Duration;

/// Suspends the calling task; keeps the retry backoff runtime-agnostic.
#[async_trait::async_trait]
pub trait DelayPort: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub type DynDelayPort = Arc<dyn DelayPort>;
