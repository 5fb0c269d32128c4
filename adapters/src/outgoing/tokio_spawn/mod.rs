use std::time::Duration;

use careerdesk_application::ports::outgoing::delay::DelayPort;

pub struct TokioDelayAdapter;

impl TokioDelayAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokioDelayAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DelayPort for TokioDelayAdapter {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
