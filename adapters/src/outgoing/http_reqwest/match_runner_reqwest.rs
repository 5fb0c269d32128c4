use std::time::Duration;

use serde::Serialize;
use tracing::{debug, instrument};

use domain::matching::{MatchQuery, MatchSet};

use careerdesk_application::{
    error::{AppError, AppResult},
    infrastructure_config::MatchingConfig,
    ports::outgoing::match_runner::MatchRunnerPort,
};

#[derive(Serialize)]
struct MatchWireRequest<'a> {
    position: String,
    resume_reference: &'a str,
}

/// HTTP client for the third-party matching service. Network trouble
/// and 5xx responses come back as transient errors; 4xx responses mean
/// the query itself is bad and must not be retried.
pub struct HttpMatchRunnerAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMatchRunnerAdapter {
    pub fn new(config: &MatchingConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build matching HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl MatchRunnerPort for HttpMatchRunnerAdapter {
    #[instrument(skip(self, query), fields(position = %query.position))]
    async fn find_matches(&self, query: &MatchQuery) -> AppResult<MatchSet> {
        if query.position.trim().is_empty() {
            return Err(AppError::ValidationError {
                message: "position is required".to_string(),
            });
        }
        if query.resume_reference.trim().is_empty() {
            return Err(AppError::ValidationError {
                message: "resume reference is required".to_string(),
            });
        }

        let url = format!("{}/v1/matches", self.base_url);
        let body = MatchWireRequest {
            position: query.normalized_position(),
            resume_reference: &query.resume_reference,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError {
                message: format!("Matching request failed: {e}"),
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AppError::ValidationError {
                message: format!("Matching service rejected the query: HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(AppError::ExternalServiceError {
                message: format!("Matching service returned HTTP {status}"),
            });
        }

        let matches: MatchSet =
            response
                .json()
                .await
                .map_err(|e| AppError::ExternalServiceError {
                    message: format!("Failed to decode matching response: {e}"),
                })?;

        debug!(practices = matches.len(), "Matching service returned result set");
        Ok(matches)
    }
}
