use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use careerdesk_application::error::AppError;

use crate::incoming::http_axum::dto::responses::ApiResponse;

pub struct HttpError(pub AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        match app_error {
            AppError::Domain(_)
            | AppError::InsufficientCredits { .. }
            | AppError::NotFound { .. }
            | AppError::Unauthorized
            | AppError::ValidationError { .. }
            | AppError::JsonError(_) => {
                debug!("Client error response generated: {}", app_error);
            }
            _ => {
                error!("Server error response generated: {}", app_error);
            }
        }

        let (status_code, message) = match app_error {
            AppError::Domain(_) => (StatusCode::BAD_REQUEST, app_error.to_string()),

            AppError::InsufficientCredits { .. } => {
                (StatusCode::PAYMENT_REQUIRED, app_error.to_string())
            }

            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),

            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),

            AppError::ValidationError { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, app_error.to_string())
            }

            AppError::JsonError(_) => (StatusCode::BAD_REQUEST, "Invalid JSON format".to_string()),

            AppError::ExternalServiceError { .. } => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
            ),

            AppError::DatabaseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),

            AppError::CacheError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Cache error".to_string())
            }

            AppError::ConfigError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),

            AppError::IoError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status_code, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        HttpError(err).into_response().status()
    }

    #[test]
    fn test_insufficient_credits_maps_to_payment_required() {
        let status = status_of(AppError::InsufficientCredits {
            message: "required 4, available 1".to_string(),
        });
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_external_failures_map_to_bad_gateway() {
        let status = status_of(AppError::ExternalServiceError {
            message: "matching service unreachable".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_database_details_are_not_leaked() {
        let response = HttpError(AppError::DatabaseError {
            message: "connection refused to 10.0.0.5:5432".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_unprocessable_entity() {
        let status = status_of(AppError::ValidationError {
            message: "position is required".to_string(),
        });
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
