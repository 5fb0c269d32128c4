use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use careerdesk_application::error::AppError;
use domain::account::UserId;

use crate::incoming::http_axum::error_mapper::HttpError;

/// The gateway authenticates end users and forwards their id here.
const USER_ID_HEADER: &str = "X-User-Id";

/// The user on whose account the request operates.
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|header| header.to_str().ok())
            .ok_or(HttpError(AppError::Unauthorized))?;

        let id = Uuid::parse_str(raw).map_err(|_| {
            HttpError(AppError::ValidationError {
                message: format!("{USER_ID_HEADER} must be a UUID"),
            })
        })?;

        Ok(Self(UserId::from_uuid(id)))
    }
}
