use axum::{Json, extract::State};
use axum_valid::Valid;

use crate::incoming::http_axum::{
    core::extractors::AuthenticatedUser,
    dto::{
        requests::MatchRequest,
        responses::{ApiResponse, MatchResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

/// The integrated paid flow: hold credits, serve from cache or run the
/// external matcher with retry/fallback, settle the hold.
pub async fn run_job_match(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<MatchRequest>>,
) -> Result<Json<ApiResponse<MatchResponse>>, HttpError> {
    let outcome = state
        .job_match_service
        .find_matches(&user_id, request.match_query())
        .await
        .map_err(HttpError)?;

    Ok(Json(ApiResponse::success_with_data(Some(outcome.into()))))
}
