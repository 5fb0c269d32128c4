use axum::{
    Json,
    extract::{Path, State},
};
use axum_valid::Valid;
use uuid::Uuid;

use domain::reservation::ReservationId;
use domain::tool::Tool;

use careerdesk_application::error::AppError;

use crate::incoming::http_axum::{
    core::extractors::AuthenticatedUser,
    dto::{
        requests::{ReserveCreditsRequest, RevertReservationRequest},
        responses::{
            ApiResponse, CreditCheckResponse, CreditSummaryResponse, ReservationResponse,
            ResolutionResponse,
        },
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

pub async fn get_credit_summary(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CreditSummaryResponse>>, HttpError> {
    let account = state
        .credit_query_service
        .account_summary(&user_id)
        .await
        .map_err(HttpError)?;

    Ok(Json(ApiResponse::success_with_data(Some(account.into()))))
}

pub async fn check_credits(
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(tool): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CreditCheckResponse>>, HttpError> {
    let tool: Tool = tool.parse().map_err(|e| HttpError(AppError::from(e)))?;

    let allowed = state
        .credit_query_service
        .has_enough_credits(&user_id, tool)
        .await
        .map_err(HttpError)?;

    Ok(Json(ApiResponse::success_with_data(Some(
        CreditCheckResponse {
            tool: tool.as_str().to_string(),
            cost: tool.cost(),
            allowed,
        },
    ))))
}

pub async fn reserve_credits(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ReserveCreditsRequest>>,
) -> Result<Json<ApiResponse<ReservationResponse>>, HttpError> {
    let reservation = state
        .reservation_service
        .reserve_credits(&user_id, request.tool, request.description)
        .await
        .map_err(HttpError)?;

    Ok(Json(ApiResponse::success_with_data(Some(
        reservation.into(),
    ))))
}

pub async fn confirm_reservation(
    AuthenticatedUser(_user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ResolutionResponse>>, HttpError> {
    let resolved = state
        .reservation_service
        .confirm_reservation(&ReservationId::from_uuid(id))
        .await
        .map_err(HttpError)?;

    Ok(Json(ApiResponse::success_with_data(Some(
        ResolutionResponse { resolved },
    ))))
}

pub async fn revert_reservation(
    AuthenticatedUser(_user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RevertReservationRequest>>,
) -> Result<Json<ApiResponse<ResolutionResponse>>, HttpError> {
    let resolved = state
        .reservation_service
        .revert_reservation(&ReservationId::from_uuid(id), request.reason)
        .await
        .map_err(HttpError)?;

    Ok(Json(ApiResponse::success_with_data(Some(
        ResolutionResponse { resolved },
    ))))
}
