use axum::{
    Router,
    routing::{get, post},
};

use crate::incoming::http_axum::{
    handlers::{
        credits::{
            check_credits, confirm_reservation, get_credit_summary, reserve_credits,
            revert_reservation,
        },
        health::health_check,
        match_tool::run_job_match,
    },
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;

pub fn build_application_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/credits", get(get_credit_summary))
        .route("/credits/check/{tool}", get(check_credits))
        .route("/credits/reservations", post(reserve_credits))
        .route("/credits/reservations/{id}/confirm", post(confirm_reservation))
        .route("/credits/reservations/{id}/revert", post(revert_reservation))
        .route("/match", post(run_job_match))
        .with_request_id()
        .with_trace()
}
