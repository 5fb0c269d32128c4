use axum::{Json, extract::State};

use domain::tool::Tool;

use crate::incoming::http_axum::dto::responses::ApiResponse;
use crate::shared::app_state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    let costs: serde_json::Map<String, serde_json::Value> = Tool::ALL
        .iter()
        .map(|tool| (tool.as_str().to_string(), tool.cost().into()))
        .collect();

    Json(ApiResponse::success_with_data(Some(serde_json::json!({
        "environment": state.config.environment.env,
        "config": {
            "tool_costs": costs,
            "cache_ttl_seconds": state.config.match_cache.ttl_seconds,
            "cache_max_entries_per_user": state.config.match_cache.max_entries_per_user,
        }
    }))))
}
