use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use careerdesk_adapters::incoming::http_axum::routes::build_application_router;
use careerdesk_application::error::AppError;

use crate::bootstrap::state::AppState;

pub fn create_router(state: &AppState) -> Result<Router, AppError> {
    let mut router = build_application_router().with_state(state.to_adapters_state());

    if let Some(origin) = &state.config.server.cors_origin {
        let origin = origin
            .parse::<HeaderValue>()
            .map_err(|_| AppError::ConfigError {
                message: format!("Invalid CORS origin: {origin}"),
            })?;
        router = router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    Ok(router)
}
