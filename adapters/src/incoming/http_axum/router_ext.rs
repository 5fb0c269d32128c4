use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::incoming::http_axum::middleware::request_id::request_id_middleware;

pub trait RouterExt<State> {
    fn with_request_id(self) -> Self;
    fn with_trace(self) -> Self;
}

impl<State> RouterExt<State> for Router<State>
where
    State: Clone + Send + Sync + 'static,
{
    fn with_request_id(self) -> Self {
        self.layer(middleware::from_fn(request_id_middleware))
    }

    fn with_trace(self) -> Self {
        self.layer(TraceLayer::new_for_http())
    }
}
