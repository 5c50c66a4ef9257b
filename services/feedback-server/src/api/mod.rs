use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use xlib::client::PostgresClient;

mod error;
mod feedback;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub pg_client: Arc<PostgresClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/healthcheck",
            get(|| async { StatusCode::OK.into_response() }),
        )
        .route(
            "/api/feedback",
            get(feedback::list_feedback_handler).post(feedback::submit_feedback_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
