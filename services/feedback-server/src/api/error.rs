use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::model::ValidationError;

/// Every failure a request can end in.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client-caused; the message is returned verbatim.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database or infrastructure failure; details stay in the server log.
    #[error("persistence failure")]
    Persistence(#[from] anyhow::Error),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Validation(e) => {
                tracing::debug!("Rejected request: {e}");
                e.to_string()
            }
            Self::Persistence(e) => {
                tracing::error!("Request failed: {e:?}");
                "Internal server error".to_string()
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
