use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
};
use serde::Serialize;

use super::{error::ApiError, AppState};
use crate::{
    model::{Feedback, NewFeedback, SubmitFeedbackRequest},
    repo::Repo,
};

#[derive(Serialize)]
pub struct SubmitFeedbackResponse {
    message: &'static str,
    feedback: Feedback,
}

pub async fn submit_feedback_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitFeedbackResponse>), ApiError> {
    // An unreadable or absent body is a submission with nothing in it.
    let payload = payload.map_or_else(
        |e| {
            tracing::debug!("Unreadable feedback body: {e}");
            SubmitFeedbackRequest::default()
        },
        |Json(payload)| payload,
    );
    let new_feedback = NewFeedback::try_from(payload)?;

    let repo = Repo::new(state.pg_client);
    let feedback = repo.create_feedback(&new_feedback).await?;
    tracing::info!(id = feedback.id, rating = feedback.rating, "Feedback submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            message: "Feedback submitted successfully",
            feedback,
        }),
    ))
}

pub async fn list_feedback_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Feedback>>, ApiError> {
    let repo = Repo::new(state.pg_client);
    let entries = repo.list_feedback().await?;
    Ok(Json(entries))
}
