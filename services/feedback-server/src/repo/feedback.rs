use std::ops::Deref;

use super::Repo;
use crate::model::{Feedback, NewFeedback};
use anyhow::{Context, Result};

const CREATE_FEEDBACK_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS feedback (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) NOT NULL,
        feedback_type VARCHAR(50) NOT NULL,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        comments TEXT NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP
    )";

impl Repo {
    /// Idempotent; safe to run on every start.
    pub async fn create_schema(&self) -> Result<()> {
        let client = self.db_pool.deref();
        sqlx::raw_sql(CREATE_FEEDBACK_TABLE)
            .execute(client.deref())
            .await
            .context("failed to create feedback table")?;
        Ok(())
    }

    pub async fn create_feedback(&self, feedback: &NewFeedback) -> Result<Feedback> {
        let client = self.db_pool.deref();
        let saved_feedback = sqlx::query_as::<_, Feedback>(
            r"
            INSERT INTO feedback (name, email, feedback_type, rating, comments)
            VALUES ($1, $2, $3, CAST($4 AS INTEGER), $5)
            RETURNING id, name, email, feedback_type, rating, comments, created_at",
        )
        .bind(feedback.name())
        .bind(feedback.email())
        .bind(feedback.feedback_type())
        .bind(feedback.rating())
        .bind(feedback.comments())
        .fetch_one(client.deref())
        .await
        .context("failed to insert feedback")?;

        Ok(saved_feedback)
    }

    /// Newest first.
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        let client = self.db_pool.deref();
        let rows = sqlx::query_as::<_, Feedback>(
            r"
            SELECT id, name, email, feedback_type, rating, comments, created_at
            FROM feedback
            ORDER BY created_at DESC",
        )
        .fetch_all(client.deref())
        .await
        .context("failed to fetch feedback")?;

        Ok(rows)
    }
}
