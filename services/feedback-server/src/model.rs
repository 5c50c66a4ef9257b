use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A persisted row of the `feedback` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub feedback_type: String,
    pub rating: i32,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

/// Raw submission body. Values stay untyped until [`NewFeedback`] checks presence.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub feedback_type: Option<Value>,
    pub rating: Option<Value>,
    pub comments: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
}

/// A submission with every field present. Only obtainable through `TryFrom`.
///
/// `rating` keeps its submitted text form; the insert casts it to an integer and
/// the table's check constraint owns the bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    name: String,
    email: String,
    feedback_type: String,
    rating: String,
    comments: String,
}

impl NewFeedback {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn feedback_type(&self) -> &str {
        &self.feedback_type
    }

    pub fn rating(&self) -> &str {
        &self.rating
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }
}

/// Text form of a submitted value. `null`, `false` and `""` count as absent.
fn provided(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(number_text(&n)),
        other => Some(other.to_string()),
    }
}

/// Integral floats render without a fraction, so `5.0` is stored as `5`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Text fields additionally treat a numeric zero as absent.
fn required_text(value: Option<Value>) -> Result<String, ValidationError> {
    match value {
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(ValidationError::MissingFields),
        value => provided(value).ok_or(ValidationError::MissingFields),
    }
}

impl TryFrom<SubmitFeedbackRequest> for NewFeedback {
    type Error = ValidationError;

    fn try_from(request: SubmitFeedbackRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text(request.name)?,
            email: required_text(request.email)?,
            feedback_type: required_text(request.feedback_type)?,
            rating: provided(request.rating).ok_or(ValidationError::MissingFields)?,
            comments: required_text(request.comments)?,
        })
    }
}
