use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Cannot start a conversation with yourself about your own ride")]
    InvalidParticipant,

    #[error("Please log in first")]
    NotLoggedIn,

    #[error("Ride not found: {0}")]
    RideNotFound(String),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("No conversation is open")]
    NoActiveConversation,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::InvalidParticipant => StatusCode::BAD_REQUEST,
            AppError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            AppError::RideNotFound(_) | AppError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoActiveConversation => StatusCode::CONFLICT,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}
