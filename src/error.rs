use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] JsonRejection),

    #[error("Invalid path: {0}")]
    MalformedPath(#[from] PathRejection),

    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("email error: {0}")]
    Email(String),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::MalformedPayload(_)
            | AppError::MalformedPath(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("request failed: {}", &self);
            "Server Error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
