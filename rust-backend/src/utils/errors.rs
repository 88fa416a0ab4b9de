// src/utils/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::utils::types::StatusPayload;

/// Bad values in the environment. Every variable has a default, so a
/// missing one is never an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not valid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Route not found")]
    RouteNotFound,
    #[error("File not found")]
    FileNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::RouteNotFound | AppError::FileNotFound => StatusCode::NOT_FOUND,
            AppError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match status {
            StatusCode::NOT_FOUND if matches!(self, AppError::Io(_)) => {
                AppError::FileNotFound.to_string()
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                log::error!("request failed: {self}");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        HttpResponse::build(status).json(StatusPayload::error(message))
    }
}
