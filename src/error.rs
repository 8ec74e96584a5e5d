use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Generic error: {0}")]
    Generic(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string(),
            }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Image(_) => StatusCode::BAD_REQUEST,
            // A corrupt metadata file is a server-side problem, not a bad request.
            AppError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}
