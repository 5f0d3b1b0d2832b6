use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::database::LibraryError;

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    Forbidden,
    NotFound(&'static str),
    Database(LibraryError),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl From<LibraryError> for AppError {
    fn from(e: LibraryError) -> Self {
        AppError::Database(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid Token".to_string()),
            AppError::Forbidden => (
                StatusCode::UNAUTHORIZED,
                "ACCESS DENIED! Unauthorized User !".to_string(),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found.", what)),
            AppError::Database(e) => {
                tracing::error!("Library query failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
        });

        (status, body).into_response()
    }
}
