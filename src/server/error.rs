//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<T, AppError>`. The response produced here carries
//! the status, a plain-text fallback body, and an [`ErrorPage`] extension;
//! the page middleware in [`super::page`] swaps the body for the rendered
//! upload form with the message shown.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::format_size;

/// Marker left on error responses for the page middleware.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub message: String,
}

/// Any failure a request can end with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Validation or conversion failure from the batch pipeline.
    #[error(transparent)]
    Conversion(#[from] pixforged_common::Error),

    /// Request body exceeded the configured limit.
    #[error("request body exceeds {limit_bytes} bytes")]
    PayloadTooLarge { limit_bytes: usize },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("not found")]
    NotFound,

    /// Unexpected failure outside the batch pipeline (task join, panic).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Conversion(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message rendered into the page.
    pub fn user_message(&self) -> String {
        match self {
            Self::Conversion(e) => e.user_message(),
            Self::PayloadTooLarge { limit_bytes } => too_large_message(*limit_bytes),
            Self::MethodNotAllowed => "Error: Method not allowed.".to_string(),
            Self::NotFound => "Error: Page not found.".to_string(),
            Self::Internal(_) => "Error: Internal server error. Please try again later.".to_string(),
        }
    }
}

/// Message for an upload over `limit_bytes`.
pub fn too_large_message(limit_bytes: usize) -> String {
    format!(
        "Error: File too large. The maximum upload size is {}.",
        format_size(limit_bytes)
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Server error in request handler");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let message = self.user_message();
        let mut response = (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message.clone(),
        )
            .into_response();
        response.extensions_mut().insert(ErrorPage { message });
        response
    }
}
