//! Upload form and conversion routes.
//!
//! `GET /` serves the form. `POST /convert` reads every file in the upload
//! field, runs the batch on the blocking pool, and answers with either the
//! converted image or the archive as an attachment.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use pixforged_common::Error;

use super::error::AppError;
use super::AppContext;
use crate::batch::{BatchOutput, UploadedItem};
use crate::config::ConversionConfig;

/// Create the form and conversion routes.
pub fn convert_routes(ctx: &AppContext) -> Router<AppContext> {
    let limit = ctx.config.conversion.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route(
            "/convert",
            post(convert).layer(DefaultBodyLimit::max(limit)),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// Render the upload form.
async fn index(State(ctx): State<AppContext>) -> Result<Html<String>, AppError> {
    ctx.pages
        .render_index(None)
        .map(Html)
        .map_err(|e| AppError::Internal(format!("failed to render form: {}", e)))
}

/// Convert the uploaded batch.
async fn convert(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let batch = match multipart {
        Ok(multipart) => read_upload(multipart, &ctx.config.conversion).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Request is not a multipart upload");
            None
        }
    };

    tracing::info!(
        files = batch.as_ref().map(Vec::len).unwrap_or(0),
        "Received conversion request"
    );

    let converter = ctx.converter.clone();
    let output = tokio::task::spawn_blocking(move || converter.process(batch.as_deref()))
        .await
        .map_err(|e| AppError::Internal(format!("conversion task failed: {}", e)))??;

    Ok(attachment(output))
}

// ============================================================================
// Helpers
// ============================================================================

/// Collect the files sent under the upload field, in order.
///
/// Returns `None` when the field never appears. Parts under the field
/// without a filename are plain form values, not files, and are skipped.
async fn read_upload(
    mut multipart: Multipart,
    config: &ConversionConfig,
) -> Result<Option<Vec<UploadedItem>>, AppError> {
    let mut items: Option<Vec<UploadedItem>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        if field.name() != Some(config.upload_field.as_str()) {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field.bytes().await.map_err(|e| multipart_error(e, config))?;

        tracing::debug!(filename = %filename, size = data.len(), "Read uploaded file");

        items
            .get_or_insert_with(Vec::new)
            .push(UploadedItem { filename, data });
    }

    Ok(items)
}

fn multipart_error(err: MultipartError, config: &ConversionConfig) -> AppError {
    if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge {
            limit_bytes: config.max_upload_bytes,
        }
    } else {
        tracing::debug!(error = %err, "Malformed multipart body");
        AppError::Conversion(Error::NoFilePart)
    }
}

/// Build the download response for a finished batch.
fn attachment(output: BatchOutput) -> Response {
    let (filename, content_type, data) = output.into_parts();

    let disposition = HeaderValue::from_str(&content_disposition(&filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response()
}

/// `Content-Disposition` value for a download.
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(filename, NON_ALPHANUMERIC)
        )
    }
}
