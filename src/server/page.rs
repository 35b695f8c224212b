//! Upload form rendering.
//!
//! The form is a single embedded template. Error responses are rendered as
//! the same form with the message shown above it.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use minijinja::{context, Environment};
use pixforged_common::TargetFormat;

use super::error::{too_large_message, AppError, ErrorPage};
use super::AppContext;
use crate::config::ConversionConfig;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Renders the upload form.
pub struct PageRenderer {
    env: Environment<'static>,
    upload_field: String,
    extensions: Vec<String>,
    max_upload: String,
    target: TargetFormat,
}

impl PageRenderer {
    pub fn new(config: &ConversionConfig) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;

        Ok(Self {
            env,
            upload_field: config.upload_field.clone(),
            extensions: config.allowed_extensions.clone(),
            max_upload: config.max_upload_label(),
            target: config.target_format,
        })
    }

    /// Render the form, optionally with an error message.
    ///
    /// The message is HTML-escaped since it may contain client filenames.
    pub fn render_index(&self, error: Option<&str>) -> Result<String, minijinja::Error> {
        let template = self.env.get_template("index.html")?;
        template.render(context! {
            error => error,
            field => &self.upload_field,
            extensions => &self.extensions,
            max_upload => &self.max_upload,
            target => self.target.extension(),
        })
    }
}

/// Middleware that turns error responses into the rendered form.
///
/// Handles responses produced by [`AppError`] as well as the bare 405 and
/// 413 responses axum emits on its own.
pub async fn render_error_pages(
    State(ctx): State<AppContext>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let message = match response.extensions().get::<ErrorPage>() {
        Some(page) => page.message.clone(),
        None => match response.status() {
            StatusCode::METHOD_NOT_ALLOWED => AppError::MethodNotAllowed.user_message(),
            StatusCode::PAYLOAD_TOO_LARGE => {
                too_large_message(ctx.config.conversion.max_upload_bytes)
            }
            _ => return response,
        },
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);

    match ctx.pages.render_index(Some(&message)) {
        Ok(html) => {
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            Response::from_parts(parts, Body::from(html))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error page");
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            );
            Response::from_parts(parts, Body::from(message))
        }
    }
}
