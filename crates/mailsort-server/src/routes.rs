//! HTTP routes and handlers

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    BoxError, Json, Router,
};
use mailsort_classifiers::{compose_reply, Explanation};
use mailsort_core::text::char_len;
use mailsort_core::{normalize, Category, Input};
use serde::Serialize;
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::state::AppState;
use crate::static_files;

pub fn create_router(state: AppState) -> Router {
    let max_body = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/classify", post(classify))
        .fallback(fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(middleware::map_response(json_payload_too_large))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Classification response
#[derive(Debug, Serialize)]
struct ClassifyResponse {
    category: Category,
    score: f32,
    suggested_subject: String,
    suggested_reply: String,
    meta: ResponseMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanations: Option<Explanation>,
}

#[derive(Debug, Serialize)]
struct ResponseMeta {
    /// Normalized text length in characters
    chars: usize,
}

/// Form fields of a classification request
#[derive(Debug, Default)]
struct ClassifyForm {
    raw_text: Option<String>,
    file: Option<(String, Vec<u8>)>,
    return_debug: bool,
}

impl ClassifyForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("raw_text") => form.raw_text = Some(field.text().await?),
                Some("file") => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    form.file = Some((file_name, bytes.to_vec()));
                }
                Some("return_debug") => form.return_debug = parse_flag(&field.text().await?),
                other => debug!("Ignoring unknown form field {:?}", other),
            }
        }

        Ok(form)
    }
}

/// HTML-form style boolean
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

/// Main classification handler
async fn classify(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    metrics::counter!("mailsort_requests_total").increment(1);

    let multipart = multipart.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let form = ClassifyForm::read(multipart).await?;

    let input = Input::from_parts(form.raw_text, form.file);
    if let Input::File { name, bytes } = &input {
        info!(file = %name, size = bytes.len(), "Received document upload");
    }

    // PDF extraction is CPU-bound
    let raw = tokio::task::spawn_blocking(move || input.into_text())
        .await
        .map_err(|e| mailsort_core::Error::internal(format!("extraction task failed: {}", e)))??;

    let text = normalize(&raw);
    if text.is_empty() {
        return Err(mailsort_core::Error::EmptyContent.into());
    }

    let result = state.orchestrator.classify(&text).await;
    let reply = compose_reply(result.category);

    Ok(Json(ClassifyResponse {
        category: result.category,
        score: result.score,
        suggested_subject: reply.subject,
        suggested_reply: reply.body,
        meta: ResponseMeta {
            chars: char_len(&text),
        },
        explanations: form.return_debug.then_some(result.explanation),
    }))
}

/// The body limit layer rejects oversized requests with a plain-text 413
async fn json_payload_too_large<B>(response: Response<B>) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge.into_response();
    }
    response.map(Body::new)
}

async fn fallback(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        return AppError::NotFound(uri.path().to_string()).into_response();
    }
    static_files::serve_static(uri).await
}

/// Error handling
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("no route for {0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn reason(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::PayloadTooLarge => "payload_too_large",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<mailsort_core::Error> for AppError {
    fn from(err: mailsort_core::Error) -> Self {
        if err.is_client_error() {
            AppError::InvalidRequest(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::InvalidRequest(err.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "invalid_request_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "invalid_request_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error"),
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        metrics::counter!("mailsort_rejected_total", "reason" => self.reason()).increment(1);

        let body = json!({
            "error": {
                "message": self.to_string(),
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
