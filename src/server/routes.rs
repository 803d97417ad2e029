//! HTTP routes.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::{Method, header};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::LimitsConfig;
use super::error::ApiError;
use crate::scanner::{AnalyzeRequest, Scanner, Upload};
use crate::types::AnalyzeResponse;

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

/// Router with CORS, tracing and the upload size limit applied.
pub fn router(scanner: Arc<Scanner>, limits: &LimitsConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(limits.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { scanner })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn version() -> Json<Value> {
    Json(json!({ "version": crate::version_string() }))
}

/// JSON or urlencoded body of `POST /analyze`. Uploads need multipart instead.
#[derive(Debug, Default, Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    save_raw_to: Option<PathBuf>,
}

async fn analyze(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let analyze_request = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        read_multipart(multipart).await?
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(body) = Form::<AnalyzeBody>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        let save_raw_to = body.save_raw_to.filter(|p| !p.as_os_str().is_empty());
        AnalyzeRequest::new(None, body.url, save_raw_to)?
    } else {
        let body = Bytes::from_request(request, &state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        let body: AnalyzeBody = if body.is_empty() {
            AnalyzeBody::default()
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))?
        };
        AnalyzeRequest::new(None, body.url, body.save_raw_to)?
    };

    let response = state.scanner.analyze(analyze_request).await?;
    Ok(Json(response))
}

async fn read_multipart(mut multipart: Multipart) -> Result<AnalyzeRequest, ApiError> {
    let mut file = None;
    let mut url = None;
    let mut save_raw_to = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("multipart error: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = match field.file_name() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => {
                        return Err(ApiError::bad_request(
                            "field 'file' must be a file upload with a filename",
                        ));
                    }
                };
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("read error: {e}")))?;
                file = Some(Upload::new(filename, bytes.to_vec()));
            }
            Some("url") => {
                url = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("read error: {e}")))?,
                );
            }
            Some("save_raw_to") => {
                let path = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("read error: {e}")))?;
                if !path.is_empty() {
                    save_raw_to = Some(PathBuf::from(path));
                }
            }
            _ => {}
        }
    }

    Ok(AnalyzeRequest::new(file, url, save_raw_to)?)
}
