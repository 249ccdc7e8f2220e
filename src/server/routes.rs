//! HTTP API route handlers

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, Method},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::generate::{extract_upload, generate_quiz, generate_reviewer, require_text};
use crate::server::request_id::request_id_middleware;
use crate::server::AppState;
use crate::types::{ExtractMode, QuizResponse, ReviewerResponse, UploadResponse};
use crate::utils::char_prefix;

/// Multipart field carrying the document
pub const FILE_FIELD: &str = "file";
/// Characters of extracted text echoed back by `/upload/`
pub const UPLOAD_PREVIEW_CHARS: usize = 500;

/// Create the main application router
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/upload", post(handle_upload))
        .route("/upload/", post(handle_upload))
        .route("/reviewer", post(handle_reviewer))
        .route("/reviewer/", post(handle_reviewer))
        .route("/quiz", post(handle_quiz))
        .route("/quiz/", post(handle_quiz))
        .layer(DefaultBodyLimit::max(config.max_upload_mb * 1024 * 1024))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

/// CORS restricted to the configured origins ("*" allows any)
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Pull the `file` field out of the form as (file name, bytes)
async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(String, Vec<u8>), AppError> {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "request body is not a multipart form");
            return Err(AppError::no_file());
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                tracing::warn!("request with no file");
                return Err(AppError::no_file());
            }
            Err(e) => return Err(AppError::Input(format!("Failed to read multipart: {}", e))),
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Input(format!("Failed to read file: {}", e)))?;

        tracing::debug!(file = %file_name, bytes = bytes.len(), "processing file upload");
        return Ok((file_name, bytes.to_vec()));
    }
}

async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let (file_name, bytes) = read_file_field(multipart).await?;
    let upload_dir = state.upload_dir().map(Path::to_path_buf);
    let text = extract_upload(upload_dir, file_name, bytes, ExtractMode::Raw).await?;

    Ok(Json(UploadResponse {
        text: char_prefix(&text, UPLOAD_PREVIEW_CHARS).to_string(),
    }))
}

async fn handle_reviewer(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ReviewerResponse>, AppError> {
    let (file_name, bytes) = read_file_field(multipart).await?;
    let upload_dir = state.upload_dir().map(Path::to_path_buf);
    let text = extract_upload(upload_dir, file_name, bytes, ExtractMode::Prompt).await?;
    let text = require_text(&text)?;

    let completer = state.completer()?;
    let reviewer = generate_reviewer(completer, text).await?;

    Ok(Json(ReviewerResponse { reviewer }))
}

async fn handle_quiz(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<QuizResponse>, AppError> {
    let (file_name, bytes) = read_file_field(multipart).await?;
    let upload_dir = state.upload_dir().map(Path::to_path_buf);
    let text = extract_upload(upload_dir, file_name, bytes, ExtractMode::Prompt).await?;
    let text = require_text(&text)?;

    let completer = state.completer()?;
    let quiz = generate_quiz(completer, text).await?;

    Ok(Json(QuizResponse { quiz }))
}
