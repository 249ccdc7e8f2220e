//! Upload-to-output workflow shared by the HTTP handlers and the CLI
//!
//! extract → check for text → build prompt → complete → (parse)

use std::path::{Path, PathBuf};

use crate::completion::{Completer, CompletionError};
use crate::error::AppError;
use crate::extract::ExtractorRegistry;
use crate::parser::parse_quiz;
use crate::prompt::{build_prompt, question_count, truncate_content, PromptKind};
use crate::types::{ExtractMode, QuizItem};
use crate::upload::TempUpload;

/// Store an uploaded file (in `upload_dir`, else the system temp dir) and
/// extract its text off the async runtime
pub async fn extract_upload(
    upload_dir: Option<PathBuf>,
    file_name: String,
    bytes: Vec<u8>,
    mode: ExtractMode,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || -> Result<String, AppError> {
        let upload = TempUpload::from_bytes_in(upload_dir.as_deref(), &file_name, &bytes)
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;
        let text = ExtractorRegistry::new().extract(upload.path(), upload.extension(), mode)?;
        tracing::info!(
            file = %file_name,
            extension = %upload.extension(),
            chars = text.chars().count(),
            "text extracted from upload"
        );
        Ok(text)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))?
}

/// Extract text from a file already on disk
pub async fn extract_path(path: &Path, mode: ExtractMode) -> Result<String, AppError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<String, AppError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(ExtractorRegistry::new().extract(&path, &ext, mode)?)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))?
}

/// Reject whitespace-only text
pub fn require_text(text: &str) -> Result<&str, AppError> {
    if text.trim().is_empty() {
        Err(AppError::no_text())
    } else {
        Ok(text)
    }
}

/// Generate a study reviewer for `text`; the model output is returned as-is
pub async fn generate_reviewer(
    completer: &dyn Completer,
    text: &str,
) -> Result<String, CompletionError> {
    let prompt = build_prompt(text, PromptKind::Reviewer);
    let reviewer = completer.complete(&prompt).await?;
    tracing::info!(chars = reviewer.chars().count(), "reviewer generated");
    Ok(reviewer)
}

/// Generate a quiz for `text` and parse it into items
pub async fn generate_quiz(
    completer: &dyn Completer,
    text: &str,
) -> Result<Vec<QuizItem>, CompletionError> {
    let questions = question_count(truncate_content(text).chars().count());
    let prompt = build_prompt(text, PromptKind::Quiz { questions });
    let raw = completer.complete(&prompt).await?;

    let items = parse_quiz(&raw);
    if items.len() != questions {
        tracing::debug!(
            requested = questions,
            parsed = items.len(),
            "quiz item count differs from request"
        );
    }
    tracing::info!(items = items.len(), "quiz generated");
    Ok(items)
}
