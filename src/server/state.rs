//! Server application state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::completion::{Completer, CompletionClient, CompletionError};
use crate::config::CompletionSettings;
use crate::error::AppError;

/// Shared, read-only handler state
#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when no API credential is configured
    completer: Option<Arc<dyn Completer>>,
    upload_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(completer: Option<Arc<dyn Completer>>) -> Self {
        Self {
            completer,
            upload_dir: None,
        }
    }

    /// Stage uploads in `dir` instead of the system temp dir
    pub fn with_upload_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.upload_dir = dir;
        self
    }

    pub fn upload_dir(&self) -> Option<&Path> {
        self.upload_dir.as_deref()
    }

    /// Build state from completion settings; a missing key leaves the
    /// generation routes answering with a configuration error
    pub fn from_settings(settings: &CompletionSettings) -> Result<Self, CompletionError> {
        match CompletionClient::new(settings) {
            Ok(client) => {
                tracing::info!(
                    endpoint = %client.endpoint(),
                    model = %client.model(),
                    "completion client ready"
                );
                Ok(Self::new(Some(Arc::new(client))))
            }
            Err(CompletionError::MissingApiKey) => {
                tracing::warn!("API key not set, /reviewer/ and /quiz/ will fail until it is");
                Ok(Self::new(None))
            }
            Err(e) => Err(e),
        }
    }

    pub fn completer(&self) -> Result<&dyn Completer, AppError> {
        self.completer
            .as_deref()
            .ok_or_else(|| AppError::from(CompletionError::MissingApiKey))
    }
}
