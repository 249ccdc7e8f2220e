//! Temporary storage for uploaded documents
//!
//! The upload is written to a named temp file so the extractors can open it
//! by path. The file is removed when the [`TempUpload`] is dropped.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

pub struct TempUpload {
    file: NamedTempFile,
    extension: String,
}

impl TempUpload {
    /// Persist `bytes` under a temp name carrying `file_name`'s extension
    pub fn from_bytes(file_name: &str, bytes: &[u8]) -> std::io::Result<Self> {
        Self::from_bytes_in(None, file_name, bytes)
    }

    /// Like [`TempUpload::from_bytes`], inside `dir` (system temp dir when `None`)
    pub fn from_bytes_in(
        dir: Option<&Path>,
        file_name: &str,
        bytes: &[u8],
    ) -> std::io::Result<Self> {
        let extension = extension_of(file_name);
        let suffix = if extension.is_empty() {
            String::new()
        } else {
            format!(".{}", extension)
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix("quizgen_").suffix(&suffix);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;

        tracing::debug!(
            path = %file.path().display(),
            bytes = bytes.len(),
            "upload stored"
        );

        Ok(Self { file, extension })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Lower-cased extension of the original file name ("" when absent)
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
