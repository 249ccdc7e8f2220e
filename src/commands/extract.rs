//! Extract command handler

use anyhow::{bail, Context, Result};
use std::path::Path;

use quizgen::generate::{extract_path, require_text};
use quizgen::ExtractMode;
use quizgen::ExtractorRegistry;

/// Check the file is a supported document and return its prompt-mode text
pub async fn load_text(file: &Path) -> Result<String> {
    ensure_supported(file)?;
    let text = extract_path(file, ExtractMode::Prompt)
        .await
        .with_context(|| format!("Failed to extract {}", file.display()))?;
    require_text(&text)?;
    Ok(text)
}

fn ensure_supported(file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("File not found: {}", file.display());
    }

    let ext = file
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !ExtractorRegistry::new().is_supported(&ext) {
        bail!(
            "Unsupported file type {:?} (expected .pdf or .pptx): {}",
            ext,
            file.display()
        );
    }
    Ok(())
}

pub async fn run_extract(file: &Path, raw: bool) -> Result<()> {
    ensure_supported(file)?;
    let mode = if raw { ExtractMode::Raw } else { ExtractMode::Prompt };

    let text = extract_path(file, mode)
        .await
        .with_context(|| format!("Failed to extract {}", file.display()))?;

    if text.trim().is_empty() {
        eprintln!("No readable text found in {}", file.display());
        return Ok(());
    }

    println!("{}", text);
    eprintln!("\n{} characters extracted", text.chars().count());
    Ok(())
}
