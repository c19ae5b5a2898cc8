//! Docs directory discovery and document loading.

use crate::types::SourceDocument;
use copilot_core::{AppError, AppResult};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Check whether a path names a markdown file.
pub fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// Read every `*.md` file directly inside `docs_dir`, sorted by file name.
///
/// Subdirectories are not descended into.
pub fn load_documents(docs_dir: &Path) -> AppResult<Vec<SourceDocument>> {
    if !docs_dir.is_dir() {
        return Err(AppError::Knowledge(format!(
            "Docs directory not found: {:?}",
            docs_dir
        )));
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(docs_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .follow_links(true)
    {
        let entry = entry.map_err(|e| {
            AppError::Knowledge(format!("Failed to read docs directory {:?}: {}", docs_dir, e))
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown(path) {
            continue;
        }

        let text = fs::read_to_string(path)
            .map_err(|e| AppError::Knowledge(format!("Failed to read {:?}: {}", path, e)))?;

        let name = entry.file_name().to_string_lossy().into_owned();
        tracing::debug!("Loaded document {} ({} chars)", name, text.chars().count());

        documents.push(SourceDocument {
            name,
            path: path.to_path_buf(),
            text,
        });
    }

    tracing::info!(
        "Found {} markdown documents in {:?}",
        documents.len(),
        docs_dir
    );

    Ok(documents)
}
