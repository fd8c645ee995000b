//! Uploaded document files
//!
//! Uploads are ephemeral: saved before ingestion and deleted right after a
//! successful load. Only their derived chunks persist. Documents under the
//! protected example namespace are shared fixtures and are never deleted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Decode and save an uploaded document, returning its path
pub fn save_document(dir: &Path, document_name: &str, document_base64: &str) -> Result<PathBuf> {
    if document_name.contains('/') || document_name.contains('\\') || document_name.contains("..")
    {
        return Err(Error::Config(format!(
            "document name '{document_name}' must not contain path separators"
        )));
    }

    fs::create_dir_all(dir)?;

    let bytes = STANDARD
        .decode(document_base64)
        .map_err(|e| Error::file_parse(document_name, format!("invalid base64 payload: {e}")))?;

    let path = dir.join(document_name);
    fs::write(&path, bytes)?;

    tracing::info!(path = %path.display(), "document saved");
    Ok(path)
}

/// Delete an uploaded document file; best-effort, logged, never fails
pub fn delete_document(path: &Path, protected_namespace: &str) {
    let protected = path
        .components()
        .any(|component| component.as_os_str() == protected_namespace);
    if protected {
        tracing::debug!(path = %path.display(), "skipping deletion of protected document");
        return;
    }

    match fs::remove_file(path) {
        Ok(()) => tracing::info!(path = %path.display(), "document deleted"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "document does not exist");
        }
        Err(e) => tracing::warn!(path = %path.display(), "failed to delete document: {e}"),
    }
}
