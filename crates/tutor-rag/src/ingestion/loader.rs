//! Document loader: file path to ordered text units
//!
//! PDFs produce one unit per page, text files one unit for the whole file.
//! The loader is a pure read; deleting the source afterwards is the
//! caller's responsibility.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Load a document into its ordered text units
pub fn load(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "document path '{}' does not exist",
            path.display()
        )));
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => {
            tracing::info!(path = %path.display(), "loading PDF document");
            let pages = pdf_extract::extract_text_by_pages(path)
                .map_err(|e| Error::file_parse(&filename, e.to_string()))?;
            Ok(pages)
        }
        "txt" => {
            tracing::info!(path = %path.display(), "loading text document");
            let content = fs::read_to_string(path)?;
            Ok(vec![content])
        }
        other => Err(Error::UnsupportedFormat(format!(
            "'{}' - expected a .pdf or .txt file",
            if other.is_empty() { filename.as_str() } else { other }
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_text_file_is_one_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "First paragraph.\n\nSecond paragraph.").unwrap();

        let units = load(&path).unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].contains("First paragraph."));
        assert!(units[0].contains("Second paragraph."));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let err = load(Path::new("/nonexistent/notes.txt")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.pptx");
        fs::write(&path, b"not really a deck").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extensionless_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README");
        fs::write(&path, b"plain bytes").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
