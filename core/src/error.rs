//! Error types for the search engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by engine construction, configuration and content lookup.
///
/// Query evaluation never produces one of these: an empty or unmatched query
/// is an empty hit list.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Root directory does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("Root path is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_document_not_found() {
        let err = SearchError::DocumentNotFound("/notes/a.txt".into());
        assert_eq!(err.to_string(), "Document not found: /notes/a.txt");
    }

    #[test]
    fn test_display_root_not_directory() {
        let path = PathBuf::from("/notes/a.txt");
        let err = SearchError::RootNotDirectory(path.clone());
        assert_eq!(
            err.to_string(),
            format!("Root path is not a directory: {}", path.display())
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SearchError = io.into();
        assert!(matches!(err, SearchError::Io(_)));
    }
}
