//! Error types for the schema viewer

use thiserror::Error;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Schema viewer errors
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Malformed schema at {path}: {message}")]
    StructuralSchema { path: String, message: String },

    #[error("Dangling reference: no definition '{name}' in {document}")]
    DanglingReference { name: String, document: String },

    #[error("Circular reference: {0} only leads back to itself")]
    CircularReference(String),

    #[error("Unresolvable document: {0}")]
    UnresolvableDocument(String),

    #[error("Unknown demo view: {0}")]
    UnknownView(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ViewerError {
    pub(crate) fn structural(path: &str, message: impl Into<String>) -> Self {
        ViewerError::StructuralSchema {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            message: message.into(),
        }
    }

    /// Whether this error only appears when a reference is expanded
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            ViewerError::DanglingReference { .. }
                | ViewerError::CircularReference(_)
                | ViewerError::UnresolvableDocument(_)
        )
    }
}
