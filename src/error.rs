//! Error types for the scanning and summary pipeline

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures surfaced by the scanner, extractor, serializer and prompt builder.
#[derive(Debug, Error)]
pub enum RampUpError {
    /// Scan root missing, not a directory, or an unusable filter.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A file expected to exist was gone at the moment of access.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize or parse summary {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON rendering for prompt text, where no file is involved.
    #[error("failed to render {what} as JSON: {source}")]
    Render {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, RampUpError>;

impl RampUpError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Classify an I/O error, mapping `ErrorKind::NotFound` to [`RampUpError::NotFound`].
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_classified() {
        let err = RampUpError::from_io(
            Path::new("gone.py"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, RampUpError::NotFound { .. }));
        assert!(err.to_string().contains("gone.py"));
    }

    #[test]
    fn test_render_error_names_what_was_rendered() {
        let source = serde_json::from_str::<u8>("not json").unwrap_err();
        let err = RampUpError::Render {
            what: "repository summary".to_string(),
            source,
        };
        let message = err.to_string();
        assert!(message.starts_with("failed to render repository summary as JSON"));
        assert!(!message.contains("repo_summary.json"));
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = RampUpError::from_io(
            Path::new("locked.py"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, RampUpError::Io { .. }));
        assert!(err.to_string().contains("denied"));
    }
}
