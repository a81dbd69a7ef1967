//! Error types for workspace packaging.

use std::path::PathBuf;
use thiserror::Error;

use apw_xml::{EncodeError, FormatError};

/// Errors raised while loading, verifying or packaging a workspace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PackError {
    /// The descriptor could not be decoded.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The descriptor could not be encoded or saved.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Referenced files are absent from disk.
    #[error("{} not found", file_count(.missing.len()))]
    MissingFiles {
        /// Absolute paths of every absent file.
        missing: Vec<PathBuf>,
    },

    /// No project with the requested identifier.
    #[error("project not found: {identifier}")]
    ProjectNotFound { identifier: String },

    /// No system with the requested identifier in the selected projects.
    #[error("system not found: {identifier}")]
    SystemNotFound { identifier: String },

    /// A directory to search does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// A filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive writer failed.
    #[error("archive error in {path}: {message}")]
    Zip { path: PathBuf, message: String },
}

impl PackError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn zip(path: impl Into<PathBuf>, error: &zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

fn file_count(count: usize) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{count} files")
    }
}

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_message_counts() {
        let one = PackError::MissingFiles {
            missing: vec![PathBuf::from("/a")],
        };
        assert_eq!(one.to_string(), "1 file not found");

        let two = PackError::MissingFiles {
            missing: vec![PathBuf::from("/a"), PathBuf::from("/b")],
        };
        assert_eq!(two.to_string(), "2 files not found");
    }
}
