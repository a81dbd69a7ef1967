//! Error types for descriptor reading and writing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding descriptor markup.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Input is not valid UTF-8.
    #[error("descriptor is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The markup itself is malformed.
    #[error("malformed descriptor at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    /// The document contains no element at all.
    #[error("descriptor has no root element")]
    MissingRoot,

    /// The root element is not `Workspace`.
    #[error("unexpected root element <{name}>, expected <Workspace>")]
    UnexpectedRoot { name: String },

    /// More than one top-level element.
    #[error("descriptor has more than one root element")]
    MultipleRoots,

    /// A descriptor file could not be read.
    #[error("failed to read descriptor {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while encoding or saving a descriptor.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The markup writer failed.
    #[error("failed to write descriptor markup: {0}")]
    Xml(String),

    /// A descriptor file could not be written.
    #[error("failed to write descriptor {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
