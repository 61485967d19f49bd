//! Error types and result alias for restyle_core.
//!
//! Every failure surfaces to the immediate caller as one of the
//! [`ResourceError`] variants. "No style marker found" is not an error; it
//! resolves to the named default style.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Debug, Error)]
pub enum ResourceError {
    /// The filesystem refused a query (permission denied, path vanished mid-walk)
    #[error("failed to access {}: {source}", path.display())]
    FilesystemAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An explicitly named path does not exist
    #[error("no such file or directory: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// The encoding label is unknown, or the text/bytes are not valid in it
    #[error("encoding error ({encoding}): {message}")]
    Encoding { encoding: String, message: String },

    /// Committing output failed part way
    #[error("failed to write {destination}: {source}")]
    WriteFailure {
        destination: String,
        #[source]
        source: io::Error,
    },

    /// An exclude pattern could not be compiled
    #[error("invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ResourceError {
    pub(crate) fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ResourceError::FilesystemAccess { path: path.into(), source }
    }

    /// Like [`ResourceError::access`], but for paths the caller named explicitly,
    /// where a missing path is reported as such.
    pub(crate) fn explicit(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            return ResourceError::PathNotFound { path };
        }
        ResourceError::FilesystemAccess { path, source }
    }

    pub(crate) fn encoding(encoding: &str, message: impl Into<String>) -> Self {
        ResourceError::Encoding { encoding: encoding.to_string(), message: message.into() }
    }
}
