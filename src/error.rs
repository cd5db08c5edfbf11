use std::fmt;
use std::io;
use std::path::PathBuf;

use image::ImageError;
use thiserror::Error;

/// Errors that stop a whole run before anything is written
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Refusing to overwrite the input file: {}", .0.display())]
    SameInputOutput(PathBuf),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Element {index}: field \"{field}\" is not a string")]
    NonStringField { index: usize, field: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Closed set of reasons a single file can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemErrorKind {
    NotFound,
    PermissionDenied,
    AlreadyExists,
    Unsupported,
    DecodeFailed,
    EncodeFailed,
    Io,
}

impl ItemErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::AlreadyExists => "already exists",
            Self::Unsupported => "unsupported",
            Self::DecodeFailed => "decode failed",
            Self::EncodeFailed => "encode failed",
            Self::Io => "i/o error",
        }
    }
}

impl fmt::Display for ItemErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<io::ErrorKind> for ItemErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::Unsupported => Self::Unsupported,
            _ => Self::Io,
        }
    }
}

/// A per-file failure; recorded in the run report instead of aborting the run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ItemError {
    pub kind: ItemErrorKind,
    pub message: String,
}

impl ItemError {
    pub fn new(kind: ItemErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<io::Error> for ItemError {
    fn from(err: io::Error) -> Self {
        Self::new(err.kind().into(), err.to_string())
    }
}

impl From<ImageError> for ItemError {
    fn from(err: ImageError) -> Self {
        let kind = match &err {
            ImageError::Decoding(_) => ItemErrorKind::DecodeFailed,
            ImageError::Encoding(_) | ImageError::Parameter(_) => ItemErrorKind::EncodeFailed,
            ImageError::Unsupported(_) | ImageError::Limits(_) => ItemErrorKind::Unsupported,
            ImageError::IoError(io_err) => io_err.kind().into(),
        };
        Self::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_kind() {
        let err: ItemError = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert_eq!(err.kind, ItemErrorKind::PermissionDenied);
        assert_eq!(err.to_string(), "nope");

        let err: ItemError = io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into();
        assert_eq!(err.kind, ItemErrorKind::Io);
    }

    #[test]
    fn fatal_errors_name_the_path() {
        let err = AssetError::FolderNotFound(PathBuf::from("/no/such/place"));
        assert_eq!(err.to_string(), "Folder not found: /no/such/place");
    }
}
