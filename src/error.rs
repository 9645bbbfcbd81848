//! Error types shared across the engine.
//!
//! Exactly two kinds cross the boundary to the host build tool:
//!
//! - **Configuration errors** - caller-supplied parameters violate an
//!   invariant checkable before any I/O (missing required root, rename with
//!   zero filters, bad pattern). No partial work is attempted.
//! - **I/O errors** - a filesystem operation failed mid-pipeline. The
//!   invocation aborts; partially written outputs are left as-is and the
//!   host decides whether to retry or clean up.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The error type for every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied configuration violates a pre-I/O invariant.
    #[error("configuration error: {0}")]
    Config(String),

    /// An include/exclude pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    /// A filesystem operation failed, tagged with the path involved.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Coarse classification the host can branch on without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Adapter for `map_err`: tags an `std::io::Error` with the path it
    /// happened on.
    pub(crate) fn io(path: impl AsRef<Path>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| Error::Io { path, source }
    }

    /// Which of the two host-visible kinds this error is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::Pattern { .. } => ErrorKind::Config,
            Error::Io { .. } => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
