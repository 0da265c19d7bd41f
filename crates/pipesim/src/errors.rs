//! Error types for loading program files.
//!
//! Only whole-file problems are errors. Rejected tokens and dependency pairs
//! are collected as [`Diagnostic`](crate::loader::Diagnostic)s so one bad line
//! never aborts a load.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a usable program from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file was read but named no valid instruction.
    #[error("{} contains no instructions", path.display())]
    Empty {
        /// Path that was read.
        path: PathBuf,
    },
}

impl LoadError {
    /// Path the failed attempt used.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Empty { path } => path,
        }
    }
}
