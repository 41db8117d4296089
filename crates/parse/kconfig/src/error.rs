//! Error types for Kconfig loading and build-rule scanning.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a parse or a build-rule scan.
///
/// Malformed-but-recoverable input is reported as a
/// [`Diagnostic`](crate::Diagnostic) instead.
#[derive(Debug, Error)]
pub enum KconfigError {
    /// A Kconfig or build-rule file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Fully resolved path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A scope closer with no matching opener, in strict mode.
    #[error("{file}:{line}: `{directive}` without a matching opener")]
    Unbalanced {
        /// File identifier as recorded in the symbol table.
        file: String,
        /// Physical line number of the closer.
        line: usize,
        /// The closing keyword (`endif`, `endmenu` or `endchoice`).
        directive: &'static str,
    },

    /// Walking the source tree for build-rule files failed.
    #[error("failed to scan source tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl KconfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KconfigError>;
