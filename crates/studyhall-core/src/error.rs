//! Quiz document error types.
//!
//! Grading itself is total and never fails; errors arise only at the
//! document boundary, when loading or decoding stored quiz data. The
//! embedding application classifies them to decide whether a reload is
//! worth retrying.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or decoding stored quiz documents.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The document body is not a valid quiz document.
    #[error("malformed quiz document from {source_name}: {message}")]
    Malformed { source_name: String, message: String },

    /// The document could not be read from disk.
    #[error("failed to read quiz document {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QuizError {
    /// Returns `true` if this error is permanent: re-fetching the same
    /// document cannot help. I/O failures may be transient and are left to
    /// the storage layer's retry policy.
    pub fn is_permanent(&self) -> bool {
        matches!(self, QuizError::Malformed { .. })
    }
}
