use thiserror::Error;

/// Errors raised while transmitting a single file.
///
/// The orchestrator never returns these for a batch; they are recorded in the
/// failing file's [`UploadResult`](prismbreak_core::UploadResult).
#[derive(Debug, Error)]
pub enum UploadError {
    /// The backend was unreachable or answered with a non-success status.
    #[error(transparent)]
    Transport(#[from] prismbreak_client::Error),

    /// The file's bytes could not be read from its locator.
    #[error("failed to read {locator}: {message}")]
    Read {
        /// Locator that could not be read.
        locator: String,
        /// Underlying error message.
        message: String,
    },
}

impl UploadError {
    /// Returns `true` if re-sending the same file may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Read { .. } => false,
        }
    }
}
