use thiserror::Error;

/// Errors returned by a search.
///
/// A failed search never carries partial results.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend was unreachable, answered with a non-success status, or
    /// sent a body that could not be parsed.
    #[error(transparent)]
    Transport(#[from] prismbreak_client::Error),
}

impl SearchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
        }
    }
}
