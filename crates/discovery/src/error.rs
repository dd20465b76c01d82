use thiserror::Error;

/// Errors that can occur while discovering files.
///
/// A denied permission or a cancelled pick is not an error; both yield an
/// empty list.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A file could not be inspected.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// The media library failed while enumerating assets.
    #[error("media library error: {0}")]
    Library(String),

    /// The document picker failed.
    #[error("failed to pick files: {0}")]
    Picker(String),
}
