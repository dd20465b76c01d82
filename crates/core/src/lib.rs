//! Shared data model for the PrismBreak ingestion and search client.
//!
//! Every other crate in the workspace speaks in these types: file
//! descriptors produced by discovery, progress and results produced by the
//! upload orchestrator, normalized search hits, and the session state owned
//! by the session gate.

pub mod file;
pub mod search;
pub mod session;
pub mod upload;

pub use file::{
    DEFAULT_MIME_TYPE, FileCategory, FileDescriptor, SUPPORTED_MIME_TYPES, SizeKind,
    mime_allowed, mime_from_name,
};
pub use search::{
    ResultMetadata, SearchResult, UNKNOWN_FILE_NAME, UNKNOWN_FILE_TYPE, format_file_size,
    strip_emphasis,
};
pub use session::{Identity, SessionState};
pub use upload::{BatchOutcome, RemoteObject, UploadProgress, UploadResult, UploadStatus};
