use async_trait::async_trait;
use prismbreak_client::FileListing;
use prismbreak_core::{FileDescriptor, Identity, RemoteObject};

use crate::error::UploadError;

/// Sends one file to the storage backend.
///
/// Implementations must not retry internally; the orchestrator reports each
/// attempt exactly once.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Transmit `file` on behalf of `identity`.
    async fn transmit(
        &self,
        file: &FileDescriptor,
        identity: &Identity,
        project_id: Option<&str>,
    ) -> Result<RemoteObject, UploadError>;

    /// Fetch the backend's listing of files stored for `identity`.
    async fn list_files(&self, identity: &Identity) -> Result<FileListing, UploadError>;
}
