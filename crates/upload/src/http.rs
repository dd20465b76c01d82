use async_trait::async_trait;
use prismbreak_client::upload::DEFAULT_LISTING_LIMIT;
use prismbreak_client::{FileListing, PrismClient, UploadRequest};
use prismbreak_core::{FileDescriptor, Identity, RemoteObject};
use tracing::debug;

use crate::error::UploadError;
use crate::transport::UploadTransport;

/// [`UploadTransport`] backed by the PrismBreak HTTP API.
///
/// File bytes are read from the descriptor's locator, which for the bundled
/// discovery sources is a filesystem path.
#[derive(Debug, Clone)]
pub struct HttpUploadTransport {
    client: PrismClient,
}

impl HttpUploadTransport {
    pub fn new(client: PrismClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UploadTransport for HttpUploadTransport {
    async fn transmit(
        &self,
        file: &FileDescriptor,
        identity: &Identity,
        project_id: Option<&str>,
    ) -> Result<RemoteObject, UploadError> {
        let bytes = tokio::fs::read(file.locator())
            .await
            .map_err(|e| UploadError::Read {
                locator: file.locator().to_owned(),
                message: e.to_string(),
            })?;
        debug!(file_id = file.id(), size = bytes.len(), "read file for upload");

        let stored = self
            .client
            .upload_file(UploadRequest {
                bytes,
                file_name: file.name().to_owned(),
                mime_type: file.effective_mime_type().to_owned(),
                user_id: identity.user_id.clone(),
                file_type: file.category().as_str().to_owned(),
                project_id: project_id.map(str::to_owned),
            })
            .await?;

        Ok(RemoteObject {
            key: stored.key,
            url: stored.url,
        })
    }

    async fn list_files(&self, identity: &Identity) -> Result<FileListing, UploadError> {
        Ok(self
            .client
            .list_user_files(&identity.user_id, DEFAULT_LISTING_LIMIT)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use prismbreak_client::mock_server::{MockResponse, MockServer};

    use super::*;

    #[tokio::test]
    async fn transmits_file_bytes_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minutes.txt");
        std::fs::write(&path, b"meeting minutes").unwrap();

        let server = MockServer::start(vec![MockResponse::json(
            200,
            r#"{"key":"user_1/minutes.txt","url":"https://store/minutes.txt"}"#,
        )])
        .await;
        let transport = HttpUploadTransport::new(PrismClient::new(server.base_url()));
        let file =
            FileDescriptor::picked(1, 0, "minutes.txt", path.display().to_string(), Some(15), None);
        let identity = Identity::new("user_1", "sess_1");

        let remote = transport.transmit(&file, &identity, None).await.unwrap();
        assert_eq!(remote.key, "user_1/minutes.txt");

        let body = server.requests()[0].body_text();
        assert!(body.contains("meeting minutes"));
        assert!(body.contains("text/plain"));
        assert!(body.contains("name=\"fileType\"\r\n\r\ntxt"));
    }

    #[tokio::test]
    async fn unreadable_locator_is_a_read_error() {
        let server = MockServer::start(Vec::new()).await;
        let transport = HttpUploadTransport::new(PrismClient::new(server.base_url()));
        let file = FileDescriptor::picked(1, 0, "gone.pdf", "/definitely/not/here.pdf", None, None);

        let err = transport
            .transmit(&file, &Identity::new("u", "s"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));
        assert_eq!(server.request_count(), 0);
    }
}
