use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::{Error, PrismClient, http_error};

/// Characters escaped when a value is used as a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Default page size for the per-user listing.
pub const DEFAULT_LISTING_LIMIT: u32 = 100;

/// One file to send to `POST /upload-file/`.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    /// Sent as both the multipart filename and the `originalName` field.
    pub file_name: String,
    pub mime_type: String,
    pub user_id: String,
    /// Category string such as `pdf` or `image`.
    pub file_type: String,
    pub project_id: Option<String>,
}

/// Successful upload response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub key: String,
    pub url: String,
}

/// Listing returned by `GET /s3/users/{userId}/files`.
///
/// The backend does not fix this shape, so it is kept as raw JSON and only
/// inspected through the helpers below.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FileListing(pub serde_json::Value);

impl FileListing {
    /// Number of listed entries: the length of a top-level array, or of a
    /// `files` array on an object. `None` if neither is present.
    pub fn entry_count(&self) -> Option<usize> {
        match &self.0 {
            serde_json::Value::Array(items) => Some(items.len()),
            serde_json::Value::Object(map) => map
                .get("files")
                .and_then(serde_json::Value::as_array)
                .map(Vec::len),
            _ => None,
        }
    }
}

impl PrismClient {
    /// Upload one file as a multipart form.
    ///
    /// Fields: `file` (binary), `userId`, `originalName`, `fileType` and
    /// optionally `projectId`. Any non-2xx status is an error.
    pub async fn upload_file(&self, request: UploadRequest) -> Result<UploadResponse, Error> {
        let url = format!("{}/upload-file/", self.base_url);
        debug!(
            file_name = %request.file_name,
            size = request.bytes.len(),
            file_type = %request.file_type,
            "uploading file"
        );

        let part = Part::bytes(request.bytes)
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|e| Error::Configuration(format!("invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", part)
            .text("userId", request.user_id)
            .text("originalName", request.file_name)
            .text("fileType", request.file_type);
        if let Some(project_id) = request.project_id {
            form = form.text("projectId", project_id);
        }

        let response = self
            .add_auth(self.client.post(&url))
            .header("Accept", "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(http_error(response, "Upload").await);
        }

        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// List files stored for a user.
    pub async fn list_user_files(&self, user_id: &str, limit: u32) -> Result<FileListing, Error> {
        let url = format!(
            "{}/s3/users/{}/files",
            self.base_url,
            utf8_percent_encode(user_id, PATH_SEGMENT)
        );

        let response = self
            .add_auth(self.client.get(&url))
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(http_error(response, "File listing").await);
        }

        response
            .json::<FileListing>()
            .await
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}
