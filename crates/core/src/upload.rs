use serde::{Deserialize, Serialize};

use crate::file::FileDescriptor;

/// Transmission state of a single file.
///
/// Transitions only go `Uploading -> Completed` or `Uploading -> Error`
/// within one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Completed,
    Error,
}

impl UploadStatus {
    /// Returns `true` for `Completed` and `Error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Progress event for one file of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    pub file_id: String,
    pub file_name: String,
    /// 0 to 100.
    pub progress_percent: u8,
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

impl UploadProgress {
    /// The event emitted when a file's transmission starts.
    pub fn started(file: &FileDescriptor) -> Self {
        Self {
            file_id: file.id().to_owned(),
            file_name: file.name().to_owned(),
            progress_percent: 0,
            status: UploadStatus::Uploading,
            remote_key: None,
            remote_url: None,
        }
    }

    /// The event emitted when a file's transmission succeeded.
    pub fn completed(file: &FileDescriptor, remote: &RemoteObject) -> Self {
        Self {
            file_id: file.id().to_owned(),
            file_name: file.name().to_owned(),
            progress_percent: 100,
            status: UploadStatus::Completed,
            remote_key: Some(remote.key.clone()),
            remote_url: Some(remote.url.clone()),
        }
    }

    /// The event emitted when a file's transmission failed.
    pub fn failed(file: &FileDescriptor) -> Self {
        Self {
            file_id: file.id().to_owned(),
            file_name: file.name().to_owned(),
            progress_percent: 0,
            status: UploadStatus::Error,
            remote_key: None,
            remote_url: None,
        }
    }
}

/// Where the storage backend put an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObject {
    pub key: String,
    pub url: String,
}

/// Final outcome of one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn succeeded(file_id: impl Into<String>, remote: RemoteObject) -> Self {
        Self {
            file_id: file_id.into(),
            success: true,
            remote_key: Some(remote.key),
            remote_url: Some(remote.url),
            error: None,
        }
    }

    pub fn failed(file_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            success: false,
            remote_key: None,
            remote_url: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregate view of a finished batch.
///
/// `PartialFailure` is informational; the batch call itself still succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The batch was empty.
    Empty,
    /// Every file uploaded.
    AllSucceeded,
    /// Some files failed; the listed ids can be retried.
    PartialFailure { failed: Vec<String> },
    /// No file uploaded.
    AllFailed { failed: Vec<String> },
}

impl BatchOutcome {
    /// Summarize a sequence of per-file results.
    pub fn from_results(results: &[UploadResult]) -> Self {
        if results.is_empty() {
            return Self::Empty;
        }
        let failed: Vec<String> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.file_id.clone())
            .collect();
        if failed.is_empty() {
            Self::AllSucceeded
        } else if failed.len() == results.len() {
            Self::AllFailed { failed }
        } else {
            Self::PartialFailure { failed }
        }
    }

    /// Ids of the files that failed, in batch order.
    pub fn failed_ids(&self) -> &[String] {
        match self {
            Self::Empty | Self::AllSucceeded => &[],
            Self::PartialFailure { failed } | Self::AllFailed { failed } => failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::SizeKind;

    fn remote() -> RemoteObject {
        RemoteObject {
            key: "users/u1/a.pdf".into(),
            url: "https://bucket/users/u1/a.pdf".into(),
        }
    }

    #[test]
    fn progress_events_for_a_file() {
        let file = FileDescriptor::media("1", "a.png", "/a.png", 1, SizeKind::Exact);

        let started = UploadProgress::started(&file);
        assert_eq!(started.status, UploadStatus::Uploading);
        assert_eq!(started.progress_percent, 0);
        assert!(!started.status.is_terminal());

        let done = UploadProgress::completed(&file, &remote());
        assert_eq!(done.progress_percent, 100);
        assert_eq!(done.remote_key.as_deref(), Some("users/u1/a.pdf"));
        assert!(done.status.is_terminal());

        let failed = UploadProgress::failed(&file);
        assert_eq!(failed.progress_percent, 0);
        assert!(failed.remote_url.is_none());
    }

    #[test]
    fn progress_serializes_camel_case() {
        let file = FileDescriptor::media("1", "a.png", "/a.png", 1, SizeKind::Exact);
        let json = serde_json::to_value(UploadProgress::started(&file)).unwrap();
        assert_eq!(json["fileId"], "media-1");
        assert_eq!(json["status"], "uploading");
        assert!(json.get("remoteKey").is_none());
    }

    #[test]
    fn batch_outcome_classification() {
        assert_eq!(BatchOutcome::from_results(&[]), BatchOutcome::Empty);

        let ok = UploadResult::succeeded("a", remote());
        let bad = UploadResult::failed("b", "HTTP 500");
        assert_eq!(
            BatchOutcome::from_results(&[ok.clone()]),
            BatchOutcome::AllSucceeded
        );

        let partial = BatchOutcome::from_results(&[ok, bad.clone()]);
        assert_eq!(partial.failed_ids(), ["b".to_owned()]);
        assert!(matches!(partial, BatchOutcome::PartialFailure { .. }));

        let all = BatchOutcome::from_results(&[bad]);
        assert!(matches!(all, BatchOutcome::AllFailed { .. }));
    }
}
