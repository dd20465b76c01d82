use std::sync::Arc;

use prismbreak_client::FileListing;
use prismbreak_core::{BatchOutcome, FileDescriptor, Identity, UploadProgress, UploadResult};
use tracing::{debug, info, warn};

use crate::progress::ProgressListener;
use crate::transport::UploadTransport;

/// Result of [`UploadOrchestrator::upload_with_listing`].
#[derive(Debug, Clone)]
pub struct BatchUpload {
    /// One result per input file, in input order.
    pub results: Vec<UploadResult>,
    pub outcome: BatchOutcome,
    /// The backend listing fetched after the batch, if that call succeeded.
    pub listing: Option<FileListing>,
}

/// Uploads a batch of files one at a time.
///
/// Exactly one transmission is in flight at any moment. A failing file is
/// recorded and reported, then the next file is attempted; nothing is retried.
#[derive(Clone)]
pub struct UploadOrchestrator {
    transport: Arc<dyn UploadTransport>,
    project_id: Option<String>,
}

impl std::fmt::Debug for UploadOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadOrchestrator")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl UploadOrchestrator {
    pub fn new(transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            transport,
            project_id: None,
        }
    }

    /// Attach every upload to a project.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Upload `files` in order and return one result per file, in the same
    /// order.
    ///
    /// For each file the listener sees `uploading` (0%) and then either
    /// `completed` (100%, with the remote key and URL) or `error` (0%).
    pub async fn upload(
        &self,
        files: &[FileDescriptor],
        identity: &Identity,
        listener: &dyn ProgressListener,
    ) -> Vec<UploadResult> {
        info!(count = files.len(), user_id = %identity.user_id, "starting upload batch");

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            listener.on_progress(&UploadProgress::started(file));

            let result = match self
                .transport
                .transmit(file, identity, self.project_id.as_deref())
                .await
            {
                Ok(remote) => {
                    debug!(file_id = file.id(), key = %remote.key, "file uploaded");
                    listener.on_progress(&UploadProgress::completed(file, &remote));
                    UploadResult::succeeded(file.id(), remote)
                }
                Err(e) => {
                    warn!(file_id = file.id(), error = %e, "file upload failed");
                    listener.on_progress(&UploadProgress::failed(file));
                    UploadResult::failed(file.id(), e.to_string())
                }
            };
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.success).count();
        info!(total = results.len(), failed, "upload batch finished");
        results
    }

    /// Upload the batch, then fetch the user's file listing.
    ///
    /// The listing is auxiliary: if it fails the error is logged and
    /// `listing` is `None`, the per-file results are unaffected.
    pub async fn upload_with_listing(
        &self,
        files: &[FileDescriptor],
        identity: &Identity,
        listener: &dyn ProgressListener,
    ) -> BatchUpload {
        let results = self.upload(files, identity, listener).await;
        let outcome = BatchOutcome::from_results(&results);

        let listing = match self.transport.list_files(identity).await {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(error = %e, "failed to fetch file listing");
                None
            }
        };

        BatchUpload {
            results,
            outcome,
            listing,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use prismbreak_core::UploadStatus;

    use super::*;
    use crate::mock::{FailingTransport, ScriptedTransport};
    use crate::progress::{NoopListener, ProgressTracker, progress_channel};

    fn files(n: usize) -> Vec<FileDescriptor> {
        (0..n)
            .map(|i| {
                FileDescriptor::picked(
                    1_700_000_000_000,
                    i,
                    format!("f{i}.pdf"),
                    format!("/tmp/f{i}.pdf"),
                    Some(10),
                    None,
                )
            })
            .collect()
    }

    fn identity() -> Identity {
        Identity::new("user_1", "sess_1")
    }

    #[tokio::test]
    async fn one_result_per_file_in_input_order() {
        let batch = files(5);
        let transport = Arc::new(ScriptedTransport::new().fail(batch[1].id()).fail(batch[3].id()));
        let orchestrator = UploadOrchestrator::new(transport.clone());

        let results = orchestrator.upload(&batch, &identity(), &NoopListener).await;

        let ids: Vec<&str> = results.iter().map(|r| r.file_id.as_str()).collect();
        let expected: Vec<&str> = batch.iter().map(FileDescriptor::id).collect();
        assert_eq!(ids, expected);
        assert_eq!(
            results.iter().map(|r| r.success).collect::<Vec<_>>(),
            [true, false, true, false, true]
        );
        assert_eq!(transport.attempted(), expected);
    }

    #[tokio::test]
    async fn middle_failure_is_isolated() {
        let batch = files(3);
        let transport = Arc::new(ScriptedTransport::new().fail(batch[1].id()));
        let orchestrator = UploadOrchestrator::new(transport);

        let events = Mutex::new(Vec::new());
        let listener = |e: &UploadProgress| {
            events
                .lock()
                .unwrap()
                .push((e.file_id.clone(), e.status, e.progress_percent));
        };
        let results = orchestrator.upload(&batch, &identity(), &listener).await;

        assert!(results[0].success);
        assert!(results[0].remote_key.is_some());
        assert!(!results[1].success);
        assert!(results[1].error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(results[2].success);

        let id = |i: usize| batch[i].id().to_owned();
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                (id(0), UploadStatus::Uploading, 0),
                (id(0), UploadStatus::Completed, 100),
                (id(1), UploadStatus::Uploading, 0),
                (id(1), UploadStatus::Error, 0),
                (id(2), UploadStatus::Uploading, 0),
                (id(2), UploadStatus::Completed, 100),
            ]
        );
    }

    #[tokio::test]
    async fn tracker_reports_failed_subset() {
        let batch = files(3);
        let orchestrator =
            UploadOrchestrator::new(Arc::new(ScriptedTransport::new().fail(batch[1].id())));
        let tracker = ProgressTracker::new();

        let results = orchestrator.upload(&batch, &identity(), &tracker).await;

        assert!(tracker.is_settled());
        assert_eq!(tracker.failed_ids(), vec![batch[1].id().to_owned()]);
        assert_eq!(
            BatchOutcome::from_results(&results),
            BatchOutcome::PartialFailure {
                failed: vec![batch[1].id().to_owned()]
            }
        );
    }

    #[tokio::test]
    async fn unreachable_backend_fails_every_file() {
        let batch = files(3);
        let orchestrator = UploadOrchestrator::new(Arc::new(FailingTransport));

        let upload = orchestrator
            .upload_with_listing(&batch, &identity(), &NoopListener)
            .await;
        assert_eq!(upload.results.len(), 3);
        assert_eq!(upload.outcome.failed_ids().len(), 3);
        assert!(matches!(upload.outcome, BatchOutcome::AllFailed { .. }));
        assert!(upload.listing.is_none());
    }

    #[tokio::test]
    async fn empty_batch_makes_no_calls() {
        let transport = Arc::new(ScriptedTransport::new());
        let orchestrator = UploadOrchestrator::new(transport.clone());
        let results = orchestrator.upload(&[], &identity(), &NoopListener).await;
        assert!(results.is_empty());
        assert!(transport.attempted().is_empty());
    }

    #[tokio::test]
    async fn project_id_is_forwarded() {
        let transport = Arc::new(ScriptedTransport::new());
        let orchestrator = UploadOrchestrator::new(transport.clone()).with_project_id("proj-1");
        orchestrator.upload(&files(1), &identity(), &NoopListener).await;
        assert_eq!(transport.project_ids(), vec![Some("proj-1".to_owned())]);
    }

    #[tokio::test]
    async fn streamed_progress_matches_callback_order() {
        let batch = files(2);
        let orchestrator =
            UploadOrchestrator::new(Arc::new(ScriptedTransport::new().fail(batch[0].id())));
        let (listener, mut rx) = progress_channel();

        let task = {
            let batch = batch.clone();
            tokio::spawn(async move { orchestrator.upload(&batch, &identity(), &listener).await })
        };

        let mut statuses = Vec::new();
        while let Some(event) = rx.recv().await {
            statuses.push(event.status);
        }
        let results = task.await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(
            statuses,
            [
                UploadStatus::Uploading,
                UploadStatus::Error,
                UploadStatus::Uploading,
                UploadStatus::Completed
            ]
        );
    }

    #[tokio::test]
    async fn listing_failure_does_not_fail_batch() {
        let batch = files(2);
        let transport = Arc::new(ScriptedTransport::new().fail_listing());
        let orchestrator = UploadOrchestrator::new(transport);

        let upload = orchestrator
            .upload_with_listing(&batch, &identity(), &NoopListener)
            .await;
        assert_eq!(upload.outcome, BatchOutcome::AllSucceeded);
        assert!(upload.listing.is_none());
        assert_eq!(upload.results.len(), 2);
    }

    #[tokio::test]
    async fn listing_is_returned_after_batch() {
        let transport = Arc::new(ScriptedTransport::new());
        let orchestrator = UploadOrchestrator::new(transport.clone());

        let upload = orchestrator
            .upload_with_listing(&files(1), &identity(), &NoopListener)
            .await;
        assert_eq!(upload.listing.and_then(|l| l.entry_count()), Some(1));
        assert_eq!(transport.listing_calls(), 1);
    }
}
