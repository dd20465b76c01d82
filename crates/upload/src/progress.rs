use std::sync::{Mutex, MutexGuard, PoisonError};

use prismbreak_core::{UploadProgress, UploadStatus};
use tokio::sync::mpsc;
use tracing::warn;

/// Observer of per-file progress events.
///
/// Events arrive in batch order: for each file `uploading` first, then exactly
/// one of `completed` or `error`, before any event for the next file.
pub trait ProgressListener: Send + Sync {
    fn on_progress(&self, event: &UploadProgress);
}

impl<F> ProgressListener for F
where
    F: Fn(&UploadProgress) + Send + Sync,
{
    fn on_progress(&self, event: &UploadProgress) {
        self(event);
    }
}

/// A listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl ProgressListener for NoopListener {
    fn on_progress(&self, _event: &UploadProgress) {}
}

/// Listener half of [`progress_channel`].
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<UploadProgress>,
}

impl ProgressListener for ChannelListener {
    fn on_progress(&self, event: &UploadProgress) {
        // A dropped receiver only means nobody is watching any more.
        let _ = self.tx.send(event.clone());
    }
}

/// Progress as a stream of events.
///
/// The receiver yields every event in delivery order and ends once all
/// listener clones have been dropped, i.e. when the batch that owned the
/// listener finishes. Create a fresh pair for each attempt.
pub fn progress_channel() -> (ChannelListener, mpsc::UnboundedReceiver<UploadProgress>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelListener { tx }, rx)
}

/// The progress map for a batch, keyed by file id and kept in first-seen order.
///
/// Entries are updated in place. Once an entry reaches a terminal status
/// further `uploading` events for it are ignored until it is
/// [forgotten](Self::forget).
#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: Mutex<Vec<UploadProgress>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UploadProgress>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one event. Returns `false` if it was rejected as a regression.
    pub fn apply(&self, event: &UploadProgress) -> bool {
        let mut entries = self.lock();
        match entries.iter_mut().find(|e| e.file_id == event.file_id) {
            Some(entry) => {
                if entry.status.is_terminal() && !event.status.is_terminal() {
                    warn!(
                        file_id = %event.file_id,
                        from = ?entry.status,
                        to = ?event.status,
                        "ignoring progress regression"
                    );
                    return false;
                }
                *entry = event.clone();
            }
            None => entries.push(event.clone()),
        }
        true
    }

    /// Current state of one file.
    pub fn get(&self, file_id: &str) -> Option<UploadProgress> {
        self.lock().iter().find(|e| e.file_id == file_id).cloned()
    }

    /// All entries in first-seen order.
    pub fn snapshot(&self) -> Vec<UploadProgress> {
        self.lock().clone()
    }

    /// Ids whose latest status is `error`, in first-seen order.
    pub fn failed_ids(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.status == UploadStatus::Error)
            .map(|e| e.file_id.clone())
            .collect()
    }

    /// Returns `true` when every tracked file reached a terminal status.
    pub fn is_settled(&self) -> bool {
        self.lock().iter().all(|e| e.status.is_terminal())
    }

    /// Drop the entries for `file_ids`, typically before retrying them.
    pub fn forget(&self, file_ids: &[String]) {
        self.lock().retain(|e| !file_ids.contains(&e.file_id));
    }
}

impl ProgressListener for ProgressTracker {
    fn on_progress(&self, event: &UploadProgress) {
        self.apply(event);
    }
}

#[cfg(test)]
mod tests {
    use prismbreak_core::{FileDescriptor, RemoteObject};

    use super::*;

    fn file(index: usize) -> FileDescriptor {
        FileDescriptor::picked(7, index, format!("doc{index}.pdf"), "/tmp/x", Some(1), None)
    }

    fn remote() -> RemoteObject {
        RemoteObject {
            key: "k".into(),
            url: "u".into(),
        }
    }

    #[test]
    fn updates_in_place_and_keeps_order() {
        let tracker = ProgressTracker::new();
        let (a, b) = (file(0), file(1));
        tracker.apply(&UploadProgress::started(&a));
        tracker.apply(&UploadProgress::started(&b));
        tracker.apply(&UploadProgress::completed(&a, &remote()));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].file_id, a.id());
        assert_eq!(snapshot[0].status, UploadStatus::Completed);
        assert_eq!(snapshot[0].progress_percent, 100);
        assert!(!tracker.is_settled());
    }

    #[test]
    fn terminal_status_never_reverts() {
        let tracker = ProgressTracker::new();
        let a = file(0);
        tracker.apply(&UploadProgress::started(&a));
        tracker.apply(&UploadProgress::failed(&a));

        assert!(!tracker.apply(&UploadProgress::started(&a)));
        assert_eq!(tracker.get(a.id()).unwrap().status, UploadStatus::Error);
        assert_eq!(tracker.failed_ids(), vec![a.id().to_owned()]);
    }

    #[test]
    fn forget_allows_a_new_attempt() {
        let tracker = ProgressTracker::new();
        let a = file(0);
        tracker.apply(&UploadProgress::failed(&a));
        tracker.forget(&tracker.failed_ids());

        assert!(tracker.get(a.id()).is_none());
        assert!(tracker.apply(&UploadProgress::started(&a)));
    }

    #[tokio::test]
    async fn channel_ends_when_listener_is_dropped() {
        let (listener, mut rx) = progress_channel();
        let a = file(0);
        listener.on_progress(&UploadProgress::started(&a));
        listener.on_progress(&UploadProgress::completed(&a, &remote()));
        drop(listener);

        let mut statuses = Vec::new();
        while let Some(event) = rx.recv().await {
            statuses.push(event.status);
        }
        assert_eq!(statuses, [UploadStatus::Uploading, UploadStatus::Completed]);
    }
}
