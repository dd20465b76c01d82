use std::sync::Arc;

use chrono::Utc;
use prismbreak_core::{FileDescriptor, SUPPORTED_MIME_TYPES, SizeKind};
use tracing::{debug, info, warn};

use crate::error::DiscoveryError;
use crate::media::{MediaAsset, MediaLibrary, MediaPermission};
use crate::picker::{DocumentPicker, PickOutcome};

/// Maximum number of media assets returned by a scan.
pub const DEFAULT_MEDIA_LIMIT: usize = 1000;

/// Produces [`FileDescriptor`]s from the media library and the document picker.
#[derive(Clone)]
pub struct FileDiscovery {
    library: Arc<dyn MediaLibrary>,
    picker: Arc<dyn DocumentPicker>,
    media_limit: usize,
}

impl std::fmt::Debug for FileDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDiscovery")
            .field("media_limit", &self.media_limit)
            .finish_non_exhaustive()
    }
}

impl FileDiscovery {
    pub fn new(library: Arc<dyn MediaLibrary>, picker: Arc<dyn DocumentPicker>) -> Self {
        Self {
            library,
            picker,
            media_limit: DEFAULT_MEDIA_LIMIT,
        }
    }

    /// Override the media scan cap.
    #[must_use]
    pub fn with_media_limit(mut self, limit: usize) -> Self {
        self.media_limit = limit;
        self
    }

    pub fn media_limit(&self) -> usize {
        self.media_limit
    }

    /// Scan the media library for photos, newest first.
    ///
    /// Never fails: a denied permission or a library error yields an empty
    /// list. At most `media_limit` descriptors are returned.
    pub async fn discover_media_files(&self) -> Vec<FileDescriptor> {
        if self.library.request_permission().await == MediaPermission::Denied {
            info!("media library permission denied");
            return Vec::new();
        }

        let mut assets = match self.library.photo_assets(self.media_limit).await {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "media library scan failed");
                return Vec::new();
            }
        };

        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        assets.truncate(self.media_limit);

        let files: Vec<FileDescriptor> = assets.into_iter().map(media_descriptor).collect();
        debug!(count = files.len(), "discovered media files");
        files
    }

    /// Present the document picker and describe the chosen documents.
    ///
    /// A cancelled pick yields an empty list. Picker failures are returned
    /// as errors.
    pub async fn pick_documents(&self) -> Result<Vec<FileDescriptor>, DiscoveryError> {
        let picked = match self.picker.pick(SUPPORTED_MIME_TYPES).await? {
            PickOutcome::Cancelled => {
                debug!("document pick cancelled");
                return Ok(Vec::new());
            }
            PickOutcome::Picked(docs) => docs,
        };

        let timestamp_ms = Utc::now().timestamp_millis();
        let files: Vec<FileDescriptor> = picked
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                FileDescriptor::picked(
                    timestamp_ms,
                    index,
                    doc.name,
                    doc.locator,
                    doc.size_bytes,
                    doc.mime_type,
                )
            })
            .collect();
        debug!(count = files.len(), "picked documents");
        Ok(files)
    }
}

fn media_descriptor(asset: MediaAsset) -> FileDescriptor {
    let (size, kind) = match (asset.byte_size, asset.width, asset.height) {
        (Some(bytes), _, _) => (bytes, SizeKind::Exact),
        (None, Some(w), Some(h)) => (u64::from(w) * u64::from(h), SizeKind::PixelEstimate),
        _ => (0, SizeKind::Unavailable),
    };
    FileDescriptor::media(&asset.id, asset.filename, asset.locator, size, kind)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use prismbreak_core::FileCategory;

    use super::*;
    use crate::mock::{FailingPicker, ScriptedPicker, StaticMediaLibrary};
    use crate::picker::PickedDocument;

    fn asset(id: &str, minutes: i64) -> MediaAsset {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        MediaAsset {
            id: id.to_owned(),
            filename: format!("IMG_{id}.jpg"),
            locator: format!("ph://{id}"),
            created_at: base + Duration::minutes(minutes),
            byte_size: None,
            width: Some(4),
            height: Some(3),
        }
    }

    fn discovery(library: StaticMediaLibrary, picker: ScriptedPicker) -> FileDiscovery {
        FileDiscovery::new(Arc::new(library), Arc::new(picker))
    }

    #[tokio::test]
    async fn media_is_newest_first_and_namespaced() {
        let library = StaticMediaLibrary::granted(vec![asset("a", 1), asset("b", 3), asset("c", 2)]);
        let files = discovery(library, ScriptedPicker::cancelled())
            .discover_media_files()
            .await;

        let ids: Vec<&str> = files.iter().map(FileDescriptor::id).collect();
        assert_eq!(ids, ["media-b", "media-c", "media-a"]);
        assert!(files.iter().all(|f| f.category() == FileCategory::Image));
        assert_eq!(files[0].size_bytes(), 12);
        assert_eq!(files[0].size_kind(), SizeKind::PixelEstimate);
    }

    #[tokio::test]
    async fn media_scan_is_capped() {
        let assets = (0..25).map(|i| asset(&i.to_string(), i)).collect();
        let files = discovery(StaticMediaLibrary::granted(assets), ScriptedPicker::cancelled())
            .with_media_limit(10)
            .discover_media_files()
            .await;
        assert_eq!(files.len(), 10);
        assert_eq!(files[0].id(), "media-24");
    }

    #[tokio::test]
    async fn denied_permission_yields_nothing() {
        let library = StaticMediaLibrary::denied();
        let files = discovery(library.clone(), ScriptedPicker::cancelled())
            .discover_media_files()
            .await;
        assert!(files.is_empty());
        assert_eq!(library.scan_count(), 0);
    }

    #[tokio::test]
    async fn library_failure_yields_nothing() {
        let library = StaticMediaLibrary::failing("photos unavailable");
        let files = discovery(library, ScriptedPicker::cancelled())
            .discover_media_files()
            .await;
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn exact_size_wins_over_dimensions() {
        let mut a = asset("x", 0);
        a.byte_size = Some(2048);
        a.filename = "shot.PNG".into();
        let files = discovery(StaticMediaLibrary::granted(vec![a]), ScriptedPicker::cancelled())
            .discover_media_files()
            .await;
        assert_eq!(files[0].size_bytes(), 2048);
        assert_eq!(files[0].size_kind(), SizeKind::Exact);
        assert_eq!(files[0].mime_type(), Some("image/png"));
    }

    #[tokio::test]
    async fn cancelled_pick_is_empty() {
        let files = discovery(StaticMediaLibrary::denied(), ScriptedPicker::cancelled())
            .pick_documents()
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn picked_documents_share_a_timestamp() {
        let picker = ScriptedPicker::picked(vec![
            PickedDocument {
                name: "report.pdf".into(),
                locator: "/tmp/report.pdf".into(),
                size_bytes: Some(10),
                mime_type: Some("application/pdf".into()),
            },
            PickedDocument {
                name: "notes.txt".into(),
                locator: "/tmp/notes.txt".into(),
                size_bytes: None,
                mime_type: None,
            },
        ]);
        let files = discovery(StaticMediaLibrary::denied(), picker)
            .pick_documents()
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].id().starts_with("picked-") && files[0].id().ends_with("-0"));
        assert!(files[1].id().ends_with("-1"));
        let stamp = |id: &str| id.rsplit_once('-').map(|(head, _)| head.to_owned());
        assert_eq!(stamp(files[0].id()), stamp(files[1].id()));
        assert_eq!(files[0].category(), FileCategory::Pdf);
        assert_eq!(files[1].category(), FileCategory::Txt);
        assert_eq!(files[1].size_kind(), SizeKind::Unavailable);
        assert_eq!(files[1].mime_type(), Some("text/plain"));
    }

    #[tokio::test]
    async fn picker_failure_is_surfaced() {
        let discovery = FileDiscovery::new(
            Arc::new(StaticMediaLibrary::denied()),
            Arc::new(FailingPicker::new("picker crashed")),
        );
        let err = discovery.pick_documents().await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Picker(_)));
        assert!(err.to_string().contains("picker crashed"));
    }
}
