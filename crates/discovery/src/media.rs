use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::DiscoveryError;

/// Outcome of asking for media library access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaPermission {
    Granted,
    Denied,
}

/// A photo asset as reported by a media library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    /// Library-assigned identifier, unique within the library.
    pub id: String,
    pub filename: String,
    /// Handle used to read the bytes later.
    pub locator: String,
    pub created_at: DateTime<Utc>,
    /// Byte size, when the library exposes it.
    pub byte_size: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Access to the device's photo library.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Ask for access. May prompt the user on platforms that do.
    async fn request_permission(&self) -> MediaPermission;

    /// Enumerate photo assets. Implementations may return them in any order
    /// and may return more than `limit`; the caller sorts and truncates.
    async fn photo_assets(&self, limit: usize) -> Result<Vec<MediaAsset>, DiscoveryError>;
}

/// Extensions treated as photos by [`DirectoryMediaLibrary`].
const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "heic", "heif", "gif", "webp"];

/// A media library backed by a directory tree (e.g. a synced camera roll).
///
/// Permission is granted when the root is a readable directory.
#[derive(Debug, Clone)]
pub struct DirectoryMediaLibrary {
    root: PathBuf,
}

impl DirectoryMediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl MediaLibrary for DirectoryMediaLibrary {
    async fn request_permission(&self) -> MediaPermission {
        match tokio::fs::read_dir(&self.root).await {
            Ok(_) => MediaPermission::Granted,
            Err(e) => {
                debug!(root = %self.root.display(), error = %e, "media root not readable");
                MediaPermission::Denied
            }
        }
    }

    async fn photo_assets(&self, _limit: usize) -> Result<Vec<MediaAsset>, DiscoveryError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan_photos(&root))
            .await
            .map_err(|e| DiscoveryError::Library(format!("scan task failed: {e}")))?
    }
}

/// Unreadable entries below the root are skipped; only an unreadable root
/// fails the scan.
fn scan_photos(root: &Path) -> Result<Vec<MediaAsset>, DiscoveryError> {
    let mut assets = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(DiscoveryError::Library(e.to_string())),
            Err(e) => {
                warn!(error = %e, "skipping unreadable media entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_photo(entry.path()) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping unreadable photo");
                continue;
            }
        };
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(std::time::UNIX_EPOCH);
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        assets.push(MediaAsset {
            id: relative,
            filename: entry.file_name().to_string_lossy().into_owned(),
            locator: entry.path().display().to_string(),
            created_at: DateTime::<Utc>::from(created),
            byte_size: Some(metadata.len()),
            width: None,
            height: None,
        });
    }
    debug!(root = %root.display(), count = assets.len(), "scanned media directory");
    Ok(assets)
}

fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            PHOTO_EXTENSIONS.contains(&ext.as_str())
        })
}
