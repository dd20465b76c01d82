use std::path::PathBuf;

use async_trait::async_trait;
use prismbreak_core::{mime_allowed, mime_from_name};
use tracing::warn;

use crate::error::DiscoveryError;

/// A document chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedDocument {
    pub name: String,
    pub locator: String,
    pub size_bytes: Option<u64>,
    pub mime_type: Option<String>,
}

/// Result of presenting the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The user dismissed the picker.
    Cancelled,
    Picked(Vec<PickedDocument>),
}

/// A multi-select document picker restricted to a MIME allow-list.
#[async_trait]
pub trait DocumentPicker: Send + Sync {
    /// Present the picker. Only documents whose MIME type is covered by
    /// `allowed` may be returned.
    async fn pick(&self, allowed: &[&str]) -> Result<PickOutcome, DiscoveryError>;
}

/// A picker whose "selection" is a fixed list of paths, e.g. command-line
/// arguments. An empty list behaves like a cancelled pick.
///
/// Paths whose MIME type is outside the allow-list are skipped, as a native
/// picker would never offer them.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    paths: Vec<PathBuf>,
}

impl PathPicker {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl DocumentPicker for PathPicker {
    async fn pick(&self, allowed: &[&str]) -> Result<PickOutcome, DiscoveryError> {
        if self.paths.is_empty() {
            return Ok(PickOutcome::Cancelled);
        }

        let mut picked = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let metadata = tokio::fs::metadata(path)
                .await
                .map_err(|e| DiscoveryError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            if !metadata.is_file() {
                warn!(path = %path.display(), "skipping non-file selection");
                continue;
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mime = mime_guess::from_path(path)
                .first_raw()
                .unwrap_or_else(|| mime_from_name(&name));
            if !mime_allowed(mime, allowed) {
                warn!(path = %path.display(), mime, "skipping unsupported file type");
                continue;
            }

            picked.push(PickedDocument {
                name,
                locator: path.display().to_string(),
                size_bytes: Some(metadata.len()),
                mime_type: Some(mime.to_owned()),
            });
        }
        Ok(PickOutcome::Picked(picked))
    }
}

#[cfg(test)]
mod tests {
    use prismbreak_core::SUPPORTED_MIME_TYPES;

    use super::*;

    #[tokio::test]
    async fn empty_selection_is_cancelled() {
        let picker = PathPicker::default();
        let outcome = picker.pick(SUPPORTED_MIME_TYPES).await.unwrap();
        assert_eq!(outcome, PickOutcome::Cancelled);
    }

    #[tokio::test]
    async fn picks_supported_files_and_skips_others() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("report.pdf");
        let csv = dir.path().join("data.csv");
        let zip = dir.path().join("bundle.zip");
        std::fs::write(&pdf, b"%PDF-1.7").unwrap();
        std::fs::write(&csv, b"a,b\n1,2\n").unwrap();
        std::fs::write(&zip, b"PK").unwrap();

        let picker = PathPicker::new([&pdf, &csv, &zip]);
        let PickOutcome::Picked(docs) = picker.pick(SUPPORTED_MIME_TYPES).await.unwrap() else {
            panic!("expected a pick");
        };

        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["report.pdf", "data.csv"]);
        assert_eq!(docs[0].mime_type.as_deref(), Some("application/pdf"));
        assert_eq!(docs[0].size_bytes, Some(8));
        assert_eq!(docs[1].mime_type.as_deref(), Some("text/csv"));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let picker = PathPicker::new([dir.path().join("gone.pdf")]);
        let err = picker.pick(SUPPORTED_MIME_TYPES).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Io { .. }));
    }
}
