use std::fmt;

use serde::{Deserialize, Serialize};

/// MIME types the document picker accepts.
///
/// `image/*` matches any image subtype.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/csv",
    "image/*",
];

/// Fallback MIME type for names with no recognised extension.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Coarse file category used for display and sent to the backend as `fileType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Pdf,
    Txt,
    Docx,
    Doc,
    Xlsx,
    Xls,
    Csv,
    Image,
    Unknown,
}

impl FileCategory {
    /// Derive a category from a file name's extension (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use prismbreak_core::FileCategory;
    ///
    /// assert_eq!(FileCategory::from_name("Report.PDF"), FileCategory::Pdf);
    /// assert_eq!(FileCategory::from_name("photo.jpeg"), FileCategory::Image);
    /// assert_eq!(FileCategory::from_name("archive.zip"), FileCategory::Unknown);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match extension(name).as_deref() {
            Some("pdf") => Self::Pdf,
            Some("txt") => Self::Txt,
            Some("docx") => Self::Docx,
            Some("doc") => Self::Doc,
            Some("xlsx") => Self::Xlsx,
            Some("xls") => Self::Xls,
            Some("csv") => Self::Csv,
            Some("png" | "jpg" | "jpeg") => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// The wire representation (`"pdf"`, `"image"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Csv => "csv",
            Self::Image => "image",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the wire representation. Unrecognised values map to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "txt" => Self::Txt,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "xlsx" => Self::Xlsx,
            "xls" => Self::Xls,
            "csv" => Self::Csv,
            "image" => Self::Image,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer a MIME type from a file name. Falls back to [`DEFAULT_MIME_TYPE`].
pub fn mime_from_name(name: &str) -> &'static str {
    match extension(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        Some("csv") => "text/csv",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Returns `true` if `mime` is covered by the `allowed` list.
///
/// Entries ending in `/*` match every subtype of that top-level type.
pub fn mime_allowed(mime: &str, allowed: &[&str]) -> bool {
    let mime = mime.trim().to_ascii_lowercase();
    allowed.iter().any(|pattern| match pattern.strip_suffix("/*") {
        Some(top) => mime
            .split_once('/')
            .is_some_and(|(candidate, _)| candidate == top),
        None => mime == *pattern,
    })
}

fn extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// How `size_bytes` on a [`FileDescriptor`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeKind {
    /// Real byte length reported by the source.
    Exact,
    /// Pixel count (`width * height`) standing in for a byte size. Not
    /// authoritative.
    PixelEstimate,
    /// The source reported nothing; the size is `0`.
    Unavailable,
}

/// One candidate local file for ingestion.
///
/// `id` and `category` are fixed at construction; there are no setters for
/// them. The `locator` is a session-scoped handle to the bytes (a filesystem
/// path for the bundled sources) and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    id: String,
    name: String,
    locator: String,
    category: FileCategory,
    size_bytes: u64,
    size_kind: SizeKind,
    mime_type: Option<String>,
}

impl FileDescriptor {
    /// Build a descriptor for a media-library asset.
    ///
    /// The id is namespaced as `media-{asset_id}` and the category is always
    /// [`FileCategory::Image`].
    pub fn media(
        asset_id: &str,
        name: impl Into<String>,
        locator: impl Into<String>,
        size_bytes: u64,
        size_kind: SizeKind,
    ) -> Self {
        let name = name.into();
        let mime = if name.to_ascii_lowercase().ends_with(".png") {
            "image/png"
        } else {
            "image/jpeg"
        };
        Self {
            id: format!("media-{asset_id}"),
            name,
            locator: locator.into(),
            category: FileCategory::Image,
            size_bytes,
            size_kind,
            mime_type: Some(mime.to_owned()),
        }
    }

    /// Build a descriptor for a user-picked document.
    ///
    /// The id is namespaced as `picked-{timestamp_ms}-{index}` so that picks
    /// made in the same batch never collide. The category is derived from the
    /// name; a missing MIME type is inferred from the name as well.
    pub fn picked(
        timestamp_ms: i64,
        index: usize,
        name: impl Into<String>,
        locator: impl Into<String>,
        size_bytes: Option<u64>,
        mime_type: Option<String>,
    ) -> Self {
        let name = name.into();
        let category = FileCategory::from_name(&name);
        let mime_type = mime_type
            .filter(|m| !m.trim().is_empty())
            .or_else(|| Some(mime_from_name(&name).to_owned()));
        let (size_bytes, size_kind) = match size_bytes {
            Some(size) => (size, SizeKind::Exact),
            None => (0, SizeKind::Unavailable),
        };
        Self {
            id: format!("picked-{timestamp_ms}-{index}"),
            name,
            locator: locator.into(),
            category,
            size_bytes,
            size_kind,
            mime_type,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn category(&self) -> FileCategory {
        self.category
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn size_kind(&self) -> SizeKind {
        self.size_kind
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// MIME type to send on the wire, falling back to an inferred one.
    pub fn effective_mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or_else(|| mime_from_name(&self.name))
    }

    /// Returns `true` if this file came from the media library.
    pub fn is_media(&self) -> bool {
        self.id.starts_with("media-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_extension() {
        assert_eq!(FileCategory::from_name("a.pdf"), FileCategory::Pdf);
        assert_eq!(FileCategory::from_name("notes.TXT"), FileCategory::Txt);
        assert_eq!(FileCategory::from_name("minutes.docx"), FileCategory::Docx);
        assert_eq!(FileCategory::from_name("old.doc"), FileCategory::Doc);
        assert_eq!(FileCategory::from_name("sheet.xlsx"), FileCategory::Xlsx);
        assert_eq!(FileCategory::from_name("sheet.xls"), FileCategory::Xls);
        assert_eq!(FileCategory::from_name("data.csv"), FileCategory::Csv);
        assert_eq!(FileCategory::from_name("pic.png"), FileCategory::Image);
        assert_eq!(FileCategory::from_name("pic.JPG"), FileCategory::Image);
    }

    #[test]
    fn category_unknown_for_missing_or_odd_extension() {
        assert_eq!(FileCategory::from_name("README"), FileCategory::Unknown);
        assert_eq!(FileCategory::from_name("trailing."), FileCategory::Unknown);
        assert_eq!(FileCategory::from_name("movie.mp4"), FileCategory::Unknown);
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&FileCategory::Xlsx).unwrap();
        assert_eq!(json, "\"xlsx\"");
        assert_eq!(FileCategory::parse("IMAGE"), FileCategory::Image);
        assert_eq!(FileCategory::parse("zip"), FileCategory::Unknown);
    }

    #[test]
    fn mime_inference() {
        assert_eq!(mime_from_name("x.pdf"), "application/pdf");
        assert_eq!(mime_from_name("x.jpeg"), "image/jpeg");
        assert_eq!(mime_from_name("x.bin"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn mime_allow_list_matching() {
        assert!(mime_allowed("application/pdf", SUPPORTED_MIME_TYPES));
        assert!(mime_allowed("image/heic", SUPPORTED_MIME_TYPES));
        assert!(mime_allowed("TEXT/CSV", SUPPORTED_MIME_TYPES));
        assert!(!mime_allowed("video/mp4", SUPPORTED_MIME_TYPES));
        assert!(!mime_allowed("application/zip", SUPPORTED_MIME_TYPES));
    }

    #[test]
    fn media_descriptor_is_always_image() {
        let file = FileDescriptor::media("42", "scan.pdf", "/tmp/scan.pdf", 10, SizeKind::Exact);
        assert_eq!(file.id(), "media-42");
        assert_eq!(file.category(), FileCategory::Image);
        assert_eq!(file.mime_type(), Some("image/jpeg"));
        assert!(file.is_media());

        let png = FileDescriptor::media("7", "shot.PNG", "/tmp/shot.PNG", 10, SizeKind::Exact);
        assert_eq!(png.mime_type(), Some("image/png"));
    }

    #[test]
    fn picked_descriptor_ids_are_namespaced() {
        let a = FileDescriptor::picked(1_700_000_000_000, 0, "a.pdf", "/a.pdf", Some(3), None);
        let b = FileDescriptor::picked(1_700_000_000_000, 1, "a.pdf", "/a.pdf", Some(3), None);
        assert_eq!(a.id(), "picked-1700000000000-0");
        assert_ne!(a.id(), b.id());
        assert!(!a.is_media());
        assert_eq!(a.mime_type(), Some("application/pdf"));
        assert_eq!(a.size_kind(), SizeKind::Exact);
    }

    #[test]
    fn picked_descriptor_without_size() {
        let file = FileDescriptor::picked(1, 0, "notes", "/notes", None, Some(String::new()));
        assert_eq!(file.size_bytes(), 0);
        assert_eq!(file.size_kind(), SizeKind::Unavailable);
        assert_eq!(file.category(), FileCategory::Unknown);
        assert_eq!(file.effective_mime_type(), DEFAULT_MIME_TYPE);
    }
}
