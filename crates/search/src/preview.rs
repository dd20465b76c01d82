use prismbreak_core::FileCategory;
use serde::Serialize;

/// Content shown on a file's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePreview {
    pub file_id: String,
    pub category: FileCategory,
    pub content: String,
    /// `true` when `content` is a placeholder rather than extracted text.
    pub is_placeholder: bool,
}

/// Prefix that marks placeholder preview text.
pub const PLACEHOLDER_LABEL: &str = "[Preview unavailable]";

/// Resolves preview content for a search hit.
///
/// The backend exposes no content endpoint, so every preview is a labelled
/// placeholder describing what would be shown for the file type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewService;

impl PreviewService {
    pub fn new() -> Self {
        Self
    }

    pub fn preview(&self, file_id: &str, file_type: &str) -> FilePreview {
        let category = FileCategory::parse(file_type);
        let what = match category {
            FileCategory::Pdf => "Text extracted from this PDF",
            FileCategory::Txt => "The contents of this text file",
            FileCategory::Docx | FileCategory::Doc => "The text of this Word document",
            FileCategory::Xlsx | FileCategory::Xls => "The data in this spreadsheet",
            FileCategory::Csv => "The rows of this CSV file",
            FileCategory::Image => "A preview of this image",
            FileCategory::Unknown => "The contents of this file",
        };
        FilePreview {
            file_id: file_id.to_owned(),
            category,
            content: format!(
                "{PLACEHOLDER_LABEL} {what} will appear here once the backend provides it."
            ),
            is_placeholder: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preview_is_labelled() {
        let service = PreviewService::new();
        for file_type in ["pdf", "txt", "docx", "doc", "xlsx", "xls", "csv", "image", "zip", ""] {
            let preview = service.preview("f1", file_type);
            assert!(preview.is_placeholder);
            assert!(preview.content.starts_with(PLACEHOLDER_LABEL), "{file_type}");
        }
    }

    #[test]
    fn category_is_parsed_from_file_type() {
        let preview = PreviewService::new().preview("f1", "PDF");
        assert_eq!(preview.category, FileCategory::Pdf);
        assert!(preview.content.contains("PDF"));
        assert_eq!(
            PreviewService::new().preview("f2", "mp4").category,
            FileCategory::Unknown
        );
    }
}
