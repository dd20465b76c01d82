use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown when the backend did not name the source file.
pub const UNKNOWN_FILE_NAME: &str = "Unknown file";

/// Placeholder file type when the backend did not provide one.
pub const UNKNOWN_FILE_TYPE: &str = "unknown";

/// One normalized hit from the search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    /// Expected in `[0, 1]`. Passed through as received.
    pub relevance_score: f64,
    pub snippet: String,
    /// May contain `**emphasis**` markup.
    pub highlighted_text: String,
    pub metadata: ResultMetadata,
}

impl SearchResult {
    /// `highlighted_text` with `**emphasis**` markers removed.
    pub fn plain_highlight(&self) -> String {
        strip_emphasis(&self.highlighted_text)
    }

    /// Relevance as a rounded percentage for display.
    #[allow(clippy::cast_possible_truncation)]
    pub fn score_percent(&self) -> i64 {
        (self.relevance_score * 100.0).round() as i64
    }
}

/// File metadata attached to a search hit.
///
/// When `is_estimated` is `true`, `file_size` and `upload_date` are
/// placeholders (0 and the time the response was received) and must be
/// presented as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub file_size: u64,
    pub upload_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    pub is_estimated: bool,
}

impl ResultMetadata {
    /// Placeholder metadata for a hit that carried none.
    pub fn placeholder(received_at: DateTime<Utc>) -> Self {
        Self {
            file_size: 0,
            upload_date: received_at,
            page_count: None,
            is_estimated: true,
        }
    }
}

/// Remove `**emphasis**` markers, keeping the emphasized text.
///
/// An unmatched `**` is left in place.
///
/// # Example
///
/// ```
/// use prismbreak_core::strip_emphasis;
///
/// assert_eq!(strip_emphasis("the **waterfall** model"), "the waterfall model");
/// ```
pub fn strip_emphasis(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&after[..end]);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Human-readable size: bytes, KB or MB with one decimal.
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
