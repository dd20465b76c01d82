//! Conversion of raw backend episodes into [`SearchResult`]s.
//!
//! Every recognised response shape is flattened first and then goes through
//! the same per-item conversion.

use chrono::{DateTime, NaiveDateTime, Utc};
use prismbreak_client::{RawEpisode, UserQueryResponse};
use prismbreak_core::{
    FileCategory, ResultMetadata, SearchResult, UNKNOWN_FILE_NAME, UNKNOWN_FILE_TYPE,
};

/// Marker the backend uses for "no matching episode".
const NO_MATCH: &str = "N/A";

/// Value the backend puts in identifier fields it could not fill.
const BACKEND_UNKNOWN: &str = "unknown";

/// Normalize a whole response. `received_at` stands in for missing upload
/// dates.
pub fn normalize_response(
    response: UserQueryResponse,
    received_at: DateTime<Utc>,
) -> Vec<SearchResult> {
    normalize_episodes(response.into_episodes(), received_at)
}

/// Normalize episodes in backend order.
///
/// A response made of the single "no match" episode yields no results.
pub fn normalize_episodes(
    episodes: Vec<RawEpisode>,
    received_at: DateTime<Utc>,
) -> Vec<SearchResult> {
    if matches!(episodes.as_slice(), [only] if is_no_match(only)) {
        return Vec::new();
    }
    episodes
        .into_iter()
        .enumerate()
        .map(|(index, raw)| to_result(index, raw, received_at))
        .collect()
}

/// Returns `true` for the backend's "nothing found" episode: `source_file`
/// and `episode_id` both `"N/A"` and a zero or missing score.
pub fn is_no_match(raw: &RawEpisode) -> bool {
    raw.source_file.as_deref() == Some(NO_MATCH)
        && raw.episode_id.as_deref() == Some(NO_MATCH)
        && raw.score.is_none_or(|score| score.abs() < f64::EPSILON)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Like [`non_empty`], also dropping the backend's `"unknown"` filler.
fn known(value: Option<String>) -> Option<String> {
    non_empty(value).filter(|v| !v.trim().eq_ignore_ascii_case(BACKEND_UNKNOWN))
}

fn to_result(index: usize, raw: RawEpisode, received_at: DateTime<Utc>) -> SearchResult {
    let source_file = known(raw.source_file);

    let id = known(raw.id)
        .or_else(|| known(raw.episode_id))
        .or_else(|| source_file.clone())
        .unwrap_or_else(|| format!("result-{index}"));

    let file_type = non_empty(raw.file_type).unwrap_or_else(|| {
        source_file
            .as_deref()
            .map(FileCategory::from_name)
            .filter(|c| *c != FileCategory::Unknown)
            .map_or(UNKNOWN_FILE_TYPE, FileCategory::as_str)
            .to_owned()
    });

    let summary = raw.summary.unwrap_or_default();
    let highlighted_text = non_empty(raw.highlighted_text).unwrap_or_else(|| summary.clone());

    let upload_date = raw.upload_date.as_deref().and_then(parse_timestamp);
    let metadata = ResultMetadata {
        file_size: raw.file_size.unwrap_or(0),
        upload_date: upload_date.unwrap_or(received_at),
        page_count: raw.page_count,
        is_estimated: raw.file_size.is_none() || upload_date.is_none(),
    };

    SearchResult {
        id,
        file_name: source_file.unwrap_or_else(|| UNKNOWN_FILE_NAME.to_owned()),
        file_type,
        relevance_score: raw.score.unwrap_or(0.0),
        snippet: summary,
        highlighted_text,
        metadata,
    }
}

/// RFC 3339, or a naive ISO timestamp taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn received() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    fn parse(json: &str) -> Vec<SearchResult> {
        normalize_response(serde_json::from_str(json).unwrap(), received())
    }

    #[test]
    fn all_shapes_share_the_item_conversion() {
        let item = r#"{"source_file":"waterfall.pdf","file_type":"pdf","score":0.82,"summary":"phases"}"#;
        let single = parse(&format!(r#"{{"episodes":{item}}}"#));
        let array = parse(&format!(r#"{{"episodes":[{item},{item}]}}"#));

        assert_eq!(single.len(), 1);
        assert_eq!(array.len(), 2);
        assert_eq!(single[0], array[0]);
        assert!(parse("{}").is_empty());
        assert!(parse(r#"{"episodes":[]}"#).is_empty());
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let results = parse(r#"{"episodes":[{}]}"#);
        let r = &results[0];
        assert_eq!(r.id, "result-0");
        assert_eq!(r.file_name, UNKNOWN_FILE_NAME);
        assert_eq!(r.file_type, UNKNOWN_FILE_TYPE);
        assert!(r.relevance_score.abs() < f64::EPSILON);
        assert_eq!(r.snippet, "");
        assert_eq!(r.metadata.file_size, 0);
        assert_eq!(r.metadata.upload_date, received());
        assert_eq!(r.metadata.page_count, None);
        assert!(r.metadata.is_estimated);
    }

    #[test]
    fn id_precedence() {
        let results = parse(
            r#"{"episodes":[
                {"id":"x","episode_id":"e","source_file":"s.txt"},
                {"id":"","episode_id":"e","source_file":"s.txt"},
                {"source_file":"s.txt"},
                {"summary":"only"}
            ]}"#,
        );
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["x", "e", "s.txt", "result-3"]);
    }

    #[test]
    fn file_type_falls_back_to_extension() {
        let results = parse(r#"{"episodes":[{"source_file":"q3.XLSX"},{"source_file":"a.bin"}]}"#);
        assert_eq!(results[0].file_type, "xlsx");
        assert_eq!(results[1].file_type, UNKNOWN_FILE_TYPE);
    }

    #[test]
    fn highlight_defaults_to_summary() {
        let results = parse(
            r#"{"episodes":[{"summary":"plain"},{"summary":"s","highlighted_text":"the **key** part"}]}"#,
        );
        assert_eq!(results[0].highlighted_text, "plain");
        assert_eq!(results[1].plain_highlight(), "the key part");
    }

    #[test]
    fn real_metadata_is_not_estimated() {
        let results = parse(
            r#"{"episodes":[{"file_size":2048,"upload_date":"2024-06-01T10:00:00Z","page_count":3}]}"#,
        );
        let meta = &results[0].metadata;
        assert_eq!(meta.file_size, 2048);
        assert_eq!(
            meta.upload_date,
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(meta.page_count, Some(3));
        assert!(!meta.is_estimated);
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(parse_timestamp("2024-06-01T10:00:00.250"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn no_match_sentinel_yields_nothing() {
        let results = parse(
            r#"{"episodes":{"source_file":"N/A","episode_id":"N/A","summary":"No matching episodes found.","score":0.0}}"#,
        );
        assert!(results.is_empty());
    }

    #[test]
    fn no_match_needs_a_lone_zero_score_episode() {
        let scored = parse(r#"{"episodes":[{"source_file":"N/A","episode_id":"N/A","score":0.4}]}"#);
        assert_eq!(scored.len(), 1);

        let half = parse(r#"{"episodes":[{"source_file":"N/A","episode_id":"ep-1","score":0.0}]}"#);
        assert_eq!(half[0].id, "ep-1");

        let among_hits = parse(
            r#"{"episodes":[{"source_file":"a.pdf"},{"source_file":"N/A","episode_id":"N/A"}]}"#,
        );
        assert_eq!(among_hits.len(), 2);
    }

    #[test]
    fn unknown_filler_is_not_an_id() {
        let results = parse(
            r#"{"episodes":[
                {"episode_id":"unknown","source_file":"unknown","summary":"a"},
                {"episode_id":"Unknown","source_file":"notes.txt"}
            ]}"#,
        );
        assert_eq!(results[0].id, "result-0");
        assert_eq!(results[0].file_name, UNKNOWN_FILE_NAME);
        assert_eq!(results[1].id, "notes.txt");
    }

    #[test]
    fn score_is_passed_through_unclamped() {
        let results = parse(r#"{"episodes":[{"score":1.7}]}"#);
        assert!((results[0].relevance_score - 1.7).abs() < f64::EPSILON);
    }
}
