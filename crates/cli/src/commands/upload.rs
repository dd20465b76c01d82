use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use prismbreak_core::{BatchOutcome, FileDescriptor, UploadProgress, UploadResult, UploadStatus};
use prismbreak_upload::{BatchUpload, ProgressListener, ProgressTracker};
use serde::Serialize;
use tracing::info;

use crate::context::{Selection, signed_in_gate};
use crate::{Cli, OutputFormat};

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Documents to upload, in order.
    pub paths: Vec<PathBuf>,
    /// Also upload photos from the media library (after the documents).
    #[arg(long)]
    pub media: bool,
    /// Directory to scan instead of the configured media root.
    #[arg(long)]
    pub media_root: Option<PathBuf>,
    /// Re-send the files that failed, once, after the batch.
    #[arg(long)]
    pub retry_failed: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    results: &'a [UploadResult],
    failed: &'a [String],
    listed: Option<usize>,
}

pub async fn run(cli: &Cli, args: &UploadArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let selection = Selection {
        media_root: args.media_root.clone(),
        documents: args.paths.clone(),
    };
    let gate = signed_in_gate(cli, selection).await?;

    let mut files = gate.pick_documents().await?;
    if args.media {
        files.extend(gate.discover_media_files().await?);
    }
    if files.is_empty() {
        let empty = BatchUpload {
            results: Vec::new(),
            outcome: BatchOutcome::Empty,
            listing: None,
        };
        print!("{}", render(&empty, format)?);
        return Ok(());
    }

    let tracker = ProgressTracker::new();
    let show = matches!(format, OutputFormat::Text);
    let listener = |event: &UploadProgress| {
        tracker.on_progress(event);
        if show {
            print_progress(event);
        }
    };

    let mut batch = gate.upload_with_listing(&files, &listener).await?;

    if args.retry_failed {
        let failed = tracker.failed_ids();
        if !failed.is_empty() {
            info!(count = failed.len(), "retrying failed uploads");
            tracker.forget(&failed);
            let retry: Vec<FileDescriptor> = files
                .iter()
                .filter(|f| failed.iter().any(|id| id == f.id()))
                .cloned()
                .collect();
            let retried = gate.upload_with_listing(&retry, &listener).await?;
            merge_retry(&mut batch, retried);
        }
    }

    print!("{}", render(&batch, format)?);

    if !batch.outcome.failed_ids().is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Fold a retry of the failed subset into the original batch. The listing
/// is the one fetched after the retry.
fn merge_retry(batch: &mut BatchUpload, retried: BatchUpload) {
    for result in retried.results {
        if let Some(slot) = batch.results.iter_mut().find(|r| r.file_id == result.file_id) {
            *slot = result;
        }
    }
    batch.outcome = BatchOutcome::from_results(&batch.results);
    batch.listing = retried.listing;
}

fn render(batch: &BatchUpload, format: &OutputFormat) -> anyhow::Result<String> {
    let listed = batch.listing.as_ref().and_then(|l| l.entry_count());
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            let report = Report {
                results: &batch.results,
                failed: batch.outcome.failed_ids(),
                listed,
            };
            out.push_str(&serde_json::to_string_pretty(&report)?);
            out.push('\n');
        }
        OutputFormat::Text => {
            if batch.results.is_empty() {
                out.push_str("Nothing to upload.\n");
                return Ok(out);
            }
            for result in &batch.results {
                match (&result.remote_url, &result.error) {
                    (Some(url), _) => writeln!(out, "  ok     {} -> {url}", result.file_id)?,
                    (None, Some(error)) => writeln!(out, "  failed {}: {error}", result.file_id)?,
                    (None, None) => writeln!(out, "  failed {}", result.file_id)?,
                }
            }
            match &batch.outcome {
                BatchOutcome::Empty | BatchOutcome::AllSucceeded => {
                    writeln!(out, "Uploaded {} files.", batch.results.len())?;
                }
                BatchOutcome::PartialFailure { failed } | BatchOutcome::AllFailed { failed } => {
                    writeln!(
                        out,
                        "{} of {} files failed; re-run with --retry-failed to resend them.",
                        failed.len(),
                        batch.results.len()
                    )?;
                }
            }
            if let Some(count) = listed {
                writeln!(out, "{count} files stored for this account.")?;
            }
        }
    }
    Ok(out)
}

fn print_progress(event: &UploadProgress) {
    let status = match event.status {
        UploadStatus::Uploading => "uploading",
        UploadStatus::Completed => "completed",
        UploadStatus::Error => "error",
    };
    eprintln!(
        "[{percent:>3}%] {status:<9} {name}",
        percent = event.progress_percent,
        name = event.file_name,
    );
}
