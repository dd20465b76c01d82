use std::path::PathBuf;

use clap::Args;

use crate::context::{Selection, signed_in_gate};
use crate::{Cli, OutputFormat};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan instead of the configured media root.
    #[arg(long)]
    pub root: Option<PathBuf>,
}

pub async fn run(cli: &Cli, args: &ScanArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let selection = Selection {
        media_root: args.root.clone(),
        ..Selection::default()
    };
    let gate = signed_in_gate(cli, selection).await?;
    let files = gate.discover_media_files().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&files)?),
        OutputFormat::Text => {
            println!("{} photos (newest first):", files.len());
            for file in &files {
                println!("{}", super::describe_file(file));
            }
        }
    }
    Ok(())
}
