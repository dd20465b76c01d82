use std::path::PathBuf;

use clap::Args;

use crate::context::{Selection, signed_in_gate};
use crate::{Cli, OutputFormat};

#[derive(Args, Debug)]
pub struct PickArgs {
    /// Documents to pick. Unsupported types are skipped.
    pub paths: Vec<PathBuf>,
}

pub async fn run(cli: &Cli, args: &PickArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let selection = Selection {
        documents: args.paths.clone(),
        ..Selection::default()
    };
    let gate = signed_in_gate(cli, selection).await?;
    let files = gate.pick_documents().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&files)?),
        OutputFormat::Text => {
            if files.is_empty() {
                println!("No documents picked.");
            }
            for file in &files {
                println!("{}", super::describe_file(file));
            }
        }
    }
    Ok(())
}
