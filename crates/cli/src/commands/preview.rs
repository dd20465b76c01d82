use clap::Args;

use crate::context::{Selection, signed_in_gate};
use crate::{Cli, OutputFormat};

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Id of the search hit.
    pub file_id: String,
    /// File type reported with the hit (e.g. "pdf").
    #[arg(long, default_value = "unknown")]
    pub file_type: String,
}

pub async fn run(cli: &Cli, args: &PreviewArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let gate = signed_in_gate(cli, Selection::default()).await?;
    let preview = gate.preview(&args.file_id, &args.file_type).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&preview)?),
        OutputFormat::Text => {
            println!("{} ({})", preview.file_id, preview.category);
            println!();
            println!("{}", preview.content);
        }
    }
    Ok(())
}
