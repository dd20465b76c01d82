use clap::Args;
use prismbreak_core::format_file_size;
use tracing::warn;

use crate::context::{Selection, signed_in_gate};
use crate::{Cli, OutputFormat};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// What to look for, in plain language.
    #[arg(required = true)]
    pub query: Vec<String>,
    /// Retry a failed search this many times.
    #[arg(long, default_value_t = 0)]
    pub retries: u32,
}

pub async fn run(cli: &Cli, args: &SearchArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let gate = signed_in_gate(cli, Selection::default()).await?;
    let mut session = gate.search_session();

    let query = args.query.join(" ");
    let mut outcome = session.search(&query).await.map(<[_]>::len);
    let mut attempts = 0;
    while let Err(e) = &outcome {
        if attempts >= args.retries || !e.is_retryable() {
            break;
        }
        attempts += 1;
        warn!(attempt = attempts, error = %e, "search failed, retrying");
        outcome = session.retry().await.map(<[_]>::len);
    }
    outcome?;

    let results = session.results();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Text => {
            if results.is_empty() {
                println!("No results for \"{query}\".");
            }
            for result in results {
                let meta = &result.metadata;
                let size = if meta.is_estimated {
                    "size unknown (estimated metadata)".to_owned()
                } else {
                    format_file_size(meta.file_size)
                };
                println!(
                    "{score:>3}%  {name} [{file_type}] id={id}",
                    score = result.score_percent(),
                    name = result.file_name,
                    file_type = result.file_type,
                    id = result.id,
                );
                println!("      {size}");
                let text = result.plain_highlight();
                if !text.is_empty() {
                    println!("      {text}");
                }
            }
        }
    }
    Ok(())
}
