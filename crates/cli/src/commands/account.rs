use std::io::BufRead;

use anyhow::{Context, bail};

use crate::context::{Selection, signed_in_gate};
use crate::{Cli, OutputFormat};

pub async fn whoami(cli: &Cli, format: &OutputFormat) -> anyhow::Result<()> {
    let gate = signed_in_gate(cli, Selection::default()).await?;
    let Some(identity) = gate.identity().await else {
        bail!("not signed in");
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&identity)?),
        OutputFormat::Text => {
            let name = identity.display_name.as_deref().unwrap_or("-");
            println!(
                "Signed in as {user} ({name}), session {session}",
                user = identity.user_id,
                session = identity.session_id,
            );
        }
    }
    Ok(())
}

pub fn hash_password() -> anyhow::Result<()> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("empty password");
    }
    let hash = prismbreak_session::hash_password(password)?;
    println!("{hash}");
    Ok(())
}
