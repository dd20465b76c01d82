use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use prismbreak_client::PrismClient;
use prismbreak_discovery::{DirectoryMediaLibrary, FileDiscovery, PathPicker};
use prismbreak_search::{HttpSearchBackend, PreviewService, SearchClient};
use prismbreak_session::{LocalIdentityProvider, Services, SessionGate};
use prismbreak_upload::{HttpUploadTransport, UploadOrchestrator};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::Cli;
use crate::config::PrismConfig;

/// Inputs that only some commands supply.
#[derive(Debug, Default)]
pub struct Selection {
    /// Overrides the configured media root.
    pub media_root: Option<PathBuf>,
    /// Paths handed to the document picker.
    pub documents: Vec<PathBuf>,
}

/// Build the gate from config and flags, load it, and sign in.
pub async fn signed_in_gate(cli: &Cli, selection: Selection) -> anyhow::Result<SessionGate> {
    let config = match &cli.config {
        Some(path) => PrismConfig::load(path)?,
        None => PrismConfig::default(),
    };

    let endpoint = cli.endpoint.as_deref().unwrap_or(&config.backend.endpoint);
    let mut builder = PrismClient::builder(endpoint)
        .timeout(Duration::from_secs(config.backend.timeout_seconds));
    let api_key = cli
        .api_key
        .as_ref()
        .or(config.backend.api_key.as_ref())
        .map(|k| k.expose_secret().clone());
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    let client = builder.build().context("invalid backend configuration")?;
    debug!(endpoint = client.base_url(), "backend client ready");

    let media_root = selection
        .media_root
        .or(config.discovery.media_root)
        .unwrap_or_else(|| PathBuf::from("."));
    let discovery = FileDiscovery::new(
        Arc::new(DirectoryMediaLibrary::new(media_root)),
        Arc::new(PathPicker::new(selection.documents)),
    )
    .with_media_limit(config.discovery.media_limit);

    let mut uploads = UploadOrchestrator::new(Arc::new(HttpUploadTransport::new(client.clone())));
    if let Some(project_id) = cli.project_id.as_ref().or(config.backend.project_id.as_ref()) {
        uploads = uploads.with_project_id(project_id);
    }

    let services = Services {
        discovery,
        uploads,
        search: SearchClient::new(Arc::new(HttpSearchBackend::new(client))),
        preview: PreviewService::new(),
    };
    let gate = SessionGate::new(
        Arc::new(LocalIdentityProvider::new(config.auth)),
        services,
    );

    gate.load().await?;
    if let Some(provider) = &cli.federated {
        gate.sign_in_federated(provider).await?;
    } else {
        match (&cli.identifier, &cli.password) {
            (Some(identifier), Some(password)) => {
                gate.sign_in_with_password(identifier, password).await?;
            }
            _ => bail!(
                "not signed in: pass --identifier and --password (or PRISMBREAK_IDENTIFIER and \
                 PRISMBREAK_PASSWORD), or --federated <provider>"
            ),
        }
    }
    Ok(gate)
}

/// Parse a secret from a command-line value.
pub fn parse_secret(value: &str) -> Result<SecretString, String> {
    Ok(SecretString::new(value.to_owned()))
}
