use std::sync::Arc;

use async_trait::async_trait;
use prismbreak_core::{FileDescriptor, Identity, SearchResult, SessionState, UploadResult};
use prismbreak_discovery::FileDiscovery;
use prismbreak_search::{FilePreview, PreviewService, SearchClient, SearchSession, Searcher};
use prismbreak_upload::{BatchUpload, ProgressListener, UploadOrchestrator};
use secrecy::SecretString;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{AuthError, AuthErrorKind, SessionError};
use crate::provider::{IdentityProvider, ProviderError, SignInStatus};

/// The components only reachable through a signed-in [`SessionGate`].
#[derive(Debug, Clone)]
pub struct Services {
    pub discovery: FileDiscovery,
    pub uploads: UploadOrchestrator,
    pub search: SearchClient,
    pub preview: PreviewService,
}

/// Owns the session state and guards every discovery, upload and search
/// call behind it.
///
/// Sign-in, sign-out and [`load`](Self::load) are the only state
/// transitions. Each guarded call reads the current identity at call time,
/// so a sign-out blocks all later calls.
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
    services: Services,
    state: RwLock<SessionState>,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    /// Create a gate in the `uninitialized` state.
    pub fn new(provider: Arc<dyn IdentityProvider>, services: Services) -> Self {
        Self {
            provider,
            services,
            state: RwLock::new(SessionState::Uninitialized),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// The signed-in identity, if any.
    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.identity().cloned()
    }

    /// Load the identity provider. Idempotent once loaded.
    ///
    /// On failure the gate stays `uninitialized` and loading can be retried.
    pub async fn load(&self) -> Result<SessionState, SessionError> {
        let mut state = self.state.write().await;
        if *state != SessionState::Uninitialized {
            return Ok(state.clone());
        }

        let loaded = self
            .provider
            .load()
            .await
            .map_err(|e| AuthError::new(AuthErrorKind::ProviderUnavailable, e.to_string()))?;
        *state = match loaded {
            Some(identity) => SessionState::SignedIn(identity),
            None => SessionState::SignedOut,
        };
        info!(state = %*state, "identity provider loaded");
        Ok(state.clone())
    }

    /// Sign in with an identifier and password.
    ///
    /// Fails with `InvalidCredentials` for a rejected or incomplete attempt
    /// and `StepUpRequired` when the provider asks for more verification.
    pub async fn sign_in_with_password(
        &self,
        identifier: &str,
        secret: &SecretString,
    ) -> Result<Identity, SessionError> {
        self.ensure_loaded().await?;

        let attempt = self
            .provider
            .sign_in(identifier, secret)
            .await
            .map_err(|e| match e {
                ProviderError::Rejected(message) => {
                    AuthError::new(AuthErrorKind::InvalidCredentials, message)
                }
                ProviderError::Unavailable(message) => {
                    AuthError::new(AuthErrorKind::ProviderUnavailable, message)
                }
            })?;

        let session_id = match (&attempt.status, attempt.created_session_id) {
            (SignInStatus::Complete, Some(session_id)) => session_id,
            (SignInStatus::Complete, None) => {
                return Err(AuthError::new(
                    AuthErrorKind::NoSessionCreated,
                    "sign-in completed without a session",
                )
                .into());
            }
            (status, _) if status.requires_step_up() => {
                info!(%status, "sign-in needs further verification");
                return Err(AuthError::new(
                    AuthErrorKind::StepUpRequired,
                    format!("sign-in status {status}"),
                )
                .into());
            }
            (status, _) => {
                return Err(AuthError::new(
                    AuthErrorKind::InvalidCredentials,
                    format!("sign-in incomplete: {status}"),
                )
                .into());
            }
        };

        self.activate(&session_id).await
    }

    /// Sign in through a federated provider such as `google`.
    ///
    /// Fails with `ProviderUnavailable` if the flow cannot start and
    /// `NoSessionCreated` if it finishes without a session.
    pub async fn sign_in_federated(&self, provider: &str) -> Result<Identity, SessionError> {
        self.ensure_loaded().await?;

        let outcome = self
            .provider
            .start_federated_flow(provider)
            .await
            .map_err(|e| AuthError::new(AuthErrorKind::ProviderUnavailable, e.to_string()))?;

        let Some(session_id) = outcome.created_session_id else {
            return Err(AuthError::new(
                AuthErrorKind::NoSessionCreated,
                format!("{provider} sign-in finished without a session"),
            )
            .into());
        };
        self.activate(&session_id).await
    }

    /// Sign out. The state becomes `signed_out` even if the provider call
    /// fails.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.ensure_loaded().await?;
        if let Err(e) = self.provider.sign_out().await {
            warn!(error = %e, "provider sign-out failed");
        }
        *self.state.write().await = SessionState::SignedOut;
        info!("signed out");
        Ok(())
    }

    async fn activate(&self, session_id: &str) -> Result<Identity, SessionError> {
        let identity = self.provider.activate(session_id).await.map_err(|e| {
            AuthError::new(
                AuthErrorKind::NoSessionCreated,
                format!("failed to activate session: {e}"),
            )
        })?;
        *self.state.write().await = SessionState::SignedIn(identity.clone());
        info!(user_id = %identity.user_id, "signed in");
        Ok(identity)
    }

    async fn ensure_loaded(&self) -> Result<(), SessionError> {
        if *self.state.read().await == SessionState::Uninitialized {
            return Err(SessionError::NotLoaded);
        }
        Ok(())
    }

    async fn require_identity(&self) -> Result<Identity, SessionError> {
        match &*self.state.read().await {
            SessionState::SignedIn(identity) => Ok(identity.clone()),
            SessionState::Uninitialized => Err(SessionError::NotLoaded),
            SessionState::SignedOut => Err(SessionError::SignedOut),
        }
    }

    /// Scan the media library. See [`FileDiscovery::discover_media_files`].
    pub async fn discover_media_files(&self) -> Result<Vec<FileDescriptor>, SessionError> {
        self.require_identity().await?;
        Ok(self.services.discovery.discover_media_files().await)
    }

    /// Present the document picker. See [`FileDiscovery::pick_documents`].
    pub async fn pick_documents(&self) -> Result<Vec<FileDescriptor>, SessionError> {
        self.require_identity().await?;
        Ok(self.services.discovery.pick_documents().await?)
    }

    /// Upload a batch as the signed-in user. See [`UploadOrchestrator::upload`].
    pub async fn upload(
        &self,
        files: &[FileDescriptor],
        listener: &dyn ProgressListener,
    ) -> Result<Vec<UploadResult>, SessionError> {
        let identity = self.require_identity().await?;
        Ok(self.services.uploads.upload(files, &identity, listener).await)
    }

    /// Upload a batch and fetch the resulting file listing.
    pub async fn upload_with_listing(
        &self,
        files: &[FileDescriptor],
        listener: &dyn ProgressListener,
    ) -> Result<BatchUpload, SessionError> {
        let identity = self.require_identity().await?;
        Ok(self
            .services
            .uploads
            .upload_with_listing(files, &identity, listener)
            .await)
    }

    /// Search as the signed-in user. See [`SearchClient::search`].
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SessionError> {
        let identity = self.require_identity().await?;
        Ok(self.services.search.search(query, &identity).await?)
    }

    /// A search session whose every query goes through this gate, so a
    /// sign-out also stops later searches and retries.
    pub fn search_session(&self) -> SearchSession<&Self> {
        SearchSession::new(self)
    }

    /// Preview content for a search hit.
    pub async fn preview(
        &self,
        file_id: &str,
        file_type: &str,
    ) -> Result<FilePreview, SessionError> {
        self.require_identity().await?;
        Ok(self.services.preview.preview(file_id, file_type))
    }
}

#[async_trait]
impl Searcher for SessionGate {
    type Error = SessionError;

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SessionError> {
        SessionGate::search(self, query).await
    }
}
