//! A scripted [`IdentityProvider`] for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use prismbreak_core::Identity;
use secrecy::SecretString;

use crate::provider::{
    FederatedOutcome, IdentityProvider, ProviderError, SignInAttempt, SignInStatus,
};

/// Answers every call with a preset response.
///
/// By default: nobody is signed in on load, sign-in completes with session
/// `sess_scripted`, the federated flow is unavailable, and activation yields
/// `user_scripted`.
#[derive(Debug)]
pub struct ScriptedIdentityProvider {
    on_load: Result<Option<Identity>, ProviderError>,
    on_sign_in: Result<SignInAttempt, ProviderError>,
    on_federated: Result<FederatedOutcome, ProviderError>,
    on_activate: Result<Identity, ProviderError>,
    sign_ins: Mutex<Vec<String>>,
    sign_outs: AtomicUsize,
}

impl Default for ScriptedIdentityProvider {
    fn default() -> Self {
        Self {
            on_load: Ok(None),
            on_sign_in: Ok(SignInAttempt {
                status: SignInStatus::Complete,
                created_session_id: Some("sess_scripted".into()),
            }),
            on_federated: Err(ProviderError::Unavailable("no federated flow".into())),
            on_activate: Ok(Identity::new("user_scripted", "sess_scripted")),
            sign_ins: Mutex::default(),
            sign_outs: AtomicUsize::new(0),
        }
    }
}

impl ScriptedIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_load(mut self, result: Result<Option<Identity>, ProviderError>) -> Self {
        self.on_load = result;
        self
    }

    /// Report `status` for every credential sign-in.
    #[must_use]
    pub fn sign_in_status(mut self, status: &str, session_id: Option<&str>) -> Self {
        self.on_sign_in = Ok(SignInAttempt {
            status: SignInStatus::parse(status),
            created_session_id: session_id.map(str::to_owned),
        });
        self
    }

    #[must_use]
    pub fn sign_in_error(mut self, error: ProviderError) -> Self {
        self.on_sign_in = Err(error);
        self
    }

    #[must_use]
    pub fn on_federated(mut self, result: Result<FederatedOutcome, ProviderError>) -> Self {
        self.on_federated = result;
        self
    }

    #[must_use]
    pub fn on_activate(mut self, result: Result<Identity, ProviderError>) -> Self {
        self.on_activate = result;
        self
    }

    /// Identifiers passed to `sign_in`, in call order.
    pub fn sign_in_calls(&self) -> Vec<String> {
        self.sign_ins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn load(&self) -> Result<Option<Identity>, ProviderError> {
        self.on_load.clone()
    }

    async fn sign_in(
        &self,
        identifier: &str,
        _secret: &SecretString,
    ) -> Result<SignInAttempt, ProviderError> {
        self.sign_ins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(identifier.to_owned());
        self.on_sign_in.clone()
    }

    async fn start_federated_flow(
        &self,
        _provider: &str,
    ) -> Result<FederatedOutcome, ProviderError> {
        self.on_federated.clone()
    }

    async fn activate(&self, _session_id: &str) -> Result<Identity, ProviderError> {
        self.on_activate.clone()
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.sign_outs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
