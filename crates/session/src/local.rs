use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use prismbreak_core::Identity;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AccountConfig, AuthConfig, FederatedConfig};
use crate::provider::{
    FederatedOutcome, IdentityProvider, ProviderError, SignInAttempt, SignInStatus,
};

/// Verify a candidate password against an argon2 hash string.
///
/// Returns `true` if the password matches.
pub fn verify_password(hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

/// Hash a password for an `[[auth.accounts]]` entry.
pub fn hash_password(password: &str) -> Result<String, ProviderError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| ProviderError::Unavailable(format!("failed to build salt: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ProviderError::Unavailable(format!("failed to hash password: {e}")))
}

/// Claims expected in a federated token.
#[derive(Debug, Deserialize)]
struct FederatedClaims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
}

/// An identity provider backed by the `[auth]` configuration.
///
/// Password sign-in checks argon2 hashes; federated sign-in verifies an
/// HS256 token taken from the configured environment variable. Sessions live
/// in memory only.
pub struct LocalIdentityProvider {
    accounts: Vec<AccountConfig>,
    federated: Option<FederatedConfig>,
    federated_token: Option<SecretString>,
    pending: Mutex<HashMap<String, Identity>>,
    current: Mutex<Option<Identity>>,
}

impl std::fmt::Debug for LocalIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalIdentityProvider")
            .field("accounts", &self.accounts.len())
            .field("federated", &self.federated.as_ref().map(|f| &f.provider))
            .finish_non_exhaustive()
    }
}

impl LocalIdentityProvider {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            accounts: config.accounts,
            federated: config.federated,
            federated_token: None,
            pending: Mutex::new(HashMap::new()),
            current: Mutex::new(None),
        }
    }

    /// Use `token` for the federated flow instead of reading the environment.
    #[must_use]
    pub fn with_federated_token(mut self, token: SecretString) -> Self {
        self.federated_token = Some(token);
        self
    }

    fn find_account(&self, identifier: &str) -> Option<&AccountConfig> {
        let identifier = identifier.trim();
        self.accounts
            .iter()
            .find(|a| a.identifier.eq_ignore_ascii_case(identifier))
    }

    fn create_session(&self, identity_for: impl FnOnce(String) -> Identity) -> String {
        let session_id = format!("sess_{}", Uuid::now_v7().simple());
        let identity = identity_for(session_id.clone());
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.clone(), identity);
        session_id
    }

    fn federated_token(&self, config: &FederatedConfig) -> Option<String> {
        match &self.federated_token {
            Some(token) => Some(token.expose_secret().clone()),
            None => std::env::var(&config.token_env)
                .ok()
                .filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn load(&self) -> Result<Option<Identity>, ProviderError> {
        Ok(self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn sign_in(
        &self,
        identifier: &str,
        secret: &SecretString,
    ) -> Result<SignInAttempt, ProviderError> {
        let Some(account) = self.find_account(identifier) else {
            debug!("unknown identifier");
            return Err(ProviderError::Rejected("invalid identifier or password".into()));
        };
        if !verify_password(account.password_hash.expose_secret(), secret.expose_secret()) {
            debug!("password mismatch");
            return Err(ProviderError::Rejected("invalid identifier or password".into()));
        }

        if account.second_factor {
            return Ok(SignInAttempt {
                status: SignInStatus::NeedsSecondFactor,
                created_session_id: None,
            });
        }

        let session_id = self.create_session(|session_id| {
            let identity = Identity::new(&account.user_id, session_id);
            match &account.display_name {
                Some(name) => identity.with_display_name(name),
                None => identity,
            }
        });
        Ok(SignInAttempt {
            status: SignInStatus::Complete,
            created_session_id: Some(session_id),
        })
    }

    async fn start_federated_flow(
        &self,
        provider: &str,
    ) -> Result<FederatedOutcome, ProviderError> {
        let Some(config) = &self.federated else {
            return Err(ProviderError::Unavailable(
                "federated sign-in is not configured".into(),
            ));
        };
        if !config.provider.eq_ignore_ascii_case(provider) {
            return Err(ProviderError::Unavailable(format!(
                "unsupported federated provider '{provider}'"
            )));
        }

        let Some(token) = self.federated_token(config) else {
            info!(env = %config.token_env, "no federated token present");
            return Ok(FederatedOutcome::default());
        };

        let key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let claims = match decode::<FederatedClaims>(&token, &key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                warn!(error = %e, "federated token rejected");
                return Ok(FederatedOutcome::default());
            }
        };

        let session_id = self.create_session(|session_id| {
            let identity = Identity::new(&claims.sub, session_id);
            match &claims.name {
                Some(name) => identity.with_display_name(name),
                None => identity,
            }
        });
        Ok(FederatedOutcome {
            created_session_id: Some(session_id),
        })
    }

    async fn activate(&self, session_id: &str) -> Result<Identity, ProviderError> {
        let identity = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
            .ok_or_else(|| ProviderError::Rejected(format!("unknown session '{session_id}'")))?;
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}
