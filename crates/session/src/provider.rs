use std::fmt;

use async_trait::async_trait;
use prismbreak_core::Identity;
use secrecy::SecretString;
use thiserror::Error;

/// Status reported by the identity provider for a credential sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInStatus {
    Complete,
    NeedsIdentifier,
    NeedsFirstFactor,
    NeedsSecondFactor,
    NeedsNewPassword,
    /// A status this client does not recognise.
    Other(String),
}

impl SignInStatus {
    /// Parse the provider's wire status (`complete`, `needs_second_factor`, ...).
    pub fn parse(value: &str) -> Self {
        match value {
            "complete" => Self::Complete,
            "needs_identifier" => Self::NeedsIdentifier,
            "needs_first_factor" => Self::NeedsFirstFactor,
            "needs_second_factor" => Self::NeedsSecondFactor,
            "needs_new_password" => Self::NeedsNewPassword,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Complete => "complete",
            Self::NeedsIdentifier => "needs_identifier",
            Self::NeedsFirstFactor => "needs_first_factor",
            Self::NeedsSecondFactor => "needs_second_factor",
            Self::NeedsNewPassword => "needs_new_password",
            Self::Other(s) => s,
        }
    }

    /// Statuses where the credentials were accepted but more verification
    /// is needed.
    pub fn requires_step_up(&self) -> bool {
        matches!(self, Self::NeedsSecondFactor | Self::NeedsNewPassword)
    }
}

impl fmt::Display for SignInStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a credential sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInAttempt {
    pub status: SignInStatus,
    /// Set when `status` is `Complete`.
    pub created_session_id: Option<String>,
}

/// Result of a federated sign-in flow that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FederatedOutcome {
    pub created_session_id: Option<String>,
}

/// Errors reported by an identity provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The request was understood and refused.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The provider or the requested flow cannot be reached or started.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// External identity service the session gate depends on.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Finish loading and report the already-signed-in user, if any.
    async fn load(&self) -> Result<Option<Identity>, ProviderError>;

    /// Attempt a sign-in with an identifier (e.g. email) and secret.
    async fn sign_in(
        &self,
        identifier: &str,
        secret: &SecretString,
    ) -> Result<SignInAttempt, ProviderError>;

    /// Run the federated flow for `provider` (e.g. `google`).
    async fn start_federated_flow(
        &self,
        provider: &str,
    ) -> Result<FederatedOutcome, ProviderError>;

    /// Make a created session the active one and return its identity.
    async fn activate(&self, session_id: &str) -> Result<Identity, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;
}
