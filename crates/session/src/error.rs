use std::fmt;

use prismbreak_discovery::DiscoveryError;
use prismbreak_search::SearchError;
use thiserror::Error;

/// Why a sign-in failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The provider rejected the credentials or reported an incomplete attempt.
    InvalidCredentials,
    /// The provider needs further verification before a session can exist.
    StepUpRequired,
    /// The provider, or the requested federated flow, could not be used.
    ProviderUnavailable,
    /// The flow finished but no session was created.
    NoSessionCreated,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidCredentials => "invalid credentials",
            Self::StepUpRequired => "additional verification required",
            Self::ProviderUnavailable => "identity provider unavailable",
            Self::NoSessionCreated => "no session created",
        })
    }
}

/// A failed sign-in. The session state is left unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Errors returned by the [`SessionGate`](crate::SessionGate).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The identity provider has not finished loading.
    #[error("identity provider not loaded yet")]
    NotLoaded,

    /// The operation requires a signed-in user.
    #[error("not signed in")]
    SignedOut,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl SessionError {
    /// The sign-in failure kind, if this is one.
    pub fn auth_kind(&self) -> Option<AuthErrorKind> {
        match self {
            Self::Auth(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Whether repeating the operation might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Search(e) if e.is_retryable())
    }
}
