//! Authentication and access control for the PrismBreak client.
//!
//! [`SessionGate`] tracks the session state (`uninitialized`, `signed_out`,
//! `signed_in`) over an [`IdentityProvider`] and is the only way to reach
//! file discovery, uploads and search. [`LocalIdentityProvider`] is a
//! config-backed provider; [`mock::ScriptedIdentityProvider`] is for tests.

pub mod config;
pub mod error;
pub mod gate;
pub mod local;
pub mod mock;
pub mod provider;

pub use config::{AccountConfig, AuthConfig, FederatedConfig};
pub use error::{AuthError, AuthErrorKind, SessionError};
pub use gate::{Services, SessionGate};
pub use local::{LocalIdentityProvider, hash_password, verify_password};
pub use mock::ScriptedIdentityProvider;
pub use provider::{
    FederatedOutcome, IdentityProvider, ProviderError, SignInAttempt, SignInStatus,
};
