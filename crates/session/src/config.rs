use secrecy::SecretString;
use serde::Deserialize;

/// The `[auth]` section: local accounts and optional federated sign-in.
#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    #[serde(default)]
    pub federated: Option<FederatedConfig>,
}

/// A local account that signs in with identifier and password.
#[derive(Debug, Deserialize)]
pub struct AccountConfig {
    /// Usually an email address. Matched case-insensitively.
    pub identifier: String,
    /// Argon2 password hash.
    ///
    /// Wrapped in [`SecretString`] so it is redacted in logs.
    pub password_hash: SecretString,
    /// Backend user id sent with uploads and queries.
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Report `needs_second_factor` instead of completing the sign-in.
    #[serde(default)]
    pub second_factor: bool,
}

/// Federated sign-in backed by an externally issued HS256 token.
#[derive(Debug, Deserialize)]
pub struct FederatedConfig {
    /// Provider name accepted by the flow, e.g. `google`.
    pub provider: String,
    /// Shared secret used to verify the token signature.
    pub secret: SecretString,
    /// Environment variable holding the token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_token_env() -> String {
    "PRISMBREAK_FEDERATED_TOKEN".to_owned()
}
