use std::fmt;

use serde::{Deserialize, Serialize};

/// An authenticated user as seen by the ingestion and search backends.
///
/// `user_id` is the identity token sent to the backend (`userId` on upload,
/// `user_id` on query).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            display_name: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The identity provider has not finished loading.
    #[default]
    Uninitialized,
    SignedOut,
    SignedIn(Identity),
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::Uninitialized | Self::SignedOut => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::SignedOut => f.write_str("signed_out"),
            Self::SignedIn(identity) => write!(f, "signed_in({})", identity.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_uninitialized() {
        let state = SessionState::default();
        assert_eq!(state, SessionState::Uninitialized);
        assert!(!state.is_signed_in());
        assert!(state.identity().is_none());
    }

    #[test]
    fn signed_in_exposes_identity() {
        let state = SessionState::SignedIn(Identity::new("user_1", "sess_1").with_display_name("Ada"));
        assert!(state.is_signed_in());
        assert_eq!(state.identity().map(|i| i.user_id.as_str()), Some("user_1"));
        assert_eq!(state.to_string(), "signed_in(user_1)");
    }
}
