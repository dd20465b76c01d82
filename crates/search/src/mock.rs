//! In-memory [`SearchBackend`] doubles.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use prismbreak_client::UserQueryResponse;

use crate::backend::SearchBackend;
use crate::error::SearchError;

/// A backend that answers every query with the same response and records
/// the calls it receives.
#[derive(Debug, Default)]
pub struct MockSearchBackend {
    response: UserQueryResponse,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockSearchBackend {
    pub fn new(response: UserQueryResponse) -> Self {
        Self {
            response,
            calls: Mutex::default(),
        }
    }

    /// Build from a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if `json` is not a valid response body.
    pub fn from_json(json: &str) -> Self {
        Self::new(serde_json::from_str(json).expect("invalid mock search response"))
    }

    /// `(user_id, query)` pairs received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn user_query(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<UserQueryResponse, SearchError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((user_id.to_owned(), query.to_owned()));
        Ok(self.response.clone())
    }
}

/// A backend that fails every query.
#[derive(Debug, Clone)]
pub struct FailingSearchBackend {
    status: Option<u16>,
}

impl FailingSearchBackend {
    /// Fail as if the backend could not be reached.
    pub fn unreachable() -> Self {
        Self { status: None }
    }

    /// Fail with the given HTTP status.
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
        }
    }
}

#[async_trait]
impl SearchBackend for FailingSearchBackend {
    async fn user_query(
        &self,
        _user_id: &str,
        _query: &str,
    ) -> Result<UserQueryResponse, SearchError> {
        let error = match self.status {
            Some(status) => prismbreak_client::Error::Http {
                status,
                message: format!("Query failed: {status}"),
            },
            None => prismbreak_client::Error::Connection("connection refused".into()),
        };
        Err(error.into())
    }
}
