use async_trait::async_trait;
use prismbreak_client::{PrismClient, UserQueryResponse};
use tracing::debug;

use crate::error::SearchError;

/// The remote semantic-search service.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run `query` against the content ingested for `user_id`.
    async fn user_query(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<UserQueryResponse, SearchError>;
}

/// [`SearchBackend`] backed by `POST /user-query`.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: PrismClient,
}

impl HttpSearchBackend {
    pub fn new(client: PrismClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn user_query(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<UserQueryResponse, SearchError> {
        let response = self.client.user_query(user_id, query).await?;
        debug!(
            shape = match &response.episodes {
                None => "absent",
                Some(prismbreak_client::Episodes::One(_)) => "object",
                Some(prismbreak_client::Episodes::Many(_)) => "array",
            },
            "received search response"
        );
        Ok(response)
    }
}
