use std::sync::Arc;

use chrono::Utc;
use prismbreak_core::{Identity, SearchResult};
use tracing::{debug, info};

use crate::backend::SearchBackend;
use crate::error::SearchError;
use crate::normalize::normalize_response;

/// Runs natural-language queries for a signed-in user.
///
/// Each call returns a complete, fresh result set; nothing is cached.
#[derive(Clone)]
pub struct SearchClient {
    backend: Arc<dyn SearchBackend>,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient").finish_non_exhaustive()
    }
}

impl SearchClient {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Search the content ingested by `identity`.
    ///
    /// A blank query returns no results without contacting the backend.
    /// Results keep the backend's order.
    pub async fn search(
        &self,
        query: &str,
        identity: &Identity,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("blank query, skipping backend call");
            return Ok(Vec::new());
        }

        let response = self.backend.user_query(&identity.user_id, query).await?;
        let results = normalize_response(response, Utc::now());
        info!(count = results.len(), "search completed");
        Ok(results)
    }
}
