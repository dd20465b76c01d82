use std::fmt;

use async_trait::async_trait;
use prismbreak_core::{Identity, SearchResult};

use crate::client::SearchClient;
use crate::error::SearchError;

/// Something that can run a query on behalf of a user.
///
/// The user is fixed by the implementor, so a [`SearchSession`] never holds
/// an identity of its own.
#[async_trait]
pub trait Searcher: Send + Sync {
    type Error: fmt::Display + Send;

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, Self::Error>;
}

#[async_trait]
impl<T: Searcher + ?Sized> Searcher for &T {
    type Error = T::Error;

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, Self::Error> {
        (**self).search(query).await
    }
}

/// A [`SearchClient`] bound to one identity.
#[derive(Debug, Clone)]
pub struct UserSearch {
    client: SearchClient,
    identity: Identity,
}

impl UserSearch {
    pub fn new(client: SearchClient, identity: Identity) -> Self {
        Self { client, identity }
    }
}

#[async_trait]
impl Searcher for UserSearch {
    type Error = SearchError;

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.client.search(query, &self.identity).await
    }
}

/// The state behind a search screen: last query, current results and the
/// last error message.
///
/// Every search replaces the result set wholesale. A failed search clears
/// the results and keeps the error until cleared or retried.
#[derive(Debug)]
pub struct SearchSession<S> {
    searcher: S,
    last_query: Option<String>,
    results: Vec<SearchResult>,
    error: Option<String>,
}

impl<S: Searcher> SearchSession<S> {
    pub fn new(searcher: S) -> Self {
        Self {
            searcher,
            last_query: None,
            results: Vec::new(),
            error: None,
        }
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Run `query` and replace the current results.
    pub async fn search(&mut self, query: &str) -> Result<&[SearchResult], S::Error> {
        if query.trim().is_empty() {
            self.results.clear();
            return Ok(&self.results);
        }

        self.last_query = Some(query.to_owned());
        self.error = None;
        match self.searcher.search(query).await {
            Ok(results) => {
                self.results = results;
                Ok(&self.results)
            }
            Err(e) => {
                self.results.clear();
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-run the last non-blank query. Without one this is a no-op.
    pub async fn retry(&mut self) -> Result<&[SearchResult], S::Error> {
        match self.last_query.clone() {
            Some(query) => self.search(&query).await,
            None => Ok(&self.results),
        }
    }

    /// Drop the results and any error.
    pub fn clear_results(&mut self) {
        self.results.clear();
        self.error = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mock::{FailingSearchBackend, MockSearchBackend};

    fn identity() -> Identity {
        Identity::new("user_1", "sess_1")
    }

    fn user_search(backend: Arc<dyn crate::backend::SearchBackend>) -> UserSearch {
        UserSearch::new(SearchClient::new(backend), identity())
    }

    fn session(json: &str) -> (SearchSession<UserSearch>, Arc<MockSearchBackend>) {
        let backend = Arc::new(MockSearchBackend::from_json(json));
        (SearchSession::new(user_search(backend.clone())), backend)
    }

    #[tokio::test]
    async fn results_are_replaced_not_merged() {
        let (mut session, _) = session(r#"{"episodes":[{"id":"a"},{"id":"b"}]}"#);
        session.search("first").await.unwrap();
        session.search("second").await.unwrap();
        assert_eq!(session.results().len(), 2);
        assert_eq!(session.last_query(), Some("second"));
    }

    #[tokio::test]
    async fn blank_query_clears_results() {
        let (mut session, backend) = session(r#"{"episodes":[{"id":"a"}]}"#);
        session.search("first").await.unwrap();
        let results = session.search("  ").await.unwrap();
        assert!(results.is_empty());
        assert_eq!(backend.call_count(), 1);
        assert_eq!(session.last_query(), Some("first"));
    }

    #[tokio::test]
    async fn failure_keeps_error_until_cleared() {
        let mut session =
            SearchSession::new(user_search(Arc::new(FailingSearchBackend::unreachable())));

        assert!(session.search("q").await.is_err());
        assert!(session.results().is_empty());
        assert!(session.error().is_some_and(|e| e.contains("connection refused")));

        session.clear_error();
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn retry_reruns_last_query() {
        let (mut session, backend) = session(r#"{"episodes":{"id":"a"}}"#);
        assert!(session.retry().await.unwrap().is_empty());
        assert_eq!(backend.call_count(), 0);

        session.search("waterfall").await.unwrap();
        session.clear_results();
        assert!(session.results().is_empty());

        session.retry().await.unwrap();
        assert_eq!(backend.call_count(), 2);
        assert_eq!(backend.calls()[1].1, "waterfall");
        assert_eq!(session.results().len(), 1);
    }

    #[tokio::test]
    async fn borrowed_searcher_is_accepted() {
        let backend = Arc::new(MockSearchBackend::from_json(r#"{"episodes":{"id":"a"}}"#));
        let search = user_search(backend.clone());
        let mut session = SearchSession::new(&search);
        session.search("waterfall").await.unwrap();
        assert_eq!(backend.calls()[0], ("user_1".to_owned(), "waterfall".to_owned()));
    }
}
