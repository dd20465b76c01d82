//! Semantic search for the PrismBreak client.
//!
//! [`SearchClient`] sends a query to a [`SearchBackend`] and normalizes
//! whatever response shape comes back into [`SearchResult`]s. [`SearchSession`]
//! holds the per-screen state (results, error, retry) over any [`Searcher`]
//! and [`PreviewService`] provides detail-view content.
//!
//! [`SearchResult`]: prismbreak_core::SearchResult

pub mod backend;
pub mod client;
pub mod error;
pub mod mock;
pub mod normalize;
pub mod preview;
pub mod session;

pub use backend::{HttpSearchBackend, SearchBackend};
pub use client::SearchClient;
pub use error::SearchError;
pub use mock::{FailingSearchBackend, MockSearchBackend};
pub use normalize::{normalize_episodes, normalize_response};
pub use preview::{FilePreview, PLACEHOLDER_LABEL, PreviewService};
pub use session::{SearchSession, Searcher, UserSearch};
