//! PrismBreak HTTP Client
//!
//! A native Rust client for the PrismBreak ingestion and semantic-search
//! backend. Every network call the application makes goes through
//! [`PrismClient`]; the response types in [`upload`] and [`query`] are the only
//! place where backend JSON is parsed.
//!
//! # Quick Start
//!
//! ```no_run
//! use prismbreak_client::{PrismClient, UploadRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), prismbreak_client::Error> {
//!     let client = PrismClient::new("http://localhost:8000");
//!
//!     let stored = client
//!         .upload_file(UploadRequest {
//!             bytes: b"hello".to_vec(),
//!             file_name: "hello.txt".into(),
//!             mime_type: "text/plain".into(),
//!             user_id: "user_1".into(),
//!             file_type: "txt".into(),
//!             project_id: None,
//!         })
//!         .await?;
//!     println!("stored at {}", stored.url);
//!
//!     let response = client.user_query("user_1", "waterfall model").await?;
//!     println!("{} episodes", response.into_episodes().len());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! use prismbreak_client::PrismClientBuilder;
//! use std::time::Duration;
//!
//! let client = PrismClientBuilder::new("http://localhost:8000")
//!     .timeout(Duration::from_secs(60))
//!     .build()
//!     .unwrap();
//! ```

mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod mock_server;
pub mod query;
pub mod upload;

pub use error::Error;
pub use query::{Episodes, RawEpisode, UserQueryResponse};
pub use upload::{FileListing, UploadRequest, UploadResponse};

use std::time::Duration;

use reqwest::Client;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the PrismBreak backend.
#[derive(Debug, Clone)]
pub struct PrismClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Builder for configuring a [`PrismClient`].
#[derive(Debug)]
pub struct PrismClientBuilder {
    base_url: String,
    timeout: Duration,
    api_key: Option<String>,
    client: Option<Client>,
}

impl PrismClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a bearer token sent with every request.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<PrismClient, Error> {
        if self.base_url.is_empty() {
            return Err(Error::Configuration("base URL must not be empty".into()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Configuration(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        Ok(PrismClient {
            client,
            base_url: self.base_url,
            api_key: self.api_key,
        })
    }
}

impl PrismClient {
    /// Create a new client with default configuration.
    ///
    /// Panics if `base_url` is not an `http(s)` URL; use [`PrismClient::builder`]
    /// to handle that as an error.
    pub fn new(base_url: impl Into<String>) -> Self {
        PrismClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> PrismClientBuilder {
        PrismClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add authorization header if an API key is set.
    fn add_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }
}

/// Turn a non-success response into [`Error::Http`], keeping the body.
async fn http_error(response: reqwest::Response, what: &str) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        format!("{what} failed: {status}")
    } else {
        format!("{what} failed: {status}: {body}")
    };
    Error::Http {
        status: status.as_u16(),
        message,
    }
}
