//! In-memory [`UploadTransport`] doubles.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use prismbreak_client::FileListing;
use prismbreak_core::{FileDescriptor, Identity, RemoteObject};

use crate::error::UploadError;
use crate::transport::UploadTransport;

/// A transport that succeeds for every file except the ones marked to fail.
///
/// Records every attempt so tests can assert ordering. The listing it serves
/// contains the keys stored so far.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    failing: HashSet<String>,
    fail_listing: bool,
    attempts: Mutex<Vec<(String, Option<String>)>>,
    stored: Mutex<Vec<String>>,
    listing_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make transmissions of `file_id` fail with a connection error.
    #[must_use]
    pub fn fail(mut self, file_id: impl Into<String>) -> Self {
        self.failing.insert(file_id.into());
        self
    }

    /// Make the listing call fail.
    #[must_use]
    pub fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// File ids in the order they were attempted.
    pub fn attempted(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Project id sent with each attempt.
    pub fn project_ids(&self) -> Vec<Option<String>> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, project)| project.clone())
            .collect()
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl UploadTransport for ScriptedTransport {
    async fn transmit(
        &self,
        file: &FileDescriptor,
        identity: &Identity,
        project_id: Option<&str>,
    ) -> Result<RemoteObject, UploadError> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((file.id().to_owned(), project_id.map(str::to_owned)));

        if self.failing.contains(file.id()) {
            return Err(
                prismbreak_client::Error::Connection("connection reset by peer".into()).into(),
            );
        }

        let key = format!("users/{}/{}", identity.user_id, file.name());
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.clone());
        Ok(RemoteObject {
            url: format!("https://storage.test/{key}"),
            key,
        })
    }

    async fn list_files(&self, _identity: &Identity) -> Result<FileListing, UploadError> {
        self.listing_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_listing {
            return Err(prismbreak_client::Error::Http {
                status: 503,
                message: "File listing failed: 503 Service Unavailable".into(),
            }
            .into());
        }
        let stored = self.stored.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = stored
            .iter()
            .map(|key| serde_json::json!({ "key": key }))
            .collect();
        Ok(FileListing(serde_json::Value::Array(entries)))
    }
}

/// A transport on which every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingTransport;

#[async_trait]
impl UploadTransport for FailingTransport {
    async fn transmit(
        &self,
        _file: &FileDescriptor,
        _identity: &Identity,
        _project_id: Option<&str>,
    ) -> Result<RemoteObject, UploadError> {
        Err(prismbreak_client::Error::Connection("backend unreachable".into()).into())
    }

    async fn list_files(&self, _identity: &Identity) -> Result<FileListing, UploadError> {
        Err(prismbreak_client::Error::Connection("backend unreachable".into()).into())
    }
}
