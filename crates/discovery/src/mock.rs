//! In-memory doubles for [`MediaLibrary`] and [`DocumentPicker`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::DiscoveryError;
use crate::media::{MediaAsset, MediaLibrary, MediaPermission};
use crate::picker::{DocumentPicker, PickOutcome, PickedDocument};

/// A media library serving a fixed set of assets.
///
/// Clones share the scan counter.
#[derive(Debug, Clone)]
pub struct StaticMediaLibrary {
    permission: MediaPermission,
    assets: Vec<MediaAsset>,
    failure: Option<String>,
    scans: Arc<AtomicUsize>,
}

impl StaticMediaLibrary {
    pub fn granted(assets: Vec<MediaAsset>) -> Self {
        Self {
            permission: MediaPermission::Granted,
            assets,
            failure: None,
            scans: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: MediaPermission::Denied,
            ..Self::granted(Vec::new())
        }
    }

    /// Permission is granted but every scan fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::granted(Vec::new())
        }
    }

    /// Number of times the assets were enumerated.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaLibrary for StaticMediaLibrary {
    async fn request_permission(&self) -> MediaPermission {
        self.permission
    }

    async fn photo_assets(&self, _limit: usize) -> Result<Vec<MediaAsset>, DiscoveryError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(DiscoveryError::Library(message.clone())),
            None => Ok(self.assets.clone()),
        }
    }
}

/// A picker that always returns the same outcome.
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    outcome: PickOutcome,
}

impl ScriptedPicker {
    pub fn cancelled() -> Self {
        Self {
            outcome: PickOutcome::Cancelled,
        }
    }

    pub fn picked(documents: Vec<PickedDocument>) -> Self {
        Self {
            outcome: PickOutcome::Picked(documents),
        }
    }
}

#[async_trait]
impl DocumentPicker for ScriptedPicker {
    async fn pick(&self, _allowed: &[&str]) -> Result<PickOutcome, DiscoveryError> {
        Ok(self.outcome.clone())
    }
}

/// A picker that always fails.
#[derive(Debug, Clone)]
pub struct FailingPicker {
    message: String,
}

impl FailingPicker {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DocumentPicker for FailingPicker {
    async fn pick(&self, _allowed: &[&str]) -> Result<PickOutcome, DiscoveryError> {
        Err(DiscoveryError::Picker(self.message.clone()))
    }
}
