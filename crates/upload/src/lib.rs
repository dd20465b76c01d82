//! Upload orchestration for the PrismBreak client.
//!
//! [`UploadOrchestrator`] sends a batch of [`FileDescriptor`]s strictly one at
//! a time through an [`UploadTransport`], reporting per-file progress to a
//! [`ProgressListener`] and recording every failure without aborting the
//! batch.
//!
//! Progress can be observed three ways: a closure, a [`ProgressTracker`]
//! (the per-file status map), or a [`progress_channel`] stream.
//!
//! [`FileDescriptor`]: prismbreak_core::FileDescriptor

pub mod error;
pub mod http;
pub mod mock;
pub mod orchestrator;
pub mod progress;
pub mod transport;

pub use error::UploadError;
pub use http::HttpUploadTransport;
pub use mock::{FailingTransport, ScriptedTransport};
pub use orchestrator::{BatchUpload, UploadOrchestrator};
pub use progress::{
    ChannelListener, NoopListener, ProgressListener, ProgressTracker, progress_channel,
};
pub use transport::UploadTransport;
