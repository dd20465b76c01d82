//! Local file discovery for the PrismBreak client.
//!
//! Two independent sources feed the ingestion list: the device media library
//! ([`MediaLibrary`]) and the user's document picker ([`DocumentPicker`]).
//! [`FileDiscovery`] normalizes both into [`FileDescriptor`]s.
//!
//! Both capabilities are traits so the platform integration can be swapped:
//! the crate ships filesystem-backed implementations ([`DirectoryMediaLibrary`],
//! [`PathPicker`]) and test doubles in [`mock`].
//!
//! [`FileDescriptor`]: prismbreak_core::FileDescriptor

pub mod discovery;
pub mod error;
pub mod media;
pub mod mock;
pub mod picker;

pub use discovery::{DEFAULT_MEDIA_LIMIT, FileDiscovery};
pub use error::DiscoveryError;
pub use media::{DirectoryMediaLibrary, MediaAsset, MediaLibrary, MediaPermission};
pub use mock::{FailingPicker, ScriptedPicker, StaticMediaLibrary};
pub use picker::{DocumentPicker, PathPicker, PickOutcome, PickedDocument};
