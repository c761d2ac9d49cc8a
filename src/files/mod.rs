//! Path-safe file access core: resolution, listing, range streaming and
//! atomic uploads. Nothing in this module touches HTTP types; the web
//! layer translates between the two.

pub mod error;
pub mod listing;
pub mod mime;
pub mod range;
pub mod resolver;
pub mod stream;
pub mod upload;

pub use error::FsError;
pub use listing::{DirectoryEntry, EntryKind};
pub use resolver::{PathResolver, ResolvedPath};
pub use stream::{StreamMeta, StreamSession, StreamStatus};
