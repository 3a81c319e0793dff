//! Shared plumbing for sedoc
//!
//! Errors, identifier minting, configuration storage and the editor session
//! value that callers thread through to the renderer.

pub mod config;
pub mod error;
pub mod id;
pub mod session;

pub use crate::config::{Config, FileStore, LinkMode, Loader, OglinkSource, Saver, VideoStrategy};
pub use crate::error::{SedocError, SerDeError};
pub use crate::id::IdGenerator;
pub use crate::session::EditorSession;
