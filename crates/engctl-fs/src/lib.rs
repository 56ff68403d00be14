//! Filesystem helpers for engctl
//!
//! Provides slash-normalized paths, atomic text I/O and advisory locks
//! used by the config loader, the context store and the app snapshot.

pub mod error;
pub mod io;
pub mod lock;
pub mod path;

pub use error::{Error, Result};
pub use lock::FileLock;
pub use path::NormalizedPath;
