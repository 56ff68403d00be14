//! Configuration resolution for engctl
//!
//! Merges four sources into one property set for a single command run:
//!
//! ```text
//! config file text
//!     -> ${VAR} substitution   (env)
//!     -> property validation   (validate, registry, suggest)
//!     -> context merge         (context)
//!     -> CLI overrides
//!     = ResolvedConfig
//! ```
//!
//! Later sources win: CLI flags over the config file, the config file over
//! the selected context.

pub mod context;
pub mod env;
pub mod error;
pub mod loader;
pub mod registry;
pub mod suggest;
pub mod validate;

pub use context::{Context, ContextStore, MergeConflict, merge_context};
pub use env::{substitute_env, substitute_env_with};
pub use error::{Error, Result};
pub use loader::{CONFIG_FILE_STEM, ConfigResolver, ResolvedConfig, find_config_file};
pub use registry::{PropertyKind, PropertyRegistry};
pub use suggest::{SUGGESTION_LIMIT, edit_distance, suggest};
pub use validate::{PropertyReport, validate_properties};
