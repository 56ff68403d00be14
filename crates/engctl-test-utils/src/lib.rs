//! Shared test fixtures for the engctl workspace.
//!
//! - [`workspace`]: temp project directory with config, context and
//!   entity definition writers
//! - [`definitions`]: canned entity definition documents

pub mod definitions;
pub mod workspace;

pub use workspace::Workspace;
