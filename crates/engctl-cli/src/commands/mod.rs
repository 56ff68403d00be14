//! Command implementations for engctl

pub mod config;
pub mod context;
pub mod entity;
pub mod session;

use engctl_config::PropertyRegistry;

pub use config::run_config_show;
pub use context::{
    run_context_clear, run_context_get, run_context_ls, run_context_rm, run_context_set,
    run_context_use,
};
pub use entity::{run_entity_ls, run_entity_set};

/// Every property some command understands.
pub fn property_registry() -> PropertyRegistry {
    let mut registry = PropertyRegistry::new();
    session::register_properties(&mut registry);
    entity::register_properties(&mut registry);
    registry
}
