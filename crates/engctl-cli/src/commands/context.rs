//! Context management commands

use colored::Colorize;
use engctl_config::{Context, ContextStore, PropertyRegistry};
use serde_yaml::Value;

use crate::error::{CliError, Result};

/// Create or extend a context, then make it current
pub fn run_context_set(
    store: &mut ContextStore,
    registry: &PropertyRegistry,
    name: &str,
    properties: &[String],
) -> Result<()> {
    let context = parse_properties(registry, properties)?;
    let count = context.len();
    store.set(name, context);
    store.use_context(name)?;
    store.save()?;

    println!(
        "{} Context {} saved ({} properties) and set as current",
        "OK".green().bold(),
        name.cyan(),
        count
    );
    Ok(())
}

/// Make a context current
pub fn run_context_use(store: &mut ContextStore, name: &str) -> Result<()> {
    store.use_context(name)?;
    store.save()?;
    println!("{} Current context is now {}", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Print a context's properties
pub fn run_context_get(store: &ContextStore, name: Option<&str>) -> Result<()> {
    let name = store.resolve_name(name).ok_or_else(|| {
        CliError::user("No current context. Use 'engctl context use <name>' or pass a name.")
    })?;
    let context = store.get(name).ok_or_else(|| {
        CliError::user(format!(
            "Unknown context '{}'. Use 'engctl context ls' to see available contexts.",
            name
        ))
    })?;

    println!("{} {}", "Context".bold(), name.cyan());
    if context.is_empty() {
        println!("  {}", "(no properties)".dimmed());
    }
    for (property, value) in context.iter() {
        println!("  {:<12} {}", format!("{property}:").dimmed(), display_value(value));
    }
    Ok(())
}

/// List contexts, marking the current one
pub fn run_context_ls(store: &ContextStore) -> Result<()> {
    let names: Vec<&str> = store.names().collect();
    if names.is_empty() {
        println!("{}", "No contexts defined.".dimmed());
        return Ok(());
    }
    for name in names {
        if store.current() == Some(name) {
            println!("{} {}", "*".green().bold(), name.bold());
        } else {
            println!("  {}", name);
        }
    }
    Ok(())
}

/// Remove a context
pub fn run_context_rm(store: &mut ContextStore, name: &str) -> Result<()> {
    store.remove(name)?;
    store.save()?;
    println!("{} Removed context {}", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Unset the current context
pub fn run_context_clear(store: &mut ContextStore) -> Result<()> {
    match store.clear_current() {
        Some(previous) => {
            store.save()?;
            println!(
                "{} Cleared current context (was {})",
                "OK".green().bold(),
                previous.cyan()
            );
        }
        None => println!("{}", "No current context to clear.".dimmed()),
    }
    Ok(())
}

/// Parse `key=value` pairs, rejecting unknown property names.
fn parse_properties(registry: &PropertyRegistry, properties: &[String]) -> Result<Context> {
    let mut context = Context::new();
    for pair in properties {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            CliError::user(format!("Invalid property '{}', expected key=value", pair))
        })?;
        let key = key.trim();
        registry.check(key)?;
        context.insert(key, Value::from(value));
    }
    Ok(context)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
