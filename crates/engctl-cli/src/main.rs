//! engctl
//!
//! Keeps dimensions and measures in an analytics app in sync with local
//! definition files.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use engctl_config::{ContextStore, PropertyRegistry, ResolvedConfig};
use engctl_entities::EntityKind;
use engctl_fs::FileLock;

use cli::{Cli, Commands, ConfigAction, ContextAction, EntityAction, GlobalArgs};
use error::Result;
use logging::Logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut logging = Logging::init(cli.global.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd, &cli.global, &mut logging),
        None => {
            println!(
                "{} Sync analytics app entities from definition files",
                "engctl".green().bold()
            );
            println!();
            println!("Run {} for available commands.", "engctl --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, global: &GlobalArgs, logging: &mut Logging) -> Result<()> {
    let registry = commands::property_registry();
    match cmd {
        Commands::Config {
            action: ConfigAction::Show { json },
        } => {
            let config = resolve(global, &registry, logging)?;
            commands::run_config_show(&config, json)
        }
        Commands::Context { action } => cmd_context(action, &registry),
        Commands::Dimension { action } => {
            cmd_entity(EntityKind::Dimension, action, global, &registry, logging)
        }
        Commands::Measure { action } => {
            cmd_entity(EntityKind::Measure, action, global, &registry, logging)
        }
    }
}

/// Resolve the configuration and apply its `verbose` property.
fn resolve(
    global: &GlobalArgs,
    registry: &PropertyRegistry,
    logging: &mut Logging,
) -> Result<ResolvedConfig> {
    let contexts = ContextStore::load_default()?;
    let config = commands::session::resolve_config(global, registry, &contexts)?;
    if config.get_bool("verbose") {
        logging.enable_verbose();
    }
    Ok(config)
}

fn cmd_context(action: ContextAction, registry: &PropertyRegistry) -> Result<()> {
    let path = ContextStore::default_path()?;
    let _lock = FileLock::acquire(&path)?;
    let mut store = ContextStore::load(path)?;
    match action {
        ContextAction::Set { name, properties } => {
            commands::run_context_set(&mut store, registry, &name, &properties)
        }
        ContextAction::Use { name } => commands::run_context_use(&mut store, &name),
        ContextAction::Get { name } => commands::run_context_get(&store, name.as_deref()),
        ContextAction::Ls => commands::run_context_ls(&store),
        ContextAction::Rm { name } => commands::run_context_rm(&mut store, &name),
        ContextAction::Clear => commands::run_context_clear(&mut store),
    }
}

fn cmd_entity(
    kind: EntityKind,
    action: EntityAction,
    global: &GlobalArgs,
    registry: &PropertyRegistry,
    logging: &mut Logging,
) -> Result<()> {
    let config = resolve(global, registry, logging)?;
    match action {
        EntityAction::Set { pattern } => {
            commands::run_entity_set(&config, kind, pattern.as_deref())
        }
        EntityAction::Ls { json } => commands::run_entity_ls(&config, kind, json),
    }
}
