//! Dimension and measure commands

use colored::Colorize;
use engctl_config::{PropertyRegistry, ResolvedConfig};
use engctl_entities::{EntityKind, Outcome, ReconcileReport, Session, list_entities, set_entities};

use crate::commands::session::open_session;
use crate::error::{CliError, Result};

/// Register the per-kind glob pattern properties.
pub fn register_properties(registry: &mut PropertyRegistry) {
    for kind in EntityKind::ALL {
        registry.register_pattern(kind.plural());
    }
}

/// The glob pattern to apply: the argument, else the config property
/// named after the kind.
fn pattern_for(
    config: &ResolvedConfig,
    kind: EntityKind,
    pattern: Option<&str>,
) -> Result<String> {
    if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
        return Ok(pattern.to_string());
    }
    config.get_string(kind.plural()).ok_or_else(|| {
        CliError::user(format!(
            "No {} pattern given. Pass one as an argument or set '{}' in the config file.",
            kind.tag(),
            kind.plural()
        ))
    })
}

/// Create or update every definition matched by the pattern
pub fn run_entity_set(
    config: &ResolvedConfig,
    kind: EntityKind,
    pattern: Option<&str>,
) -> Result<()> {
    let pattern = pattern_for(config, kind, pattern)?;
    let mut session = open_session(config)?;
    apply(&mut session, kind, &pattern)?;
    tracing::debug!(app = %session.path(), "App snapshot up to date");
    Ok(())
}

fn apply<S: Session + ?Sized>(session: &mut S, kind: EntityKind, pattern: &str) -> Result<()> {
    let report = set_entities(session, kind, pattern)?;
    print_report(&report, pattern);
    Ok(())
}

fn print_report(report: &ReconcileReport, pattern: &str) {
    if report.files == 0 {
        println!(
            "{} No {} files matched {}",
            "=>".yellow().bold(),
            report.kind.tag(),
            pattern.cyan()
        );
        return;
    }

    for applied in &report.applied {
        let (marker, label) = match applied.outcome {
            Outcome::Created => ("+".green(), "(created)"),
            Outcome::Updated => ("~".yellow(), "(updated)"),
        };
        println!("  {} {} {}", marker, applied.id, label.dimmed());
    }
    println!(
        "{} {} {} from {} file(s): {} created, {} updated",
        "OK".green().bold(),
        report.applied.len(),
        report.kind.plural(),
        report.files,
        report.created(),
        report.updated()
    );
}

/// List the entities of one kind in the app
pub fn run_entity_ls(config: &ResolvedConfig, kind: EntityKind, json: bool) -> Result<()> {
    let mut session = open_session(config)?;
    let items = list_entities(&mut session, kind)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("{}", format!("No {} in the app.", kind.plural()).dimmed());
        return Ok(());
    }

    let width = items.iter().map(|i| i.id.len()).max().unwrap_or(0);
    println!("{}", format!("{:<width$}  TITLE", "ID").bold());
    for item in &items {
        println!("{:<width$}  {}", item.id, item.title);
    }
    Ok(())
}
