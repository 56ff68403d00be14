//! Configuration display command

use colored::Colorize;
use engctl_config::ResolvedConfig;

use crate::error::Result;

/// Print the resolved configuration
pub fn run_config_show(config: &ResolvedConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("{}", "Resolved Configuration".bold());
    println!();
    let source = config
        .source()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "(none)".to_string());
    println!("  {:<12} {}", "Config:".dimmed(), source);
    println!(
        "  {:<12} {}",
        "Context:".dimmed(),
        config.context().unwrap_or("(none)")
    );
    for conflict in config.conflicts() {
        println!(
            "  {} '{}' is set by both the config file and context '{}'",
            "note:".yellow(),
            conflict.property,
            conflict.context
        );
    }
    println!();

    if config.is_empty() {
        println!("  {}", "(no properties set)".dimmed());
        return Ok(());
    }
    print!("{}", indent(&serde_yaml::to_string(config)?));
    Ok(())
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {line}\n")).collect()
}
