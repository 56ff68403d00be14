//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// engctl - Keep analytics engine entities in sync with local definition files
#[derive(Parser, Debug)]
#[command(name = "engctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags shared by every command. Any flag given here overrides the same
/// property from the config file and the active context.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (default: ./engctl.yml or ./engctl.yaml)
    #[arg(short, long, global = true, env = "ENGCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Context to merge instead of the current one
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Engine URL
    #[arg(short, long, global = true)]
    pub engine: Option<String>,

    /// App document to operate on
    #[arg(short, long, global = true)]
    pub app: Option<String>,

    /// Session time-to-live in seconds
    #[arg(long, global = true)]
    pub ttl: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Inspect the resolved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage named contexts (saved sets of properties)
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Manage dimensions in the app
    Dimension {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage measures in the app
    Measure {
        #[command(subcommand)]
        action: EntityAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the configuration after merging file, context and flags
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Context subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ContextAction {
    /// Create or extend a context and make it current
    ///
    /// Examples:
    ///   engctl context set local engine=localhost:9076
    ///   engctl context set prod engine=wss://prod.example.com ttl=60
    Set {
        /// Context name
        name: String,

        /// Properties as key=value pairs
        properties: Vec<String>,
    },

    /// Make a context current
    Use {
        /// Context name
        name: String,
    },

    /// Show the properties of a context (default: the current one)
    Get {
        /// Context name
        name: Option<String>,
    },

    /// List all contexts
    #[command(alias = "list")]
    Ls,

    /// Remove a context
    #[command(alias = "remove")]
    Rm {
        /// Context name
        name: String,
    },

    /// Unset the current context
    Clear,
}

/// Dimension and measure subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum EntityAction {
    /// Create or update entities from definition files
    ///
    /// The pattern defaults to the `dimensions` / `measures` config property.
    ///
    /// Examples:
    ///   engctl dimension set "./defs/dimensions/*.json"
    ///   engctl measure set
    Set {
        /// Glob pattern matching definition files
        pattern: Option<String>,
    },

    /// List entities in the app
    #[command(alias = "list")]
    Ls {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
