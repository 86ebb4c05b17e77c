//! CLI argument definitions using clap

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Browse a hierarchical topic tree level by level and drill into its documents
#[derive(Parser, Debug)]
#[command(name = "topictree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory or http(s) base URL holding the documents
    #[arg(short = 'S', long, global = true, value_hint = ValueHint::AnyPath)]
    pub source: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree for a level window
    Show {
        /// Level whose nodes become the roots (default: highest level)
        #[arg(short, long, allow_negative_numbers = true)]
        top: Option<i64>,
        /// Levels up to this one are collapsed (default: one below top)
        #[arg(short, long, allow_negative_numbers = true)]
        bottom: Option<i64>,
        /// Show only nodes whose label contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Number of nodes per level
    Levels,

    /// List the documents of a node
    Docs {
        /// Node identifier
        id: String,
    },

    /// Interactive session: change levels, filter, select nodes
    Browse,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
