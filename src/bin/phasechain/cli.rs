//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Phasechain - order components around named phases
#[derive(Parser)]
#[command(name = "phasechain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the ordered chain of components
    Order(OrderArgs),

    /// Print the declared graph in DOT format
    Graph(GraphArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct OrderArgs {
    /// Path to Chain.toml (defaults to the nearest one above the current directory)
    #[arg(long, env = "PHASECHAIN_MANIFEST")]
    pub manifest_path: Option<PathBuf>,

    /// Print the chain as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Write the unresolved graph to this file if ordering hits a cycle
    #[arg(long, value_name = "FILE")]
    pub dot_on_cycle: Option<PathBuf>,
}

#[derive(Args)]
pub struct GraphArgs {
    /// Path to Chain.toml (defaults to the nearest one above the current directory)
    #[arg(long, env = "PHASECHAIN_MANIFEST")]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
