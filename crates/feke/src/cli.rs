//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feke")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub globals: GlobalArgs,
}

/// Options shared by every command
#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Path to feke.toml (defaults to ./feke.toml when present)
    #[arg(long, global = true, value_name = "FILE", env = "FEKE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the template directory
    #[arg(long, global = true, value_name = "DIR", env = "FEKE_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,

    /// Override the cache directory
    #[arg(long, global = true, value_name = "DIR", env = "FEKE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template to stdout or a file
    Render(RenderArgs),

    /// Render cache management
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Args)]
pub struct RenderArgs {
    /// Template path relative to the template directory
    pub template: String,

    /// Bind a variable (repeatable; `++name` prepends, `name++` appends)
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Load bindings from a JSON or TOML file
    #[arg(long, value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Render without reading or writing the cache
    #[arg(long, conflicts_with = "cache")]
    pub no_cache: bool,

    /// Set caching from a flag (true/false, yes/no, on/off, 1/0)
    #[arg(long, value_name = "FLAG")]
    pub cache: Option<String>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show the cache entry for a template without rendering
    Status {
        /// Template path relative to the template directory
        template: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove every cache entry
    Clear,
}
