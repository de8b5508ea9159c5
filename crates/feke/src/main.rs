mod cli;
mod commands;
mod context;
mod output;
mod vars;

use clap::Parser;
use cli::{CacheCommands, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.globals.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Render(args) => commands::render::run(args, &cli.globals),
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status { template, json } => {
                commands::cache::status(&template, json, &cli.globals)
            }
            CacheCommands::Clear => commands::cache::clear(&cli.globals),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
