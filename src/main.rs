//! assetrank - rank stable selectors for e-commerce data on an HTML page

use clap::Parser;

use assetrank::cli::{Cli, Commands};
use assetrank::error::Result;

mod commands;
mod utils;

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("\n{}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = utils::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Rank { input, top, threshold, json } => {
            commands::cmd_rank(config, &input, top, threshold, json)
        }
        Commands::Explain { input, selector, json } => {
            commands::cmd_explain(config, &input, &selector, json)
        }
        Commands::Keywords { input, json } => commands::cmd_keywords(config, &input, json),
        Commands::Config => commands::cmd_config(&config, cli.config.as_deref()),
    }
}
