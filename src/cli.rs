use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assetrank")]
#[command(author, version, about = "Rank stable CSS selectors for e-commerce data on an HTML page", long_about = None)]
#[command(after_help = r#"Examples:
  assetrank rank product.html                       Top 25 selectors
  assetrank rank product.html --top 10 --json       Machine-readable output
  curl -s https://shop.example/p/1 | assetrank rank -
  assetrank explain product.html "span.price"       Why a selector scored
  assetrank keywords product.html                   Vocabulary after JSON-LD learning
"#)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank selectors for an HTML document
    #[command(after_help = r#"Examples:
  assetrank rank page.html
  assetrank rank page.html --threshold 40
  assetrank rank page.html --json | jq '.[0].selector'
"#)]
    Rank {
        /// HTML file to analyze, or - for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// Number of selectors to show (default from config, 25)
        #[arg(long, short = 'n')]
        top: Option<usize>,

        /// Override the confidence threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Output the full ranking as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the score breakdown of every element mapped to a selector
    Explain {
        /// HTML file to analyze, or - for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// Selector as printed by `assetrank rank`
        selector: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the keyword table after learning from the page's JSON-LD
    Keywords {
        /// HTML file to analyze, or - for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,
}
