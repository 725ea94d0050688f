use colored::Colorize;
use std::path::Path;

use assetrank::config::Config;
use assetrank::document::Document;
use assetrank::error::Result;
use assetrank::ranker::AssetRanker;
use assetrank::report;

use crate::utils::read_input;

/// Print the keyword table in effect for a page
pub fn cmd_keywords(config: Config, input: &str, json: bool) -> Result<()> {
    let ranker = AssetRanker::new(config)?;
    let document = Document::from_bytes(&read_input(input)?)?;
    let learned = ranker.learn(&document);

    if json {
        let keywords: Vec<serde_json::Value> = learned
            .vocabulary
            .iter()
            .map(|k| {
                serde_json::json!({
                    "keyword": k.word,
                    "weight": k.weight,
                    "learned": k.learned,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&keywords)?);
        return Ok(());
    }

    let r = &learned.report;
    println!(
        "{} {} new keyword(s) from JSON-LD ({} discovered, {} script(s) skipped)\n",
        "Learned".bold(),
        r.inserted,
        r.discovered,
        r.skipped_scripts
    );
    print!("{}", report::format_vocabulary(&learned.vocabulary));
    Ok(())
}

/// Print the effective configuration and where it came from
pub fn cmd_config(config: &Config, explicit_path: Option<&Path>) -> Result<()> {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => Config::config_path()?,
    };
    let status = if path.exists() { "" } else { " (not found, using defaults)" };

    println!("{} {}{}\n", "Config:".bold(), path.display(), status.dimmed());
    print!("{}", config.to_toml()?);
    Ok(())
}
