use assetrank::config::Config;
use assetrank::document::Document;
use assetrank::error::{RankError, Result};
use assetrank::ranker::{AssetRanker, ScoredElement};
use assetrank::report;

use crate::utils::read_input;

/// Rank selectors and print the top N (or everything as JSON)
pub fn cmd_rank(
    mut config: Config,
    input: &str,
    top: Option<usize>,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    if let Some(threshold) = threshold {
        config.confidence_threshold = threshold;
    }
    let top_n = top.unwrap_or(config.report_top_n);
    let ranker = AssetRanker::new(config)?;

    let bytes = read_input(input)?;
    let results = ranker.rank_bytes(&bytes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", report::format_ranking(&results, top_n));
    }
    Ok(())
}

/// Print how each element behind a selector earned its score
pub fn cmd_explain(config: Config, input: &str, selector: &str, json: bool) -> Result<()> {
    let ranker = AssetRanker::new(config)?;
    let document = Document::from_bytes(&read_input(input)?)?;

    let scored = ranker.explain(&document, selector);
    let matching: Vec<&ScoredElement> = scored.iter().collect();

    if matching.is_empty() {
        return Err(RankError::SelectorNotFound(selector.to_string()));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&matching)?);
    } else {
        print!("{}", report::format_explanation(selector, &matching));
    }
    Ok(())
}
