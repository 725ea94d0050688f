//! Text rendering of rankings and vocabularies for the terminal

use colored::Colorize;

use crate::keywords::Vocabulary;
use crate::ranker::{RankedResult, ScoredElement};

/// Top-N ranking as a numbered list
pub fn format_ranking(results: &[RankedResult], top_n: usize) -> String {
    if results.is_empty() {
        return "No element scored above the confidence threshold.\n".to_string();
    }

    let shown = results.len().min(top_n);
    let mut output = String::new();
    output.push_str(&format!(
        "{}\n",
        format!("Top {} of {} ranked selectors", shown, results.len()).bold()
    ));

    for (i, result) in results.iter().take(top_n).enumerate() {
        output.push_str(&format!("{:>3}. {}\n", i + 1, result.selector.cyan()));
        output.push_str(&format!(
            "     final {:.2} | base {:.2} | x{}\n",
            result.final_score, result.total_base_score, result.count
        ));
    }
    output
}

/// Per-element score breakdowns for one selector
pub fn format_explanation(selector: &str, elements: &[&ScoredElement]) -> String {
    let mut output = format!("{} ({} element(s))\n", selector.cyan(), elements.len());
    for (i, el) in elements.iter().enumerate() {
        let b = &el.breakdown;
        output.push_str(&format!(
            "  #{} <{}>  total {:.2} = attributes {:.2} + text {:.2} + structure {:.2}\n",
            i + 1,
            el.tag,
            b.total(),
            b.attributes,
            b.text,
            b.structure
        ));
        if !el.qualified {
            output.push_str(&format!("      {}\n", "at or below threshold, not ranked".dimmed()));
        }
    }
    output
}

/// Keyword table, heaviest first, learned entries marked
pub fn format_vocabulary(vocabulary: &Vocabulary) -> String {
    let mut keywords: Vec<_> = vocabulary.iter().collect();
    keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.word.cmp(&b.word)));

    let mut output = String::new();
    for keyword in keywords {
        let marker = if keyword.learned {
            " (learned)".dimmed().to_string()
        } else {
            String::new()
        };
        output.push_str(&format!("  {:<20} {:>6.1}{}\n", keyword.word, keyword.weight, marker));
    }
    output
}
