//! End-to-end tests for the selector ranking pipeline

use assetrank::config::Config;
use assetrank::document::Document;
use assetrank::error::RankError;
use assetrank::ranker::{AssetRanker, RankedResult};

// ============================================================================
// Sample HTML
// ============================================================================

const PRODUCT_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <title>Sneaker</title>
    <script type="application/ld+json">
    {
        "@context": "https://schema.org",
        "@type": "Product",
        "name": "Runner",
        "sku": "RN-1",
        "gtin13": "0001",
        "offers": {"@type": "Offer", "price": "120.00", "priceCurrency": "EUR"}
    }
    </script>
</head>
<body>
    <div class="ltr-1x2 product-card">
        <h1 itemprop="name">Runner</h1>
        <span data-testid="product-price" class="s-9 price">€120</span>
        <button id="add-to-bag" class="btn">Add to Bag</button>
    </div>
    <ul class="grid">
        <li class="product-card-item"><span class="price">€80</span></li>
        <li class="product-card-item"><span class="price">€80</span></li>
        <li class="product-card-item"><span class="price">€80</span></li>
    </ul>
</body>
</html>
"#;

fn find<'a>(results: &'a [RankedResult], selector: &str) -> &'a RankedResult {
    results
        .iter()
        .find(|r| r.selector == selector)
        .unwrap_or_else(|| panic!("selector {} not ranked", selector))
}

// ============================================================================
// Full pipeline
// ============================================================================

#[test]
fn test_product_page_ranking() {
    let results = AssetRanker::default().rank_html(PRODUCT_PAGE);

    let selectors: Vec<&str> = results.iter().map(|r| r.selector.as_str()).collect();
    assert_eq!(
        selectors,
        vec![
            "li.product-card-item",
            "span.price",
            "div.product-card",
            "button[id='add-to-bag']",
            "span[data-testid='product-price']",
            "ul.grid",
        ]
    );

    let cards = find(&results, "li.product-card-item");
    assert_eq!(cards.count, 3);
    assert_eq!(cards.total_base_score, 165.0);
    assert_eq!(cards.final_score, 243.73);

    let prices = find(&results, "span.price");
    assert_eq!(prices.count, 3);
    assert_eq!(prices.final_score, 199.41);

    // class 15 ("product") + currency 25 + call to action 30 + half of add/bag
    assert_eq!(find(&results, "div.product-card").total_base_score, 83.5);
}

#[test]
fn test_final_score_never_below_base() {
    let results = AssetRanker::default().rank_html(PRODUCT_PAGE);

    assert!(!results.is_empty());
    for r in &results {
        assert!(r.final_score >= r.total_base_score, "{:?}", r);
        assert!(r.count >= 1);
    }
}

#[test]
fn test_ranking_is_idempotent() {
    let ranker = AssetRanker::default();
    let document = Document::parse(PRODUCT_PAGE);

    let first = ranker.rank_document(&document);
    let second = ranker.rank_document(&document);
    assert_eq!(first, second);
}

#[test]
fn test_repetition_boost() {
    let cards = "<div class=\"price\"></div>".repeat(10);
    let html = format!("<html><body>{}</body></html>", cards);

    let results = AssetRanker::default().rank_html(&html);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].selector, "div.price");
    assert_eq!(results[0].count, 10);
    assert_eq!(results[0].total_base_score, 200.0);
    assert_eq!(results[0].final_score, 400.0);
}

#[test]
fn test_score_of_exactly_threshold_is_excluded() {
    // "product" scores exactly 15
    let results = AssetRanker::default().rank_html(r#"<p class="product"></p>"#);
    assert!(results.is_empty());
}

#[test]
fn test_no_candidates_gives_empty_list() {
    let results = AssetRanker::default().rank_html("<html><body><p>Hello</p></body></html>");
    assert!(results.is_empty());
}

// ============================================================================
// JSON-LD learning
// ============================================================================

#[test]
fn test_json_ld_keys_raise_scores() {
    let without = r#"<span class="gtin sale"></span>"#;
    let with = r#"
        <script type="application/ld+json">{"gtin13": "X"}</script>
        <span class="gtin sale"></span>
    "#;
    let ranker = AssetRanker::default();

    // "sale" only
    assert_eq!(find(&ranker.rank_html(without), "span.gtin.sale").total_base_score, 18.0);
    // "sale" + learned "gtin"
    assert_eq!(find(&ranker.rank_html(with), "span.gtin.sale").total_base_score, 28.0);
}

#[test]
fn test_json_ld_does_not_override_seed_weights() {
    let html = r#"
        <script type="application/ld+json">{"sku": "A-1"}</script>
        <span class="sku"></span>
    "#;

    let results = AssetRanker::default().rank_html(html);
    assert_eq!(find(&results, "span.sku").total_base_score, 25.0);
}

#[test]
fn test_malformed_json_ld_is_not_fatal() {
    let html = r#"
        <script type="application/ld+json">{ "broken": </script>
        <script type="application/ld+json"></script>
        <span data-sku="A-1" class="sku">€10</span>
    "#;

    let results = AssetRanker::default().rank_html(html);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].selector, "span[data-sku='A-1']");
}

#[test]
fn test_very_long_json_ld_key_is_harmless() {
    let html = format!(
        r#"<script type="application/ld+json">{{"{}": 1}}</script><span class="price sku"></span>"#,
        "a".repeat(600_000)
    );

    let results = AssetRanker::default().rank_html(&html);

    assert_eq!(find(&results, "span.price.sku").total_base_score, 45.0);
}

#[test]
fn test_many_json_ld_keys_are_capped() {
    // 40,000 distinct letter-only keys: "ka", "kb", ..., "kbaa", ...
    let keys: Vec<String> = (0..40_000usize)
        .map(|mut n| {
            let mut key = vec![b'k'];
            let mut digits = Vec::new();
            loop {
                digits.push(b'a' + (n % 26) as u8);
                n /= 26;
                if n == 0 {
                    break;
                }
            }
            key.extend(digits.iter().rev());
            String::from_utf8(key).unwrap()
        })
        .collect();
    let body: Vec<String> = keys.iter().map(|k| format!("\"{}\": 1", k)).collect();
    let html = format!(
        r#"<script type="application/ld+json">{{{}}}</script>{}"#,
        body.join(", "),
        r#"<span class="price"></span>"#.repeat(200)
    );
    let ranker = AssetRanker::default();
    let document = Document::parse(&html);

    let learned = ranker.learn(&document);
    assert_eq!(learned.report.discovered, 40_000);
    assert_eq!(learned.report.inserted, 500);
    assert_eq!(learned.report.dropped, 39_500);

    let results = ranker.rank_document(&document);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].selector, "span.price");
    assert_eq!(results[0].count, 200);
}

#[test]
fn test_learned_keyword_limit_from_config() {
    let config = Config {
        max_learned_keywords: 1,
        ..Default::default()
    };
    let ranker = AssetRanker::new(config).unwrap();
    let html = r#"
        <script type="application/ld+json">{"gtin": "1", "mpn": "2"}</script>
        <span class="gtin mpn sale"></span>
    "#;

    // Only "gtin" (first in sorted order) is learned: sale 18 + gtin 10
    let results = ranker.rank_html(html);
    assert_eq!(find(&results, "span.gtin.mpn.sale").total_base_score, 28.0);
}

// ============================================================================
// Selectors
// ============================================================================

#[test]
fn test_unsafe_identifiers_fall_back_to_classes() {
    let html = r#"
        <span id="123abc" class="price"></span>
        <span id="data id!" class="price"></span>
        <span id="9" class="s-only"> $5 </span>
    "#;

    let results = AssetRanker::default().rank_html(html);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].selector, "span.price");
    assert_eq!(results[0].count, 2);
    for r in &results {
        assert!(!r.selector.contains("123abc"));
        assert!(!r.selector.contains("data id!"));
    }
}

#[test]
fn test_blocklisted_classes_removed() {
    let results = AssetRanker::default().rank_html(r#"<div class="ltr-rtl product-card">€5</div>"#);
    assert_eq!(results[0].selector, "div.product-card");
}

// ============================================================================
// Configuration and input validation
// ============================================================================

#[test]
fn test_config_overrides() {
    let mut config = Config {
        class_blocklist: vec!["css-".to_string()],
        ..Default::default()
    };
    config.extra_keywords.insert("colorway".to_string(), 30.0);
    let ranker = AssetRanker::new(config).unwrap();

    let results = ranker.rank_html(r#"<div class="css-a1 colorway"></div>"#);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].selector, "div.colorway");
    assert_eq!(results[0].total_base_score, 30.0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = Config {
        max_json_ld_depth: 0,
        ..Default::default()
    };
    assert!(matches!(AssetRanker::new(config), Err(RankError::ConfigError(_))));

    let mut config = Config::default();
    config.extra_keywords.insert("buy now".to_string(), 5.0);
    assert!(matches!(AssetRanker::new(config), Err(RankError::ConfigError(_))));
}

#[test]
fn test_explain_lists_unqualified_elements() {
    let ranker = AssetRanker::default();
    let document = Document::parse(r#"<span class="product"></span>"#);

    assert!(ranker.rank_document(&document).is_empty());
    let explained = ranker.explain(&document, "span.product");
    assert_eq!(explained.len(), 1);
    assert!(!explained[0].qualified);
}

#[test]
fn test_non_utf8_input_is_rejected() {
    let err = AssetRanker::default()
        .rank_bytes(b"<html>\xff\xfe</html>")
        .unwrap_err();
    assert!(matches!(err, RankError::InvalidInput(_)));
}

#[test]
fn test_results_serialize_with_expected_fields() {
    let results = AssetRanker::default().rank_html(r#"<span id="price">$9</span>"#);
    let json = serde_json::to_value(&results).unwrap();

    let first = &json[0];
    assert_eq!(first["selector"], "span[id='price']");
    assert!(first["final_score"].is_number());
    assert!(first["total_base_score"].is_number());
    assert_eq!(first["count"], 1);
}
