//! Page Classifier: scores a parsed DOM for "is this a product page" and
//! returns a confidence-weighted verdict.
//!
//! The feature set mirrors the original analyzer's DOM checks; script/style
//! subtrees are excluded from text extraction the same way the teacher's
//! `parser.rs::collect_text_excluding` does it.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::url_analyzer::classify_url;

/// Result of classifying a parsed page.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationVerdict {
    pub is_product: bool,
    pub confidence: f64,
    pub score: f64,
    pub explanation: Vec<String>,
}

/// Default per-feature weights, matching the original's
/// `DEFAULT_FEATURE_WEIGHTS` with the spec's supplemented signals folded in.
pub fn default_weights() -> HashMap<String, f64> {
    [
        ("price_present", 1.0),
        ("spec_section", 1.0),
        ("semantic_schema", 1.0),
        ("related_products", 1.0),
        ("single_main_image", 1.0),
        ("exact_one_cta", 2.0),
        ("url_product_pattern", 2.0),
        ("too_many_images", -1.0),
        ("too_many_prices", -1.0),
        ("no_inputs_or_forms", -1.0),
        ("no_price_at_all", -1.0),
        ("multiple_cta", -1.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

const CONFIDENCE_THRESHOLD: f64 = 0.8;

fn price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(₹|\$|€)\s?\d{2,}").unwrap())
}

fn cta_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(add to cart|buy now|select size|select color)").unwrap()
    })
}

fn spec_section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(product details|specifications|select size|add to wishlist|know your product)").unwrap()
    })
}

fn related_products_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(similar products|you may also like|recommended)").unwrap()
    })
}

fn body_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("body").unwrap())
}

fn img_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("img").unwrap())
}

fn form_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("form, input").unwrap())
}

fn itemtype_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("[itemtype]").unwrap())
}

fn collect_text_excluding(node: &ElementRef, out: &mut String) {
    for child in node.children() {
        if let Some(text) = child.value().as_text() {
            out.push(' ');
            out.push_str(text);
        } else if let Some(el) = ElementRef::wrap(child) {
            let tag = el.value().name();
            if tag != "script" && tag != "style" {
                collect_text_excluding(&el, out);
            }
        }
    }
}

fn page_text(document: &Html) -> String {
    let mut text = String::new();
    if let Some(body) = document.select(body_selector()).next() {
        collect_text_excluding(&body, &mut text);
    }
    text
}

/// Classify a parsed HTML document as a product page or not.
///
/// `url` feeds the `url_product_pattern` feature via [`classify_url`];
/// `weights` overrides [`default_weights`] entries it contains.
pub fn classify(html: &str, url: &str, weights: &HashMap<String, f64>) -> ClassificationVerdict {
    let document = Html::parse_document(html);
    let text = page_text(&document);

    let price_matches = price_pattern().find_iter(&text).count();
    let cta_matches = cta_pattern().find_iter(&text).count();
    let has_spec_section = spec_section_pattern().is_match(&text);
    let has_related_products = related_products_pattern().is_match(&text);
    let has_form = document.select(form_selector()).next().is_some();
    let has_semantic_schema = document
        .select(itemtype_selector())
        .any(|el| el.value().attr("itemtype").is_some_and(|v| v.contains("Product")));

    let images: Vec<ElementRef> = document.select(img_selector()).collect();
    let has_single_main_image = images.iter().any(|img| {
        let attrs = [img.value().attr("alt"), img.value().attr("src")];
        attrs.iter().flatten().any(|v| {
            let lower = v.to_lowercase();
            lower.contains("product") || lower.contains("zoom") || lower.contains("main")
        })
    });
    let too_many_images = images.len() > 10;

    let url_verdict = classify_url(url);

    let mut score = 0.0;
    let mut reasons = Vec::new();

    let w = |name: &str| *weights.get(name).unwrap_or(&0.0);

    if price_matches == 0 {
        score += w("no_price_at_all");
        reasons.push("no_price_at_all".to_string());
    } else {
        score += w("price_present");
        reasons.push("price_present".to_string());
        if price_matches > 5 {
            score += w("too_many_prices");
            reasons.push("too_many_prices".to_string());
        }
    }

    if cta_matches == 1 {
        score += w("exact_one_cta");
        reasons.push("exact_one_cta".to_string());
    } else {
        score += w("multiple_cta");
        reasons.push("multiple_cta".to_string());
    }

    if has_spec_section {
        score += w("spec_section");
        reasons.push("spec_section".to_string());
    }
    if has_semantic_schema {
        score += w("semantic_schema");
        reasons.push("semantic_schema".to_string());
    }
    if has_related_products {
        score += w("related_products");
        reasons.push("related_products".to_string());
    }
    if has_single_main_image {
        score += w("single_main_image");
        reasons.push("single_main_image".to_string());
    }
    if too_many_images {
        score += w("too_many_images");
        reasons.push("too_many_images".to_string());
    }
    if !has_form {
        score += w("no_inputs_or_forms");
        reasons.push("no_inputs_or_forms".to_string());
    }
    if url_verdict.is_product {
        score += w("url_product_pattern");
        reasons.push("url_product_pattern".to_string());
    }

    // Short-circuit: without either a price signal or exactly one CTA, this
    // is never classified as a product page regardless of accumulated score.
    if price_matches == 0 && cta_matches != 1 {
        return ClassificationVerdict {
            is_product: false,
            confidence: sigmoid(score),
            score,
            explanation: reasons,
        };
    }

    let confidence = sigmoid(score);
    ClassificationVerdict {
        is_product: confidence >= CONFIDENCE_THRESHOLD,
        confidence,
        score,
        explanation: reasons,
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> HashMap<String, f64> {
        default_weights()
    }

    #[test]
    fn clear_product_page_is_classified_as_product() {
        let html = r#"<html><body>
            <h1>Blue Sneakers</h1>
            <div class="price">$49.99</div>
            <div itemtype="https://schema.org/Product">
                <img src="/img/product-main.jpg" alt="product main image">
                <button>Add to Cart</button>
                <div class="specifications">Material: canvas. Size: 9.</div>
            </div>
        </body></html>"#;
        let verdict = classify(html, "https://shop.test/products/blue-sneakers", &weights());
        assert!(verdict.is_product);
        assert!(verdict.confidence >= 0.8);
        assert!(verdict.explanation.contains(&"price_present".to_string()));
        assert!(verdict.explanation.contains(&"exact_one_cta".to_string()));
    }

    #[test]
    fn listing_page_with_no_price_and_no_cta_is_rejected() {
        let html = r#"<html><body>
            <h1>All Shoes</h1>
            <ul><li>Sneakers</li><li>Boots</li><li>Sandals</li></ul>
        </body></html>"#;
        let verdict = classify(html, "https://shop.test/category/shoes", &weights());
        assert!(!verdict.is_product);
    }

    #[test]
    fn multiple_ctas_count_against_product_verdict() {
        let html = r#"<html><body>
            <div class="price">$10</div>
            <button>Add to Cart</button>
            <button>Buy Now</button>
            <button>Purchase</button>
        </body></html>"#;
        let verdict = classify(html, "https://shop.test/item/1", &weights());
        assert!(verdict.explanation.contains(&"multiple_cta".to_string()));
    }

    #[test]
    fn script_and_style_text_is_excluded_from_price_detection() {
        let html = r#"<html><body>
            <script>var price = "$999999";</script>
            <style>.price::before { content: "$50"; }</style>
            <p>No visible price here.</p>
        </body></html>"#;
        let verdict = classify(html, "https://shop.test/x", &weights());
        assert!(verdict
            .explanation
            .contains(&"no_price_at_all".to_string()));
    }

    #[test]
    fn too_many_images_is_flagged() {
        let imgs: String = (0..12).map(|i| format!("<img src=\"/{i}.jpg\">")).collect();
        let html = format!(
            "<html><body><div class=\"price\">$20</div><button>Add to Cart</button>{imgs}</body></html>"
        );
        let verdict = classify(&html, "https://shop.test/p/1", &weights());
        assert!(verdict
            .explanation
            .contains(&"too_many_images".to_string()));
    }

    #[test]
    fn form_presence_suppresses_no_inputs_signal() {
        let html = r#"<html><body>
            <div class="price">$20</div>
            <button>Add to Cart</button>
            <form><input type="text"></form>
        </body></html>"#;
        let verdict = classify(html, "https://shop.test/p/1", &weights());
        assert!(!verdict
            .explanation
            .contains(&"no_inputs_or_forms".to_string()));
    }
}
