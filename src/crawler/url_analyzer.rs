//! URL Analyzer: pure, deterministic predicates over a URL string.
//!
//! Neither [`classify_url`] nor [`is_dead_end`] touches the network or any
//! shared state — both operate purely on the string form of the URL, so they
//! can be called from the frontier's priority function and from the
//! extractor's link filter without synchronization.

use std::sync::OnceLock;

use regex::Regex;

use super::patterns::{DEAD_END_EXTENSIONS, DEAD_END_PATTERNS, PRODUCT_URL_PATTERNS};

/// Verdict returned by [`classify_url`].
#[derive(Debug, Clone, PartialEq)]
pub struct UrlVerdict {
    pub is_product: bool,
    pub score: f64,
    pub reasons: Vec<String>,
}

fn product_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PRODUCT_URL_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("product URL pattern must compile"))
            .collect()
    })
}

fn dead_end_patterns() -> &'static [(&'static str, Vec<Regex>)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Vec<Regex>)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DEAD_END_PATTERNS
            .iter()
            .map(|(category, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("dead-end pattern must compile"))
                    .collect();
                (*category, compiled)
            })
            .collect()
    })
}

fn extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternation = DEAD_END_EXTENSIONS.join("|");
        Regex::new(&format!(r"(?i)\.({alternation})$")).expect("extension pattern must compile")
    })
}

fn share_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/(share|social|follow)").unwrap())
}

fn newsletter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/(email|newsletter|subscribe)").unwrap())
}

fn download_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/(download|file|attachment|document)").unwrap())
}

/// Decide whether `url`'s path puts it past the point of being a plausible
/// route to a product page (login walls, legal pages, admin panels, media
/// assets, ...).
pub fn is_dead_end(url: &str) -> bool {
    if url.trim().is_empty() {
        return true;
    }

    let lower = url.to_lowercase();
    let path = path_of(&lower);

    if extension_pattern().is_match(path) {
        return true;
    }

    for (_, patterns) in dead_end_patterns() {
        for pattern in patterns {
            if pattern.is_match(path) || pattern.is_match(&lower) {
                return true;
            }
        }
    }

    share_pattern().is_match(path) || newsletter_pattern().is_match(path) || download_pattern().is_match(path)
}

/// Classify a URL as a product page or not, purely from its string form.
pub fn classify_url(url: &str) -> UrlVerdict {
    if url.trim().is_empty() {
        return UrlVerdict {
            is_product: false,
            score: -3.0,
            reasons: vec!["invalid".to_string()],
        };
    }

    let lower = url.to_lowercase();

    if is_dead_end(&lower) {
        return UrlVerdict {
            is_product: false,
            score: -2.0,
            reasons: vec!["dead-end".to_string()],
        };
    }

    let path = path_of(&lower);
    for (pattern_str, pattern) in PRODUCT_URL_PATTERNS.iter().zip(product_patterns()) {
        if pattern.is_match(path) {
            return UrlVerdict {
                is_product: true,
                score: 1.0,
                reasons: vec![pattern_str.to_string()],
            };
        }
    }

    UrlVerdict {
        is_product: false,
        score: 0.0,
        reasons: vec![],
    }
}

/// Extract the path (plus anything after it) from a lowercased URL string
/// without pulling in a full `Url::parse`, since `classify_url`/`is_dead_end`
/// must tolerate malformed URLs that wouldn't parse at all.
fn path_of(url: &str) -> &str {
    let after_scheme = url
        .find("://")
        .map(|i| &url[i + 3..])
        .unwrap_or(url);
    match after_scheme.find('/') {
        Some(i) => &after_scheme[i..],
        None => "",
    }
}
