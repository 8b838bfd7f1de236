//! HTML Extractor: parses a fetched page, classifies it, and resolves the
//! set of child links worth handing back to the frontier.
//!
//! Link discovery/resolution is grounded on the teacher's
//! `parser.rs::extract_links` (host-scoped `Url::join` resolution); dead-end
//! filtering delegates to [`super::url_analyzer::is_dead_end`].

use scraper::{Html, Selector};
use url::Url;

use super::classifier::{self, ClassificationVerdict};
use super::frontier::normalize_url;
use super::url_analyzer::is_dead_end;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Outcome of extracting a single fetched page.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub verdict: ClassificationVerdict,
    /// Same-host, non-dead-end, normalized, deduplicated child links.
    pub links: Vec<String>,
}

fn link_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("a[href]").unwrap())
}

/// Parse `html` (fetched from `url`), classify it, and extract the child
/// links that are worth enqueueing: same scheme (http/s), same host as
/// `url`, not a dead end, normalized, and deduplicated.
pub fn extract(html: &str, url: &str, weights: &HashMap<String, f64>) -> ExtractedPage {
    let verdict = classifier::classify(html, url, weights);

    let document = Html::parse_document(html);
    let base = Url::parse(url).ok();
    let base_host = base.as_ref().and_then(|u| u.host_str().map(|h| h.to_lowercase()));

    let mut seen = std::collections::HashSet::new();
    let mut links = Vec::new();

    for el in document.select(link_selector()) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };

        let resolved = match &base {
            Some(base) => base.join(href).ok(),
            None => Url::parse(href).ok(),
        };
        let Some(resolved) = resolved else {
            continue;
        };

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }

        let link_host = resolved.host_str().map(|h| h.to_lowercase());
        if link_host != base_host {
            continue;
        }

        let Some(normalized) = normalize_url(resolved.as_str()) else {
            continue;
        };

        if is_dead_end(&normalized) {
            continue;
        }

        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    ExtractedPage { verdict, links }
}
