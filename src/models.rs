//! Shared value types that cross module boundaries: the orchestrator's
//! per-seed work item and summary, trimmed to exactly the fields spec.md's
//! data model (§3) names for these two records.

use serde::{Deserialize, Serialize};

/// (url, html, depth) — the output of a successful fetch and the input to
/// the parser worker, per spec.md §3's "HTML work item".
#[derive(Debug, Clone)]
pub struct HtmlWorkItem {
    pub url: String,
    pub html: String,
    pub depth: u32,
}

/// Per-seed crawl summary logged by the orchestrator once a seed quiesces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlStats {
    pub seed: String,
    pub pages_fetched: usize,
    pub product_urls_found: usize,
}
