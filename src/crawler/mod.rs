//! Crawl Orchestrator: wires the frontier, fetcher, renderer, extractor, and
//! output sink into one seed's worker pool.
//!
//! The worker-pool shape (`JoinSet` of fetcher tasks racing a single parser
//! task over a channel, draining on quiescence) is grounded on the teacher's
//! `jobs/mod.rs::run_crawl_job` `JoinSet`/`tokio::select!` pattern, adapted
//! to the original's `parser_worker`/`fetcher_worker`/`crawl_and_collect`
//! shape (sentinel-terminated html queue, gather-then-join shutdown) rather
//! than the teacher's single combined fetch+parse task.

pub mod classifier;
pub mod extractor;
pub mod fetcher;
pub mod frontier;
pub mod patterns;
pub mod renderer;
pub mod tracker;
pub mod url_analyzer;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::models::{CrawlStats, HtmlWorkItem};
use crate::output::Output;
use fetcher::{FetchError, Fetcher};
use frontier::Frontier;
use renderer::Renderer;
use tracker::WorkTracker;

/// Crawl a single seed to quiescence: fetch, classify, and extract links
/// breadth-first (by priority) up to `max_depth`, writing discovered product
/// URLs to `output` as they're found.
pub async fn crawl_seed(
    seed: &str,
    max_depth: u32,
    concurrency: usize,
    fetcher: Fetcher,
    renderer: Option<Renderer>,
    output: Arc<Output>,
    weights: Arc<HashMap<String, f64>>,
) -> CrawlStats {
    let frontier = Frontier::new(&[seed.to_string()], max_depth);
    let tracker = WorkTracker::new();
    tracker.add(frontier.pending_count().await as i64).await;

    let (tx, mut rx) = mpsc::channel::<HtmlWorkItem>(concurrency.max(1) * 2);
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let pages_fetched = Arc::new(AtomicUsize::new(0));
    let product_urls_found = Arc::new(AtomicUsize::new(0));

    let mut fetcher_workers: JoinSet<()> = JoinSet::new();
    for _ in 0..concurrency.max(1) {
        let frontier = frontier.clone();
        let tracker = tracker.clone();
        let tx = tx.clone();
        let fetcher = fetcher.clone();
        let renderer = renderer.clone();
        let semaphore = semaphore.clone();
        let pages_fetched = pages_fetched.clone();

        fetcher_workers.spawn(async move {
            loop {
                let Some((url, depth)) = frontier.next().await else {
                    break;
                };

                let _permit = semaphore.acquire().await.expect("semaphore never closes");
                match fetch_with_fallback(&fetcher, renderer.as_ref(), &url).await {
                    Some(html) => {
                        pages_fetched.fetch_add(1, Ordering::Relaxed);
                        if tx.send(HtmlWorkItem { url, html, depth }).await.is_err() {
                            tracker.done(1).await;
                            break;
                        }
                    }
                    None => {
                        tracing::warn!(url = %url, "fetch failed after all fallbacks");
                        tracker.done(1).await;
                    }
                }
            }
        });
    }
    drop(tx);

    let seed_host = frontier.allowed_host().unwrap_or("").to_string();
    let parser_frontier = frontier.clone();
    let parser_tracker = tracker.clone();
    let parser_output = output.clone();
    let parser_found = product_urls_found.clone();
    let parser_handle = tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            let extracted = extractor::extract(&item.html, &item.url, &weights);

            if extracted.verdict.is_product {
                parser_found.fetch_add(1, Ordering::Relaxed);
                if let Err(err) = parser_output.write_row(&seed_host, &item.url).await {
                    tracing::warn!(error = %err, "failed to write product URL row");
                }
            }
            tracing::debug!(
                url = %item.url,
                is_product = extracted.verdict.is_product,
                confidence = extracted.verdict.confidence,
                reasons = ?extracted.verdict.explanation,
                "classified page"
            );

            let added = parser_frontier
                .add_discovered(&extracted.links, item.depth + 1)
                .await;
            parser_tracker.add(added as i64).await;
            parser_tracker.done(1).await;
        }
    });

    tracker.wait_until_done().await;
    frontier.deactivate().await;

    while fetcher_workers.join_next().await.is_some() {}
    let _ = parser_handle.await;

    CrawlStats {
        seed: seed.to_string(),
        pages_fetched: pages_fetched.load(Ordering::Relaxed),
        product_urls_found: product_urls_found.load(Ordering::Relaxed),
    }
}

/// Fetch `url` via Stage A; fall back to `renderer` when Stage A fails,
/// returns a non-200 status, or returns an empty body.
async fn fetch_with_fallback(
    fetcher: &Fetcher,
    renderer: Option<&Renderer>,
    url: &str,
) -> Option<String> {
    let stage_a = fetcher.fetch(url).await;

    if let Err(FetchError::NonHtmlContent) = &stage_a {
        // spec.md §7: non-HTML content is a fetch-failure outright — not
        // retried (already handled inside `Fetcher::fetch`) and not
        // falled back to the renderer.
        tracing::debug!(url = %url, "stage A returned non-HTML content, skipping");
        return None;
    }

    let needs_fallback = match &stage_a {
        Ok(result) => result.status_code != 200 || result.body.trim().is_empty(),
        Err(_) => true,
    };

    if !needs_fallback {
        return stage_a.ok().map(|r| r.body);
    }

    if let Ok(result) = &stage_a {
        tracing::debug!(url = %url, status = result.status_code, "stage A insufficient, falling back to renderer");
    }

    let renderer = renderer?;
    match renderer.render(url).await {
        Ok(html) if !html.trim().is_empty() => Some(html),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "renderer fallback failed");
            None
        }
    }
}
