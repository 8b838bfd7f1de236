//! Fetcher Stage B: headless-browser fallback fetch.
//!
//! Invokes an external Node/Puppeteer-style script as a subprocess and reads
//! back the rendered HTML as JSON on stdout. The subprocess+semaphore+timeout
//! shape is grounded on the teacher's `renderer::JsRenderer`, adapted from
//! "return discovered links" to "return rendered HTML" per the original's
//! `puppeteer_fetcher.py`/`fetch_with_browser.py`.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("renderer process failed: {0}")]
    ProcessError(String),
    #[error("renderer timed out after {0}s")]
    Timeout(u64),
    #[error("failed to parse renderer JSON output: {0}")]
    ParseError(String),
    #[error("renderer script reported error: {0}")]
    ScriptError(String),
}

#[derive(Debug, serde::Deserialize)]
struct RenderOutput {
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Headless-browser page renderer, gated by a semaphore shared with Stage A
/// so the two stages ride the same `concurrent_fetchers` budget rather than
/// a second independent cap.
#[derive(Clone)]
pub struct Renderer {
    semaphore: Arc<Semaphore>,
    timeout_secs: u64,
    script_path: String,
}

impl Renderer {
    /// `semaphore` is the same one the orchestrator uses to bound Stage A
    /// fetches. `timeout_secs` bounds both page-load and DOM-ready waits
    /// inside the subprocess; the default script waits up to 20s for load
    /// and 15s for DOM readiness internally.
    pub fn new(semaphore: Arc<Semaphore>, timeout_secs: u64, script_path: String) -> Self {
        Self {
            semaphore,
            timeout_secs,
            script_path,
        }
    }

    /// Render `url` via a headless browser and return the resulting HTML.
    pub async fn render(&self, url: &str) -> Result<String, RendererError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| RendererError::ProcessError(e.to_string()))?;

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            tokio::process::Command::new("node")
                .arg(&self.script_path)
                .arg(url)
                .output(),
        )
        .await
        .map_err(|_| RendererError::Timeout(self.timeout_secs))?
        .map_err(|e| RendererError::ProcessError(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        let parsed: RenderOutput = serde_json::from_str(&stdout)
            .map_err(|e| RendererError::ParseError(format!("{e}: {stdout}")))?;

        if let Some(err) = parsed.error {
            return Err(RendererError::ScriptError(err));
        }

        parsed
            .html
            .ok_or_else(|| RendererError::ParseError("no html field in renderer output".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_output() {
        let json = r#"{"html":"<html><body>ok</body></html>"}"#;
        let parsed: RenderOutput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.html.unwrap(), "<html><body>ok</body></html>");
        assert!(parsed.error.is_none());
    }

    #[test]
    fn parses_error_output() {
        let json = r#"{"error":"Navigation timeout"}"#;
        let parsed: RenderOutput = serde_json::from_str(json).unwrap();
        assert!(parsed.html.is_none());
        assert_eq!(parsed.error.unwrap(), "Navigation timeout");
    }

    #[test]
    fn parses_empty_object_as_no_html() {
        let json = "{}";
        let parsed: RenderOutput = serde_json::from_str(json).unwrap();
        assert!(parsed.html.is_none());
        assert!(parsed.error.is_none());
    }

    #[test]
    fn rejects_invalid_json() {
        let json = "not json at all";
        let result = serde_json::from_str::<RenderOutput>(json);
        assert!(result.is_err());
    }
}
