//! `CrawlConfig`: the CLI-driven configuration for one crawl run, with
//! environment-variable fallback for the numeric knobs.
//!
//! Grounded on the teacher's `Config::from_env` (env-var parsing with a
//! `thiserror`-based `ConfigError`), adapted so CLI flags take precedence
//! over the environment rather than being the only layer — this is a CLI
//! tool invoked once per run, not an always-env'd long-lived service.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::crawler::classifier;

const DEFAULT_MAX_DEPTH: u32 = 3;
const DEFAULT_CONCURRENCY: usize = 5;
const DEFAULT_OUTPUT: &str = "product_urls.csv";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_RENDERER_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seeds: Vec<String>,
    pub max_depth: u32,
    pub concurrency: usize,
    pub output: PathBuf,
    pub connect_timeout_secs: u64,
    /// Path to the Stage B renderer script. `None` disables the
    /// headless-browser fallback entirely (every fetch is Stage-A-only).
    pub renderer_script_path: Option<PathBuf>,
    pub renderer_timeout_secs: u64,
    /// Feature and URL-pattern weight overrides, merged on top of
    /// [`classifier::default_weights`].
    pub feature_weights: HashMap<String, f64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("at least one seed URL is required")]
    NoSeeds,
    #[error("failed to read weights file {path}: {source}")]
    WeightsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse weights file {path}: {source}")]
    WeightsFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw inputs gathered from CLI flags, before env-var fallback and weights
/// loading are applied.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub seeds: Vec<String>,
    pub max_depth: Option<u32>,
    pub concurrency: Option<usize>,
    pub output: Option<PathBuf>,
    pub weights_path: Option<PathBuf>,
    pub renderer_script_path: Option<PathBuf>,
}

impl CrawlConfig {
    /// Build a [`CrawlConfig`] from CLI overrides, falling back to
    /// `CRAWLER_MAX_DEPTH` / `CRAWLER_CONCURRENCY` / `CRAWLER_OUTPUT`
    /// environment variables, and finally to built-in defaults.
    pub fn from_cli(overrides: CliOverrides) -> Result<Self, ConfigError> {
        if overrides.seeds.is_empty() {
            return Err(ConfigError::NoSeeds);
        }

        let max_depth = match overrides.max_depth {
            Some(v) => v,
            None => env_or_default("CRAWLER_MAX_DEPTH", DEFAULT_MAX_DEPTH)?,
        };

        let concurrency = match overrides.concurrency {
            Some(v) => v,
            None => env_or_default("CRAWLER_CONCURRENCY", DEFAULT_CONCURRENCY)?,
        };

        let output = overrides.output.unwrap_or_else(|| {
            env::var("CRAWLER_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT))
        });

        let feature_weights = match &overrides.weights_path {
            Some(path) => load_weights(path)?,
            None => classifier::default_weights(),
        };

        Ok(Self {
            seeds: overrides.seeds,
            max_depth,
            concurrency,
            output,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            renderer_script_path: overrides.renderer_script_path,
            renderer_timeout_secs: DEFAULT_RENDERER_TIMEOUT_SECS,
            feature_weights,
        })
    }
}

fn env_or_default<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(var) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var, raw)),
        Err(_) => Ok(default),
    }
}

/// Load a JSON object of `{feature_name: weight}` overrides and merge them
/// on top of the classifier's defaults, per spec.md §6's "optional
/// overrides of `feature_weights` and `product_url_weights` mappings".
fn load_weights(path: &std::path::Path) -> Result<HashMap<String, f64>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::WeightsFileIo {
        path: path.display().to_string(),
        source,
    })?;
    let overrides: HashMap<String, f64> =
        serde_json::from_str(&raw).map_err(|source| ConfigError::WeightsFileParse {
            path: path.display().to_string(),
            source,
        })?;

    let mut weights = classifier::default_weights();
    weights.extend(overrides);
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_seeds_is_an_error() {
        let result = CrawlConfig::from_cli(CliOverrides::default());
        assert!(matches!(result, Err(ConfigError::NoSeeds)));
    }

    #[test]
    fn defaults_apply_when_nothing_overridden() {
        let config = CrawlConfig::from_cli(CliOverrides {
            seeds: vec!["https://shop.test".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(config.renderer_script_path.is_none());
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let config = CrawlConfig::from_cli(CliOverrides {
            seeds: vec!["https://shop.test".to_string()],
            max_depth: Some(1),
            concurrency: Some(2),
            output: Some(PathBuf::from("out.csv")),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.output, PathBuf::from("out.csv"));
    }

    #[test]
    fn weights_file_overrides_merge_onto_defaults() {
        let mut path = std::env::temp_dir();
        path.push("product-crawler-test-weights.json");
        std::fs::write(&path, r#"{"price_present": 5.0}"#).unwrap();

        let config = CrawlConfig::from_cli(CliOverrides {
            seeds: vec!["https://shop.test".to_string()],
            weights_path: Some(path.clone()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.feature_weights.get("price_present"), Some(&5.0));
        assert_eq!(
            config.feature_weights.get("exact_one_cta"),
            classifier::default_weights().get("exact_one_cta")
        );
        let _ = std::fs::remove_file(&path);
    }
}
