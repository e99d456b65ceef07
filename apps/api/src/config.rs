use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{ensure, Context, Result};
use tracing::info;

use crate::matching::MatchConfig;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON file overriding the built-in match vocabulary and weights.
    pub match_config_path: Option<PathBuf>,
    /// Ranked jobs at or above this total are flagged for auto-apply.
    pub auto_apply_threshold: u32,
    pub max_batch_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let auto_apply_threshold: u32 = parse_or_default("AUTO_APPLY_THRESHOLD", 70)?;
        ensure!(
            auto_apply_threshold <= 100,
            "AUTO_APPLY_THRESHOLD must be between 0 and 100, got {auto_apply_threshold}"
        );
        let max_batch_size: usize = parse_or_default("MAX_BATCH_SIZE", 500)?;
        ensure!(max_batch_size > 0, "MAX_BATCH_SIZE must be positive");

        Ok(Config {
            port: parse_or_default("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            match_config_path: std::env::var("MATCH_CONFIG_PATH").ok().map(PathBuf::from),
            auto_apply_threshold,
            max_batch_size,
        })
    }

    /// Built-in vocabulary unless `MATCH_CONFIG_PATH` points at an override file.
    pub fn load_match_config(&self) -> Result<MatchConfig> {
        match &self.match_config_path {
            Some(path) => read_match_config(path),
            None => Ok(MatchConfig::default()),
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Missing keys in the file fall back to the built-in defaults.
fn read_match_config(path: &Path) -> Result<MatchConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read match config {}", path.display()))?;
    let config: MatchConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse match config {}", path.display()))?;
    info!("Loaded match config from {}", path.display());
    Ok(config)
}
