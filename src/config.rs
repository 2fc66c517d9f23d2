//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.gridstats.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".gridstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Results API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Number of most recent races used for form metrics.
    #[serde(default = "default_recent_races")]
    pub recent_races: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
            recent_races: default_recent_races(),
        }
    }
}

const DEFAULT_OUTPUT_STEM: &str = "gridstats_report";

fn default_output() -> String {
    format!("{}.md", DEFAULT_OUTPUT_STEM)
}

fn default_recent_races() -> usize {
    5
}

/// Results API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Ergast-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Rows requested per page.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.jolpi.ca/ergast/f1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_limit() -> usize {
    100 // the API caps pages at 100 rows
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the per-season breakdown.
    #[serde(default = "default_true")]
    pub include_seasons: bool,

    /// Include the recent form section.
    #[serde(default = "default_true")]
    pub include_form: bool,

    /// Decimal places for percentages.
    #[serde(default = "default_percentage_decimals")]
    pub percentage_decimals: usize,

    /// Points available to a race winner, for points efficiency.
    #[serde(default = "default_max_points_per_race")]
    pub max_points_per_race: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_seasons: true,
            include_form: true,
            percentage_decimals: default_percentage_decimals(),
            max_points_per_race: default_max_points_per_race(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_percentage_decimals() -> usize {
    1
}

fn default_max_points_per_race() -> f64 {
    25.0
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from `dir/.gridstats.toml`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(recent) = args.recent_races {
            self.general.recent_races = recent;
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        } else if self.general.output == default_output() {
            self.general.output = format!("{}.{}", DEFAULT_OUTPUT_STEM, args.format.extension());
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
