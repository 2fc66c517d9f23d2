//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// GridStats - driver statistics from motorsport race results
///
/// Aggregates a driver's career or season results into win, podium and
/// retirement rates, positional stats and a per-season breakdown. Give a
/// second driver to get a comparison and head-to-head record.
///
/// Examples:
///   gridstats --driver hamilton
///   gridstats --driver leclerc --compare sainz --season 2024
///   gridstats --driver norris --input 2024_results.json --format json
///   gridstats --driver alonso --dry-run
///   gridstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Driver id to report on (e.g. max_verstappen)
    #[arg(short, long, value_name = "ID", required_unless_present = "init_config")]
    pub driver: Option<String>,

    /// Second driver id to compare against
    ///
    /// Adds a side-by-side comparison and a head-to-head record.
    #[arg(long, value_name = "ID")]
    pub compare: Option<String>,

    /// Restrict results to one season (e.g. 2024 or current)
    #[arg(short, long, value_name = "SEASON")]
    pub season: Option<String>,

    /// Read results from a saved JSON file instead of the API
    ///
    /// Accepts an API response envelope or an array of records.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file for the report ("-" for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .gridstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the Ergast-compatible results API
    #[arg(long, value_name = "URL", env = "GRIDSTATS_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of most recent races used for form metrics
    #[arg(long, value_name = "COUNT")]
    pub recent_races: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the requests that would be made and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .gridstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension for reports in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The primary driver id (empty when not set; validate first).
    pub fn driver_id(&self) -> &str {
        self.driver.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        let driver = self.driver_id().trim();
        if driver.is_empty() {
            return Err("Driver id must not be empty".to_string());
        }

        if let Some(ref other) = self.compare {
            if other.trim().is_empty() {
                return Err("Comparison driver id must not be empty".to_string());
            }
            if other.trim() == driver {
                return Err("Cannot compare a driver with themselves".to_string());
            }
        }

        if let Some(ref season) = self.season {
            let is_year = !season.is_empty() && season.chars().all(|c| c.is_ascii_digit());
            if season != "current" && !is_year {
                return Err(format!(
                    "Season must be a year or 'current', got '{}'",
                    season
                ));
            }
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(recent) = self.recent_races {
            if recent == 0 {
                return Err("Recent races must be at least 1".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_by_default` comes from the config file; `--quiet` still wins.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
