//! GridStats - driver statistics for motorsport results
//!
//! A CLI tool that pulls race results from an Ergast-compatible API (or a
//! saved JSON file) and reports per-driver statistics, season breakdowns,
//! comparisons and head-to-head records.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, bad input, etc.)

mod analysis;
mod api;
mod cli;
mod config;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::{RaceResultRecord, Report, ReportMetadata};
use report::format::format_points;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is loaded before logging so its verbose setting applies
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));

    info!("GridStats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration from {}", config_source);

    if let Err(e) = run(args, config).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .gridstats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Fetch or load results, aggregate them and write the report.
async fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let driver_ids: Vec<&str> = std::iter::once(args.driver_id().trim())
        .chain(args.compare.as_deref().map(str::trim))
        .collect();

    if args.dry_run {
        handle_dry_run(&args, &config, &driver_ids);
        return Ok(());
    }

    let (records, source) = match args.input {
        Some(ref path) => {
            let mut records = api::load_results_file(path).await?;
            if let Some(ref season) = args.season {
                filter_season(&mut records, season);
            }
            (records, path.display().to_string())
        }
        None => {
            let records =
                fetch_results(&config, &driver_ids, args.season.as_deref(), !args.quiet).await?;
            (records, config.api.base_url.clone())
        }
    };

    if records.is_empty() {
        warn!("No results found; the report will be empty");
    }

    let metadata = ReportMetadata {
        source,
        generated_at: Utc::now(),
        season: args.season.clone(),
        records: records.len(),
        duration_seconds: 0.0,
    };

    let mut report = report::build_report(&records, &driver_ids, &config, metadata);
    report.metadata.duration_seconds = start_time.elapsed().as_secs_f64();

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    if config.general.output == "-" {
        println!("{}", output);
        return Ok(());
    }

    std::fs::write(&config.general.output, &output)
        .with_context(|| format!("Failed to write report to {}", config.general.output))?;

    if !args.quiet {
        print_summary(&report);
        println!("\n✅ Report saved to: {}", config.general.output);
    }

    Ok(())
}

/// Keep only the records of one season. `current` cannot be resolved
/// offline, so it leaves the records untouched.
fn filter_season(records: &mut Vec<RaceResultRecord>, season: &str) {
    if season == "current" {
        warn!("Season 'current' cannot be applied to an input file; using all records");
        return;
    }

    let before = records.len();
    records.retain(|r| r.season_label() == Some(season));
    debug!("Season filter {} kept {} of {} records", season, records.len(), before);
}

/// Fetch every requested driver's results concurrently.
async fn fetch_results(
    config: &Config,
    driver_ids: &[&str],
    season: Option<&str>,
    show_progress: bool,
) -> Result<Vec<RaceResultRecord>> {
    let client = api::JolpicaClient::new(api::ClientConfig::from(&config.api))?;

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching results for {}", driver_ids.join(", ")));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let fetched = futures::future::try_join_all(
        driver_ids
            .iter()
            .map(|id| client.driver_records(id, season)),
    )
    .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let records: Vec<RaceResultRecord> = fetched?.into_iter().flatten().collect();
    info!("Fetched {} results in total", records.len());
    Ok(records)
}

/// Handle --dry-run: print the requests that would be made, exit.
fn handle_dry_run(args: &Args, config: &Config, driver_ids: &[&str]) {
    println!("\n🔍 Dry run: no requests will be made.\n");

    if let Some(ref input) = args.input {
        println!("   Would read results from: {}", input.display());
    } else {
        let season = args.season.as_deref();
        for id in driver_ids {
            for endpoint in [
                api::JolpicaClient::results_endpoint(id, season),
                api::JolpicaClient::qualifying_endpoint(id, season),
            ] {
                println!(
                    "   GET {}{}?limit={}",
                    config.api.base_url.trim_end_matches('/'),
                    endpoint,
                    config.api.page_limit
                );
            }
        }
    }

    println!("   Would write report to: {}", config.general.output);
}

/// Print a short console summary of the report.
fn print_summary(report: &Report) {
    println!("\n📊 Summary:");
    for driver in &report.drivers {
        let stats = &driver.stats;
        println!(
            "   {}: {} races | {} wins | {} podiums | {} pts | {:.1}% win rate",
            stats.display_name(),
            stats.total_races,
            stats.total_wins,
            stats.total_podiums,
            format_points(stats.total_points),
            stats.win_rate
        );
    }

    if let Some(ref comparison) = report.comparison {
        let h2h = &comparison.head_to_head;
        println!(
            "   Advantage: {} | Head to head: {}-{}-{}",
            comparison.comparison.advantage, h2h.wins, h2h.losses, h2h.draws
        );
    }
    println!(
        "   Duration: {:.1}s",
        report.metadata.duration_seconds
    );
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems are reported on stderr and
/// the source is returned for logging later.
fn load_config(args: &Args) -> Result<(Config, String)> {
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, config_path.display().to_string()));
    }

    match Config::load_default() {
        Ok(Some(config)) => Ok((config, CONFIG_FILE_NAME.to_string())),
        Ok(None) => Ok((Config::default(), "defaults".to_string())),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}. Using defaults.", e);
            Ok((Config::default(), "defaults".to_string()))
        }
    }
}
