//! termsnap CLI
//!
//! Fetches today's terminology snapshots into an existing directory and
//! diffs them against yesterday's.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use termsnap::{
    error::Result,
    models::Config,
    pipeline::{self, RunReport},
    services::ResourceFetcher,
    storage::LocalStorage,
    utils::{http, url::normalize_endpoint},
};

/// termsnap - FHIR terminology snapshot and diff
#[derive(Parser, Debug)]
#[command(
    name = "termsnap",
    version,
    about = "Daily metadata snapshots and diffs of FHIR terminology resources"
)]
struct Cli {
    /// FHIR server endpoint base URL (e.g. https://tx.example.org/fhir)
    #[arg(value_parser = parse_endpoint)]
    endpoint: String,

    /// Existing directory that receives snapshots, views and diffs
    #[arg(value_parser = parse_out_dir)]
    out_dir: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_endpoint(raw: &str) -> std::result::Result<String, String> {
    normalize_endpoint(raw).map_err(|e| e.to_string())
}

fn parse_out_dir(raw: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("'{raw}' is not a directory"))
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let config = Config::load(path)?;
            log::info!("Loaded configuration from {}", path.display());
            config
        }
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

async fn run(cli: &Cli) -> Result<RunReport> {
    let config = load_config(cli.config.as_ref())?;

    let client = http::create_client(&config.client)?;
    let fetcher = ResourceFetcher::new(client, cli.endpoint.clone(), &config.client);
    let storage = LocalStorage::new(&cli.out_dir);
    log::info!("Writing to {}", storage.root().display());

    let today = Local::now().date_naive();
    pipeline::run_snapshot(&config, &fetcher, &storage, today).await
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap uses exit status 2 for usage errors; this tool uses 1.
            return if e.print().is_err() || e.exit_code() != 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.verbose);

    log::info!("termsnap starting...");

    match run(&cli).await {
        Ok(report) => {
            for t in &report.types {
                log::info!(
                    "{}: {} records{}",
                    t.resource_type,
                    t.record_count,
                    match &t.diff {
                        Some(d) if d.summary.has_changes() => format!(
                            ", {} changed since {}",
                            d.records.change_count(),
                            d.previous
                        ),
                        Some(d) => format!(", unchanged since {}", d.previous),
                        None => String::new(),
                    }
                );
            }
            log::info!(
                "Done! {} records, {} diff(s) for {}",
                report.record_count(),
                report.diff_count(),
                report.date
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Snapshot failed: {e}");
            ExitCode::FAILURE
        }
    }
}
