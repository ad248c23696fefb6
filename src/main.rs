//! CLI entry point for the CGPA rater.
//!
//! Scrapes a published results page (saved file, CSV dump or live URL),
//! stores the per-semester aggregation as a snapshot, and renders overview,
//! statistics, projections, summaries, reports and CSV exports from it.

use anyhow::{Context, Result};
use cgpa_rater::analyzers::session::Session;
use cgpa_rater::config::{Config, Settings};
use cgpa_rater::infra::store::{FileStore, S3Store, SnapshotStore, load_settings};
use cgpa_rater::obfuscate::Obfuscator;
use cgpa_rater::output;
use cgpa_rater::services::results_source::{
    CsvRowSource, HtmlFileSource, HtmlUrlSource, RowSource,
};
use cgpa_rater::stats::ResultsStats;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cgpa_rater")]
#[command(about = "Semester and cumulative GPA from a published results page", long_about = None)]
struct Cli {
    /// Directory of the local snapshot store (overrides CGPA_STORE_DIR)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Keep snapshots in this S3 bucket instead of the local store
    #[arg(long, global = true)]
    s3_bucket: Option<String>,

    /// Key prefix inside the S3 bucket
    #[arg(long, global = true, default_value = "cgpa")]
    s3_prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the results page, store the snapshot and print the overview
    Scrape {
        /// Saved results page, CSV dump of the table, or URL of the live page
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Treat the file as CSV rows even without a .csv extension
        #[arg(long, default_value_t = false)]
        csv: bool,

        /// Accept a URL that does not look like the results page
        #[arg(long, default_value_t = false)]
        allow_any_page: bool,
    },
    /// Show the stored results per semester
    Show {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Average, trend, best and worst semester, credits per semester
    Stats {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// GPA needed over the remaining credits to reach a target CGPA
    Project {
        /// Target CGPA
        #[arg(short, long)]
        target: f64,

        /// Credits still to be taken
        #[arg(short, long)]
        remaining: f64,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print a short summary for pasting elsewhere
    Summary,
    /// Write the full plain-text report
    Report {
        #[arg(short, long, default_value = "cgpa_report.txt")]
        out: PathBuf,
    },
    /// Export every course as CSV
    Export {
        #[arg(short, long, default_value = "courses.csv")]
        out: PathBuf,
    },
    /// Show or change persisted settings
    Settings {
        /// Store snapshots obfuscated
        #[arg(long, value_enum)]
        obfuscate: Option<Toggle>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/cgpa_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cgpa_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let store = open_store(&cli, &config).await;
    let obfuscator = Obfuscator::new(&config.obfuscation_key)?;
    let settings = load_settings(store.as_ref())
        .await
        .context("failed to load settings")?;

    // A damaged snapshot must not block the scrape that replaces it.
    let session = Session::new(store, obfuscator, settings);
    if let Err(e) = session.load_initial().await {
        warn!(error = %e, "Stored results could not be loaded");
    }

    match cli.command {
        Commands::Scrape {
            source,
            csv,
            allow_any_page,
        } => {
            let source = row_source(&source, csv, allow_any_page, &config)?;
            let snapshot = session.reload(source.as_ref()).await?;

            if snapshot.terms.is_empty() {
                warn!("No course rows found; is this the published results page?");
            }
            let metrics = session.metrics().await?;
            print!("{}", output::render_overview(&metrics));
        }
        Commands::Show { json } => {
            let results = session.results().await?;
            if json {
                println!("{}", output::to_json(&results)?);
            } else {
                let metrics = session.metrics().await?;
                print!("{}", output::render_overview(&metrics));
                println!();
                print!("{}", output::render_terms(&results));
            }
        }
        Commands::Stats { json } => {
            let results = session.results().await?;
            let stats = ResultsStats::from_results(&results);
            if json {
                println!("{}", output::to_json(&stats)?);
            } else {
                print!("{}", output::render_stats(&stats));
            }
        }
        Commands::Project {
            target,
            remaining,
            json,
        } => {
            let projection = session.project(target, remaining).await?;
            if json {
                println!("{}", output::to_json(&projection)?);
            } else {
                print!("{}", output::render_projection(&projection));
            }
        }
        Commands::Summary => {
            let results = session.results().await?;
            let metrics = session.metrics().await?;
            print!("{}", output::summary_text(&results, &metrics));
        }
        Commands::Report { out } => {
            let results = session.results().await?;
            let metrics = session.metrics().await?;
            output::write_report(&out, &results, &metrics)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { out } => {
            let results = session.results().await?;
            let count = output::write_courses_csv(&out, &results)?;
            println!("Exported {count} courses to {}.", out.display());
        }
        Commands::Settings { obfuscate } => {
            if let Some(toggle) = obfuscate {
                let updated = Settings {
                    obfuscate: matches!(toggle, Toggle::On),
                };
                session.update_settings(updated).await?;
            }
            let settings = session.settings().await;
            println!("obfuscate: {}", if settings.obfuscate { "on" } else { "off" });
        }
    }

    Ok(())
}

/// S3 when a bucket is given, otherwise the local file store.
async fn open_store(cli: &Cli, config: &Config) -> Arc<dyn SnapshotStore> {
    match &cli.s3_bucket {
        Some(bucket) => {
            let aws = aws_config::load_from_env().await;
            info!(bucket = %bucket, prefix = %cli.s3_prefix, "Using S3 snapshot store");
            Arc::new(S3Store::new(&aws, bucket, &cli.s3_prefix))
        }
        None => {
            let dir = cli.store_dir.clone().unwrap_or_else(|| config.store_dir.clone());
            info!(dir = %dir.display(), "Using local snapshot store");
            Arc::new(FileStore::new(dir))
        }
    }
}

/// Picks the row source from the argument: URL, CSV dump, or saved HTML page.
fn row_source(
    source: &str,
    force_csv: bool,
    allow_any_page: bool,
    config: &Config,
) -> Result<Box<dyn RowSource>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return Ok(Box::new(HtmlUrlSource::new(
            source,
            config.session_cookie.as_deref(),
            allow_any_page,
        )?));
    }

    let path = PathBuf::from(source);
    let is_csv = force_csv
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(Box::new(CsvRowSource { path }))
    } else {
        Ok(Box::new(HtmlFileSource { path }))
    }
}
