//! CLI entry point for the site rater.
//!
//! Rates monitored websites from their Lighthouse audits and text analysis,
//! writes per-site reports plus a blended leaderboard, and optionally
//! publishes them to S3.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use site_rater::analyzers::analyzer::{attach_media, rate_from_disk};
use site_rater::analyzers::ranking::Metric;
use site_rater::analyzers::writetos3::upload_reports;
use site_rater::config::{RaterConfig, UrlAliases};
use site_rater::fetch::load_bytes;
use site_rater::output::{print_json, write_run};
use site_rater::sites::{Site, load_site_list};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "site_rater")]
#[command(about = "Rates websites on accessibility, speed and reading age", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Data directory holding lighthouse/, languages/ and reports/ [env: RATER_BASE_DIR]
    #[arg(short, long)]
    base_dir: Option<String>,

    /// Site list CSV, as a path or http(s) URL [env: RATER_SITES]
    #[arg(short, long)]
    sites: Option<String>,

    /// JSON file mapping canonical site URLs to audited URLs [env: RATER_ALIASES]
    #[arg(short, long)]
    aliases: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate every site and write reports, the index and the leaderboard
    Report {
        #[command(flatten)]
        inputs: InputArgs,

        /// Generate screenshot timelapses with GraphicsMagick
        #[arg(long, default_value_t = false)]
        timelapses: bool,

        /// Optional: S3 bucket to upload the reports to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Key prefix for uploaded reports
        #[arg(long, default_value = "reports")]
        s3_prefix: String,

        /// Optional: Gzip compress reports before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Print one site's summary as JSON
    Site {
        #[command(flatten)]
        inputs: InputArgs,

        /// Canonical URL of the site, as it appears in the site list
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Log the rankings and leaderboard without writing files
    Rankings {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

/// Inputs resolved from flags, then environment, then defaults.
struct Inputs {
    config: RaterConfig,
    sites: Vec<Site>,
    aliases: UrlAliases,
}

impl InputArgs {
    async fn resolve(self) -> Result<Inputs> {
        let base_dir = flag_or_env(self.base_dir, "RATER_BASE_DIR", "data");
        let config = RaterConfig::new(&base_dir);

        let sites_source = flag_or_env(
            self.sites,
            "RATER_SITES",
            &config.base.join("sites.csv").to_string_lossy(),
        );
        let sites = load_site_list(&load_bytes(&sites_source).await?)
            .with_context(|| format!("failed to parse site list {sites_source}"))?;

        let aliases_path = flag_or_env(
            self.aliases,
            "RATER_ALIASES",
            &config.base.join("aliases.json").to_string_lossy(),
        );
        let aliases = if Path::new(&aliases_path).exists() {
            UrlAliases::load(Path::new(&aliases_path))?
        } else {
            warn!(path = %aliases_path, "No URL alias file, using canonical URLs only");
            UrlAliases::default()
        };

        info!(
            base_dir = %config.base.display(),
            sites = sites.len(),
            aliases = aliases.len(),
            "Inputs resolved"
        );

        Ok(Inputs {
            config,
            sites,
            aliases,
        })
    }
}

fn flag_or_env(flag: Option<String>, var: &str, default: &str) -> String {
    flag.or_else(|| std::env::var(var).ok())
        .unwrap_or_else(|| default.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/site_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("site_rater.log"));

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
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Report {
            inputs,
            timelapses,
            s3_bucket,
            s3_prefix,
            gzip,
        } => {
            let Inputs {
                config,
                sites,
                aliases,
            } = inputs.resolve().await?;
            config.ensure_output_dirs()?;

            let mut run = rate_from_disk(&config, &sites, aliases, today)?;
            attach_media(&mut run, &config, timelapses);

            let written = write_run(&config.reports, &run)?;

            if let Some(bucket) = s3_bucket {
                info!(bucket = %bucket, gzip, "S3 upload enabled");
                let aws = aws_config::load_from_env().await;
                let s3 = aws_sdk_s3::Client::new(&aws);
                upload_reports(&s3, &bucket, &s3_prefix, &written, gzip).await?;
            }

            if !run.failed.is_empty() {
                warn!(failed = ?run.failed, "Some sites have no report");
            }
        }
        Commands::Site { inputs, url } => {
            let Inputs {
                config,
                sites,
                aliases,
            } = inputs.resolve().await?;

            let site = sites
                .into_iter()
                .find(|s| s.url == url)
                .unwrap_or_else(|| Site::new(url.clone(), url.clone()));

            let run = rate_from_disk(&config, std::slice::from_ref(&site), aliases, today)?;
            match run.site(&site.url) {
                Some(report) => print_json(report)?,
                None => anyhow::bail!("could not compute scores for {url}"),
            }
        }
        Commands::Rankings { inputs } => {
            let Inputs {
                config,
                sites,
                aliases,
            } = inputs.resolve().await?;

            let run = rate_from_disk(&config, &sites, aliases, today)?;

            for metric in Metric::ALL {
                let ranking = run.rankings.get(metric);
                for (position, entry) in ranking.entries.iter().enumerate() {
                    info!(%metric, rank = position + 1, site = %entry.url, value = entry.value, "Ranking");
                }
            }

            for (place, entry) in run.leaderboard.iter().enumerate() {
                info!(
                    place = place + 1,
                    site = %entry.url,
                    name = %entry.name,
                    speed = %entry.rank_cell(Metric::Speed),
                    accessibility = %entry.rank_cell(Metric::Accessibility),
                    reading_age = %entry.rank_cell(Metric::ReadingAge),
                    overall = entry.overall,
                    "Leaderboard"
                );
            }
        }
    }

    Ok(())
}
