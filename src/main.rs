//! CLI entry point: authenticate once, pull each requested report kind
//! sequentially, export records to timestamped CSV files.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{info, warn};

use newhire_scrape::application::export;
use newhire_scrape::{
    authenticate, extract_records, fetch_report, Credentials, PortalConfig, ReportKind,
    ReportQuery, SessionClient,
};

#[derive(Parser, Debug)]
#[command(name = "newhire-scrape", version, about = "Pull employee-event reports from the in-newhire.com portal")]
struct Args {
    /// Path to a JSON portal configuration file
    #[arg(long, default_value = "portal_config.json")]
    config: PathBuf,

    /// Override the configured portal base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Portal username
    #[arg(long)]
    username: String,

    /// Portal password; falls back to the NEWHIRE_PASSWORD environment
    /// variable
    #[arg(long)]
    password: Option<String>,

    /// Range start (inclusive), YYYY-MM-DD
    #[arg(long, default_value = "2015-01-01")]
    from: NaiveDate,

    /// Range end (inclusive), YYYY-MM-DD; defaults to today
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Restrict the reports to one employee SSN
    #[arg(long)]
    ssn: Option<String>,

    /// Pull only new hires
    #[arg(long, conflicts_with = "terminations_only")]
    new_hires_only: bool,

    /// Pull only terminations
    #[arg(long)]
    terminations_only: bool,

    /// Directory for exported CSV files
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

impl Args {
    fn kinds(&self) -> Vec<ReportKind> {
        if self.new_hires_only {
            vec![ReportKind::NewHire]
        } else if self.terminations_only {
            vec![ReportKind::Termination]
        } else {
            vec![ReportKind::NewHire, ReportKind::Termination]
        }
    }

    fn password(&self) -> Result<String> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }
        std::env::var("NEWHIRE_PASSWORD")
            .context("No --password given and NEWHIRE_PASSWORD is not set")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = newhire_scrape::infrastructure::logging::init_logging(&args.log_dir)?;

    let mut config = PortalConfig::load_or_default(&args.config).await?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }

    let date_to = args.to.unwrap_or_else(|| Local::now().date_naive());
    if args.from > date_to {
        bail!("--from {} is after --to {}", args.from, date_to);
    }

    let credentials = Credentials::new(&args.username, args.password()?);
    let client = SessionClient::new(&config)?;

    authenticate(&client, &config, &credentials)
        .await
        .context("Login handshake failed")?;

    let mut total = 0usize;
    for kind in args.kinds() {
        let mut query = ReportQuery::new(kind, args.from, date_to);
        if let Some(ssn) = &args.ssn {
            query = query.with_subject(ssn.clone());
        }

        let body = fetch_report(&client, &config, &query)
            .await
            .with_context(|| format!("Failed to fetch the {kind} report"))?;

        let records = extract_records(&body, kind);
        if records.is_empty() {
            warn!("No {} records in range {} .. {}", kind, args.from, date_to);
        } else {
            let path = export::write_report(&args.out_dir, kind, &records)
                .with_context(|| format!("Failed to export the {kind} report"))?;
            info!("{}: {} record(s) -> {:?}", kind, records.len(), path);
        }
        total += records.len();
    }

    info!("Done; {} record(s) total", total);
    Ok(())
}
