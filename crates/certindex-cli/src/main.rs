//! Certindex CLI - Publish certificates with a static HTML index

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

use certindex_core::{build_directory_index, build_index, BuildReport};

/// Certindex - Publish X.509 certificates with a static HTML index
#[derive(Parser, Debug)]
#[command(name = "certindex")]
#[command(about = "Copy certificates into a site directory and render an index page", long_about = None)]
#[command(version = env!("GIT_TAG"))]
#[command(long_version = concat!(env!("GIT_TAG"), "\nCommit: ", env!("GIT_HASH"), "\nBuilt: ", env!("BUILD_TIME")))]
struct Cli {
    /// Output directory for index.html and the copied certificates
    #[arg(long, env = "CERTINDEX_OUTPUT", default_value = "index.html")]
    output: PathBuf,

    /// Config file listing certificate groups
    #[arg(long, env = "CERTINDEX_CONFIG", default_value = "config.yml")]
    config: PathBuf,

    /// Read certificates from {root}/{name}/certificate.crt instead of a config file
    #[arg(long, requires = "names")]
    root: Option<PathBuf>,

    /// Certificate names under --root
    #[arg(requires = "root")]
    names: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match log_filter(&cli.log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        );

    tracing::subscriber::with_default(subscriber, || match run(&cli) {
        Ok(report) => {
            summarize(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    })
}

fn log_filter(log_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("Failed to initialize logging filter")
}

fn run(cli: &Cli) -> Result<BuildReport> {
    match &cli.root {
        Some(root) => build_directory_index(root, &cli.names, &cli.output)
            .with_context(|| format!("Failed to build index from {:?}", root)),
        None => build_index(&cli.config, &cli.output)
            .with_context(|| format!("Failed to build index from {:?}", cli.config)),
    }
}

fn summarize(report: &BuildReport) {
    if report.failures.is_empty() {
        info!(
            "Published {} certificates to {:?}",
            report.processed, report.index_path
        );
    } else {
        warn!(
            "Published {} certificates to {:?}, skipped {}",
            report.processed,
            report.index_path,
            report.failures.len()
        );
    }
}
