//! `license-scan` lists the dependencies of Go packages and classifies their licenses.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging.
//! 2. Load config ([`config::load_config`]) and the template corpus ([`license::templates`]).
//! 3. Resolve dependencies and match their license files ([`scan::list_licenses`]).
//! 4. Group packages sharing a license file unless `--all` ([`group::group_licenses`]).
//! 5. Render a table, JSON, or a report file ([`report`]).
//! 6. Exit `0`, or `1` with a one-line message on any error.

mod cli;
mod config;
mod error;
mod group;
mod license;
mod models;
mod report;
mod resolver;
mod scan;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputFormat};
use config::{load_config, validate_confidence};
use group::group_licenses;
use license::templates::{load_templates, load_templates_from_dir};
use report::build_rows;
use resolver::git::GitRevision;
use resolver::go::GoResolver;
use scan::list_licenses;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        let message = format!("{err:#}");
        eprintln!(
            "{} {}",
            "error:".red().bold(),
            message.split_whitespace().collect::<Vec<_>>().join(" ")
        );
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "license_scan=debug"
    } else {
        "license_scan=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    let confidence = cli.confidence.unwrap_or(config.classification.confidence);
    validate_confidence(confidence)?;

    let mut templates = load_templates()?;
    if let Some(dir) = &config.classification.templates {
        templates.extend(load_templates_from_dir(dir)?);
    }
    info!(templates = templates.len(), confidence, "corpus loaded");

    let gopath = cli.gopath.or(config.resolver.gopath);
    let resolver = GoResolver::new(config.resolver.go, gopath);

    let show_progress = !cli.quiet && cli.report.is_none() && matches!(cli.format, OutputFormat::Terminal);
    let pb = if show_progress {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut licenses = list_licenses(
        &resolver,
        &GitRevision::new(),
        &templates,
        &cli.packages,
        pb.as_ref(),
    )?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if !cli.all {
        licenses = group_licenses(licenses)?;
    }

    if let Some(path) = &cli.report {
        let rows = build_rows(&licenses, confidence);
        report::file::render(&rows, path, cli.words)?;
        info!(path = %path.display(), rows = rows.len(), "report written");
        return Ok(());
    }

    match cli.format {
        OutputFormat::Terminal => {
            report::terminal::render(&build_rows(&licenses, confidence), cli.words, cli.quiet);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&licenses)?);
        }
    }

    Ok(())
}
