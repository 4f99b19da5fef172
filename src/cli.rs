use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-scan",
    about = "List the dependencies of Go packages and match their license files against well-known licenses",
    long_about = "List all dependencies of the given packages, excluding standard library \
packages, and report their licenses. License files are found by looking for files named \
like LICENSE, COPYING, COPYRIGHT and other variants in the package directory and its \
parents until one is found. Each file is matched against a set of well-known licenses and \
the best match is shown with its score.",
    version
)]
pub struct Cli {
    /// Package import paths or patterns to scan
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Show every package instead of grouping packages sharing a license file
    #[arg(short, long)]
    pub all: bool,

    /// Show words of the license file not matching the template, and missing ones
    #[arg(short, long)]
    pub words: bool,

    /// Write a pipe-delimited report to FILE instead of printing a table
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Console output format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Minimum score for a probable match [default: 0.9, or the config value]
    #[arg(long, value_name = "SCORE")]
    pub confidence: Option<f64>,

    /// Config file [default: ./.license-scan/config.toml, fallback ~/.config/license-scan/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// GOPATH passed to the go toolchain
    #[arg(long, value_name = "DIR")]
    pub gopath: Option<String>,

    /// Log scan details to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide progress and the table; only print the summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
