//! Report renderers for scan results.
//!
//! - [`terminal`]: colored console table with a summary line.
//! - [`file`]: pipe-delimited fixed-width report written to a file.
//!
//! Both render the same [`Row`]s, built by [`build_rows`].

use std::cmp::Ordering;

use crate::license::matcher::Confidence;
use crate::models::PackageLicense;

pub mod file;
pub mod terminal;

/// How a row's license was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Matched(Confidence),
    /// The package itself could not be resolved.
    Error,
    /// No license file or no template to compare against.
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub package: String,
    pub version: String,
    pub license: String,
    pub matched: String,
    pub words: String,
    pub score: f64,
    pub status: Status,
}

/// Render each entry under the confidence `threshold` and sort the rows by
/// license, ascending score, then package.
pub fn build_rows(licenses: &[PackageLicense<'_>], threshold: f64) -> Vec<Row> {
    let mut rows: Vec<Row> = licenses.iter().map(|l| row(l, threshold)).collect();
    rows.sort_by(compare_rows);
    rows
}

fn row(l: &PackageLicense<'_>, threshold: f64) -> Row {
    let mut license = "?".to_string();
    let mut words = String::new();
    let mut status = Status::Missing;

    let matched = l
        .classification
        .as_ref()
        .and_then(|m| Some((m, m.template?, m.confidence(threshold)?)));
    if let Some((m, template, confidence)) = matched {
        status = Status::Matched(confidence);
        license = match confidence {
            Confidence::Certain => template.title.clone(),
            Confidence::Probable => {
                words = diff_words(&m.extra_words, &m.missing_words);
                template.title.clone()
            }
            Confidence::Unknown => format!("? ({})", template.title),
        };
    } else if let Some(err) = &l.error {
        status = Status::Error;
        license = err.replace('\n', " ");
    }

    let score = l.score();
    Row {
        package: l.package.clone(),
        version: l.version.clone(),
        license,
        matched: format!("{:2}%", (100.0 * score + 0.5) as i64),
        words,
        score,
        status,
    }
}

fn diff_words(extra: &[String], missing: &[String]) -> String {
    extra
        .iter()
        .map(|w| format!("+{w}"))
        .chain(missing.iter().map(|w| format!("-{w}")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn compare_rows(a: &Row, b: &Row) -> Ordering {
    a.license
        .cmp(&b.license)
        .then(a.score.total_cmp(&b.score))
        .then_with(|| a.package.cmp(&b.package))
}
