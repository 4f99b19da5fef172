//! Error taxonomy for the scanning core.
//!
//! Per-package resolution problems reported by the toolchain are not errors at
//! this level: they are recorded on the package entry and rendered inline.
//! Everything below aborts the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// A requested package or one of its dependencies cannot be found or built.
    #[error("{0}")]
    ResolutionMissing(String),

    /// The toolchain ran but reported something other than a missing package.
    #[error("{context}:\n{output}")]
    ResolutionFailure { context: String, output: String },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two unrelated packages resolved to the same license file.
    #[error("packages share the same license {license_path} but not common prefix: {}", .packages.join(", "))]
    GroupingConflict {
        license_path: String,
        packages: Vec<String>,
    },

    #[error("invalid license template {name}: {reason}")]
    TemplateLoad { name: String, reason: String },
}

impl ScanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn failure(context: impl Into<String>, output: impl Into<String>) -> Self {
        ScanError::ResolutionFailure {
            context: context.into(),
            output: output.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
