use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Result, ScanError};

/// Whole-filename rules, highest priority first. The first matching rule
/// decides the score.
static NAME_RULES: LazyLock<Vec<(Regex, f64)>> = LazyLock::new(|| {
    [
        (r"(?i)^(?:un)?licen[sc]e$", 1.0),
        (r"(?i)^(?:un)?licen[sc]e\.(?:md|markdown|txt)$", 0.9),
        (r"(?i)^copy(?:ing|right)(?:\.[^.]+)?$", 0.8),
        (r"(?i)^licen[sc]e\.[^.]+$", 0.7),
        (r"(?i)licen[sc]e", 0.6),
    ]
    .into_iter()
    .map(|(pattern, score)| (Regex::new(pattern).expect("license name pattern is valid"), score))
    .collect()
});

/// Weight between 0 and 1 of how likely `name` is a license file.
pub fn score_license_name(name: &str) -> f64 {
    NAME_RULES
        .iter()
        .find(|(re, _)| re.is_match(name))
        .map(|&(_, score)| score)
        .unwrap_or(0.0)
}

/// Lists regular files of a `/`-separated logical directory.
pub trait DirectoryLister {
    fn list_files(&self, dir: &str) -> Result<Vec<String>>;
}

/// Maps logical paths under `prefix` onto directories under `base`.
///
/// GOPATH packages use `$root/src` with an empty prefix; module packages use
/// the module directory with the module path as prefix. Logical paths outside
/// the prefix have no files.
#[derive(Debug, Clone)]
pub struct FsLister {
    base: PathBuf,
    prefix: String,
}

impl FsLister {
    pub fn new(base: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            prefix: prefix.into(),
        }
    }

    /// Filesystem location of a logical path, if it lies under the prefix.
    pub fn physical_path(&self, logical: &str) -> Option<PathBuf> {
        if self.prefix.is_empty() {
            return Some(self.base.join(logical));
        }
        let rest = logical.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            return Some(self.base.clone());
        }
        rest.strip_prefix('/').map(|rest| self.base.join(rest))
    }
}

impl DirectoryLister for FsLister {
    fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let Some(path) = self.physical_path(dir) else {
            return Ok(Vec::new());
        };
        read_file_names(&path)
    }
}

fn read_file_names(path: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(path).map_err(|e| ScanError::io(path, e))? {
        let entry = entry.map_err(|e| ScanError::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| ScanError::io(entry.path(), e))?;
        if file_type.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => "",
    }
}

/// Find the most likely license file for `package_path`, walking up parent
/// directories until one is found.
///
/// Returns the logical path of the file, or an empty string.
pub fn locate(package_path: &str, lister: &dyn DirectoryLister) -> Result<String> {
    let mut path = package_path.trim_end_matches('/');
    while !path.is_empty() && path != "." {
        let mut best_score = 0.0;
        let mut best_name = None;
        for name in lister.list_files(path)? {
            let score = score_license_name(&name);
            if score > best_score {
                best_score = score;
                best_name = Some(name);
            }
        }
        if let Some(name) = best_name {
            debug!(package = package_path, dir = path, file = %name, score = best_score, "license file found");
            return Ok(format!("{path}/{name}"));
        }
        path = parent(path);
    }
    debug!(package = package_path, "no license file");
    Ok(String::new())
}
