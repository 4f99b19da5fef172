use std::ffi::OsStr;
use std::path::PathBuf;

use serde::Serialize;

use crate::license::matcher::MatchResult;

/// Version token used when no revision could be determined.
pub const UNKNOWN_VERSION: &str = "?";

/// License findings for one package of the dependency set.
#[derive(Debug, Clone, Serialize)]
pub struct PackageLicense<'a> {
    pub package: String,
    pub version: String,
    /// Logical path of the license file, empty when none was found.
    pub license_path: String,
    pub classification: Option<MatchResult<'a>>,
    /// Set when the toolchain could not resolve the package itself.
    pub error: Option<String>,
}

impl<'a> PackageLicense<'a> {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: UNKNOWN_VERSION.to_string(),
            license_path: String::new(),
            classification: None,
            error: None,
        }
    }

    pub fn failed(package: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(package)
        }
    }

    pub fn score(&self) -> f64 {
        self.classification
            .as_ref()
            .filter(|m| m.template.is_some())
            .map(|m| m.score)
            .unwrap_or(0.0)
    }
}

/// Module a package belongs to, when the toolchain runs in module mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleInfo {
    pub path: String,
    pub dir: Option<PathBuf>,
    pub version: Option<String>,
}

/// What the dependency resolver knows about one package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    pub import_path: String,
    pub name: String,
    pub dir: PathBuf,
    pub root: PathBuf,
    pub module: Option<ModuleInfo>,
    pub error: Option<String>,
}

impl PackageInfo {
    /// Base directory and logical prefix the package's import path is laid
    /// out under.
    ///
    /// Modules without a directory are vendored copies: the base is the
    /// package directory minus its import path segments.
    pub fn source_root(&self) -> (PathBuf, String) {
        match &self.module {
            Some(ModuleInfo {
                path,
                dir: Some(dir),
                ..
            }) => return (dir.clone(), path.clone()),
            Some(ModuleInfo { dir: None, .. }) => {
                if let Some(base) = self.import_base() {
                    return (base, String::new());
                }
            }
            None => {}
        }
        (self.root.join("src"), String::new())
    }

    /// Directory `import_path` is rooted at, when `dir` ends with it.
    fn import_base(&self) -> Option<PathBuf> {
        let mut base = self.dir.as_path();
        for segment in self.import_path.rsplit('/') {
            if base.file_name()? != OsStr::new(segment) {
                return None;
            }
            base = base.parent()?;
        }
        Some(base.to_path_buf())
    }

    pub fn is_vendored(&self) -> bool {
        self.dir.components().any(|c| c.as_os_str() == "vendor")
    }
}
