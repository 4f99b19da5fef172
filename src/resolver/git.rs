use std::path::Path;
use std::process::Command;

use tracing::warn;

use crate::models::{PackageInfo, UNKNOWN_VERSION};

pub struct GitRevision;

impl GitRevision {
    pub fn new() -> Self {
        Self
    }
}

impl super::RevisionLookup for GitRevision {
    fn revision(&self, info: &PackageInfo) -> String {
        if let Some(version) = info.module.as_ref().and_then(|m| m.version.as_deref()) {
            return version.to_string();
        }
        // Vendored copies carry no history of their own.
        if info.is_vendored() {
            return UNKNOWN_VERSION.to_string();
        }
        head_revision(&info.dir).unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }
}

fn head_revision(dir: &Path) -> Option<String> {
    let output = match Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(dir)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "could not run git");
            return None;
        }
    };
    if !output.status.success() {
        return None;
    }
    let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!revision.is_empty()).then_some(revision)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::models::ModuleInfo;
    use crate::resolver::RevisionLookup;

    fn info(dir: PathBuf, module: Option<ModuleInfo>) -> PackageInfo {
        PackageInfo {
            import_path: "example.com/x".to_string(),
            name: "x".to_string(),
            dir,
            root: PathBuf::new(),
            module,
            error: None,
        }
    }

    #[test]
    fn test_module_version_wins() {
        let module = ModuleInfo {
            path: "example.com/x".to_string(),
            dir: None,
            version: Some("v1.2.3".to_string()),
        };
        let rev = GitRevision::new().revision(&info(PathBuf::from("/nonexistent"), Some(module)));
        assert_eq!(rev, "v1.2.3");
    }

    #[test]
    fn test_vendored_is_unknown() {
        let rev = GitRevision::new().revision(&info(PathBuf::from("/app/vendor/example.com/x"), None));
        assert_eq!(rev, UNKNOWN_VERSION);
    }

    #[test]
    fn test_missing_dir_is_unknown() {
        let rev = GitRevision::new().revision(&info(PathBuf::from("/definitely/not/here"), None));
        assert_eq!(rev, UNKNOWN_VERSION);
    }
}
