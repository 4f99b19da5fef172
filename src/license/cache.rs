use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ScanError};
use crate::license::matcher::{match_templates, MatchResult};
use crate::license::templates::Template;

/// Per-run memo of classifications keyed by physical license file path.
///
/// Each distinct file is read and matched at most once; many subpackages of
/// one repository usually share a single license file.
pub struct MatchCache<'a> {
    templates: &'a [Template],
    matched: HashMap<PathBuf, MatchResult<'a>>,
}

impl<'a> MatchCache<'a> {
    pub fn new(templates: &'a [Template]) -> Self {
        Self {
            templates,
            matched: HashMap::new(),
        }
    }

    pub fn classify(&mut self, path: &Path) -> Result<&MatchResult<'a>> {
        if !self.matched.contains_key(path) {
            let data = std::fs::read(path).map_err(|e| ScanError::io(path, e))?;
            let result = match_templates(&data, self.templates);
            debug!(
                path = %path.display(),
                template = result.template.map(|t| t.title.as_str()).unwrap_or("-"),
                score = result.score,
                "classified license file"
            );
            self.matched.insert(path.to_path_buf(), result);
        } else {
            debug!(path = %path.display(), "license cache hit");
        }
        Ok(&self.matched[path])
    }

    pub fn files_classified(&self) -> usize {
        self.matched.len()
    }
}
