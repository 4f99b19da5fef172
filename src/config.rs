use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::license::matcher::DEFAULT_CONFIDENCE;

/// Root configuration structure, deserialized from `.license-scan/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// How license texts are matched.
#[derive(Debug, Deserialize)]
pub struct ClassificationConfig {
    /// Scores at or above this are probable matches. Defaults to `0.9`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Directory of extra templates, added after the built-in corpus.
    #[serde(default)]
    pub templates: Option<PathBuf>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
            templates: None,
        }
    }
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

/// How dependencies are enumerated.
#[derive(Debug, Deserialize)]
pub struct ResolverConfig {
    /// Go toolchain binary. Defaults to `go` on `PATH`.
    #[serde(default = "default_go")]
    pub go: String,
    /// GOPATH override passed to the toolchain.
    #[serde(default)]
    pub gopath: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            go: default_go(),
            gopath: None,
        }
    }
}

fn default_go() -> String {
    "go".to_string()
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.license-scan/config.toml`
/// 3. `~/.config/license-scan/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-scan").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("license-scan").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    validate_confidence(config.classification.confidence)?;
    Ok(config)
}

pub fn validate_confidence(confidence: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&confidence) {
        bail!("confidence threshold must be between 0 and 1, got {confidence}");
    }
    Ok(())
}
