use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ScanError};
use crate::license::normalize::{normalize, WordSet};

/// Reference license texts compiled into the binary, keyed by resource name.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("0bsd.txt", include_str!("../../templates/0bsd.txt")),
    ("agpl-3.0.txt", include_str!("../../templates/agpl-3.0.txt")),
    ("apache-2.0.txt", include_str!("../../templates/apache-2.0.txt")),
    ("artistic-2.0.txt", include_str!("../../templates/artistic-2.0.txt")),
    ("bsd-2-clause.txt", include_str!("../../templates/bsd-2-clause.txt")),
    ("bsd-3-clause.txt", include_str!("../../templates/bsd-3-clause.txt")),
    ("cc0-1.0.txt", include_str!("../../templates/cc0-1.0.txt")),
    ("epl-1.0.txt", include_str!("../../templates/epl-1.0.txt")),
    ("gpl-2.0.txt", include_str!("../../templates/gpl-2.0.txt")),
    ("gpl-3.0.txt", include_str!("../../templates/gpl-3.0.txt")),
    ("isc.txt", include_str!("../../templates/isc.txt")),
    ("lgpl-2.1.txt", include_str!("../../templates/lgpl-2.1.txt")),
    ("lgpl-3.0.txt", include_str!("../../templates/lgpl-3.0.txt")),
    ("mit.txt", include_str!("../../templates/mit.txt")),
    ("mpl-2.0.txt", include_str!("../../templates/mpl-2.0.txt")),
    ("unlicense.txt", include_str!("../../templates/unlicense.txt")),
    ("zlib.txt", include_str!("../../templates/zlib.txt")),
];

/// A known license reduced to its normalized words.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spdx_id: Option<String>,
    #[serde(skip)]
    pub words: WordSet,
}

#[derive(PartialEq)]
enum Section {
    Preamble,
    Metadata,
    Body,
}

/// Parse a template document: optional preamble, a `---` delimited metadata
/// block, then the license body.
///
/// A document without delimiters yields an empty title and word set.
pub fn parse_template(content: &str) -> Template {
    let mut template = Template {
        title: String::new(),
        nickname: None,
        spdx_id: None,
        words: WordSet::default(),
    };
    let mut body = String::new();
    let mut section = Section::Preamble;

    for raw in content.lines() {
        let line = raw.trim();
        match section {
            Section::Preamble => {
                if line == "---" {
                    section = Section::Metadata;
                }
            }
            Section::Metadata => {
                if line == "---" {
                    section = Section::Body;
                } else if let Some(value) = line.strip_prefix("title:") {
                    template.title = value.trim().to_string();
                } else if let Some(value) = line.strip_prefix("nickname:") {
                    template.nickname = Some(value.trim().to_string());
                } else if let Some(value) = line.strip_prefix("spdx-id:") {
                    template.spdx_id = Some(value.trim().to_string());
                }
            }
            Section::Body => {
                body.push_str(raw);
                body.push('\n');
            }
        }
    }

    template.words = normalize(body.as_bytes());
    template
}

/// Load the built-in corpus.
pub fn load_templates() -> Result<Vec<Template>> {
    BUILTIN_TEMPLATES
        .iter()
        .map(|(name, content)| checked_template(name, content))
        .collect()
}

/// Load every `.txt`/`.md` template from `dir`, sorted by file name.
pub fn load_templates_from_dir(dir: &Path) -> Result<Vec<Template>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ScanError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ScanError::io(dir, e))?;
        let path = entry.path();
        let is_template = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt") | Some("md")
        );
        if is_template && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|e| ScanError::io(&path, e))?;
        templates.push(checked_template(&path.display().to_string(), &content)?);
    }
    debug!(dir = %dir.display(), count = templates.len(), "loaded extra templates");
    Ok(templates)
}

fn checked_template(name: &str, content: &str) -> Result<Template> {
    let template = parse_template(content);
    if template.title.is_empty() {
        return Err(ScanError::TemplateLoad {
            name: name.to_string(),
            reason: "missing title or `---` metadata block".to_string(),
        });
    }
    if template.words.is_empty() {
        return Err(ScanError::TemplateLoad {
            name: name.to_string(),
            reason: "license body is empty".to_string(),
        });
    }
    Ok(template)
}

#[cfg(test)]
pub(crate) const MIT_TEMPLATE: &str = include_str!("../../templates/mit.txt");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::matcher::{
        dice_score, match_templates, Confidence, CERTAIN_SCORE, DEFAULT_CONFIDENCE,
    };

    #[test]
    fn test_parse_metadata_and_body() {
        let t = parse_template(
            "preamble is ignored\n---\ntitle:  Some License \nnickname: SL\nspdx-id: SL-1.0\nfeatured: true\n---\n\nHello World\n",
        );
        assert_eq!(t.title, "Some License");
        assert_eq!(t.nickname.as_deref(), Some("SL"));
        assert_eq!(t.spdx_id.as_deref(), Some("SL-1.0"));
        assert_eq!(t.words.ordered(), vec!["hello", "world"]);
    }

    #[test]
    fn test_metadata_not_in_words() {
        let t = parse_template("---\ntitle: Foo\n---\nbar\n");
        assert!(!t.words.contains("title"));
        assert!(!t.words.contains("foo"));
        assert!(t.words.contains("bar"));
    }

    #[test]
    fn test_missing_delimiters_yield_empty_template() {
        let t = parse_template("Just some license text\nwithout metadata\n");
        assert!(t.title.is_empty());
        assert!(t.words.is_empty());
    }

    #[test]
    fn test_builtin_corpus_loads() {
        let templates = load_templates().unwrap();
        assert_eq!(templates.len(), BUILTIN_TEMPLATES.len());
        for t in &templates {
            assert!(!t.title.is_empty());
            assert!(!t.words.is_empty(), "{} has no words", t.title);
        }
        let mit = templates.iter().find(|t| t.title == "MIT License").unwrap();
        assert_eq!(mit.spdx_id.as_deref(), Some("MIT"));
        for w in ["the", "mit", "license", "permission"] {
            assert!(mit.words.contains(w), "missing {w}");
        }
        assert!(!mit.words.contains("fullname"));
    }

    #[test]
    fn test_builtin_bodies_classify_as_themselves() {
        let templates = load_templates().unwrap();
        for (name, content) in BUILTIN_TEMPLATES {
            let body = content.splitn(3, "---").nth(2).unwrap();
            let m = match_templates(body.as_bytes(), &templates);
            let expected = parse_template(content).title;
            assert_eq!(m.template.unwrap().title, expected, "{name}");
            assert_eq!(m.confidence(DEFAULT_CONFIDENCE), Some(Confidence::Certain));

            let words = normalize(body.as_bytes());
            for other in templates.iter().filter(|t| t.title != expected) {
                let score = dice_score(&words, &other.words);
                assert!(
                    score <= CERTAIN_SCORE,
                    "{name} scores {score} against {}",
                    other.title
                );
            }
        }
    }

    #[test]
    fn test_copyleft_licenses_bundled() {
        let ids: Vec<_> = load_templates()
            .unwrap()
            .into_iter()
            .filter_map(|t| t.spdx_id)
            .collect();
        for id in [
            "AGPL-3.0", "GPL-2.0", "GPL-3.0", "LGPL-2.1", "LGPL-3.0", "MPL-2.0", "EPL-1.0",
        ] {
            assert!(ids.iter().any(|i| i == id), "missing {id}");
        }
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("custom.txt"),
            "---\ntitle: Custom License\n---\nDo whatever you want.\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let templates = load_templates_from_dir(dir.path()).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].title, "Custom License");
    }

    #[test]
    fn test_load_from_dir_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.txt"), "no metadata here\n").unwrap();

        let err = load_templates_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::TemplateLoad { .. }));
    }

    #[test]
    fn test_load_from_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_templates_from_dir(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
