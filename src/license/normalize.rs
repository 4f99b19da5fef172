use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_']+").expect("word pattern is valid"));

/// Copyright notices carry author names and years that never appear in a
/// template, so the whole line is dropped before tokenizing.
static COPYRIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*Copyright (?:©|\(c\))?\s*(?:[0-9]{4}|\[year\]).*")
        .expect("copyright pattern is valid")
});

/// Normalized, deduplicated tokens of a text, each mapped to the index of its
/// first occurrence in the token stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordSet {
    words: HashMap<String, usize>,
}

impl WordSet {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.words.iter().map(|(w, &pos)| (w.as_str(), pos))
    }

    /// Words in first-seen order.
    pub fn ordered(&self) -> Vec<&str> {
        let mut words: Vec<(&str, usize)> = self.iter().collect();
        words.sort_by_key(|&(_, pos)| pos);
        words.into_iter().map(|(w, _)| w).collect()
    }

    fn insert_first(&mut self, word: &str, pos: usize) {
        if !self.words.contains_key(word) {
            self.words.insert(word.to_string(), pos);
        }
    }
}

/// Lowercase `data` and strip copyright lines.
pub fn clean_license_text(data: &[u8]) -> String {
    let lower = String::from_utf8_lossy(data).to_lowercase();
    COPYRIGHT_RE.replace_all(&lower, "").into_owned()
}

/// Reduce raw license bytes to a [`WordSet`].
///
/// Distinguishing words (authors, project names) tend to sit near the top of a
/// license, so keeping the first-seen index lets diffs read in source order.
pub fn normalize(data: &[u8]) -> WordSet {
    let cleaned = clean_license_text(data);
    let mut set = WordSet::default();
    for (i, m) in WORD_RE.find_iter(&cleaned).enumerate() {
        set.insert_first(m.as_str(), i);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let set = normalize(b"b a b c a");
        assert_eq!(set.len(), 3);
        assert_eq!(set.ordered(), vec!["b", "a", "c"]);
        let positions: HashMap<&str, usize> = set.iter().collect();
        assert_eq!(positions["b"], 0);
        assert_eq!(positions["a"], 1);
        assert_eq!(positions["c"], 3);
    }

    #[test]
    fn test_lowercases() {
        let set = normalize(b"The MIT License");
        assert_eq!(set.ordered(), vec!["the", "mit", "license"]);
    }

    #[test]
    fn test_copyright_line_removed() {
        let text = b"Header\nCopyright (c) 2020 Jane Doe\nPermission granted";
        let set = normalize(text);
        assert!(!set.contains("jane"));
        assert!(!set.contains("doe"));
        assert!(!set.contains("2020"));
        assert!(!set.contains("copyright"));
        assert_eq!(set.ordered(), vec!["header", "permission", "granted"]);
    }

    #[test]
    fn test_copyright_removed_regardless_of_case() {
        for line in [
            "COPYRIGHT (C) 2020 Jane Doe",
            "copyright 1999 Someone Else",
            "Copyright © 2021 Acme",
            "Copyright (c) [year] [fullname]",
        ] {
            let set = normalize(line.as_bytes());
            assert!(set.is_empty(), "{line:?} left {:?}", set.ordered());
        }
    }

    #[test]
    fn test_copyright_word_without_year_is_kept() {
        let set = normalize(b"the above copyright notice");
        assert!(set.contains("copyright"));
        assert!(set.contains("notice"));
    }

    #[test]
    fn test_tokens_have_no_punctuation() {
        let set = normalize(b"\"AS IS\", (don't) foo-bar; under_score x.y\t\n");
        for (word, _) in set.iter() {
            assert!(
                word.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '\'' || c == '_'),
                "bad token {word:?}"
            );
        }
        assert!(set.contains("don't"));
        assert!(set.contains("under_score"));
        assert!(set.contains("foo"));
        assert!(set.contains("bar"));
    }

    #[test]
    fn test_idempotent_on_normalized_text() {
        let original = normalize(
            b"Copyright (c) 2020 Jane Doe\n\nPermission is hereby granted, free of charge, \
              to any person obtaining a copy of this software.",
        );
        let rejoined = original.ordered().join(" ");
        let again = normalize(rejoined.as_bytes());
        assert_eq!(again.ordered(), original.ordered());
        assert_eq!(normalize(again.ordered().join(" ").as_bytes()), again);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize(b"").is_empty());
        assert!(normalize(b"  ,.;  ").is_empty());
    }
}
