use serde::Serialize;

use crate::license::normalize::{normalize, WordSet};
use crate::license::templates::Template;

/// Scores above this are reported as an exact match.
pub const CERTAIN_SCORE: f64 = 0.99;

/// Default confidence threshold separating probable matches from guesses.
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Score reported when there was no template to compare against.
pub const NO_MATCH_SCORE: f64 = -1.0;

/// Best template for a license text, with the words that differ.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'a> {
    pub template: Option<&'a Template>,
    pub score: f64,
    pub extra_words: Vec<String>,
    pub missing_words: Vec<String>,
}

/// How much a [`MatchResult`] can be trusted under a given threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Certain,
    Probable,
    Unknown,
}

impl Confidence {
    pub fn of(score: f64, threshold: f64) -> Self {
        if score > CERTAIN_SCORE {
            Confidence::Certain
        } else if score >= threshold {
            Confidence::Probable
        } else {
            Confidence::Unknown
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Certain => write!(f, "certain"),
            Confidence::Probable => write!(f, "probable"),
            Confidence::Unknown => write!(f, "unknown"),
        }
    }
}

impl MatchResult<'_> {
    /// Confidence of this match, `None` when no template was available.
    pub fn confidence(&self, threshold: f64) -> Option<Confidence> {
        self.template.map(|_| Confidence::of(self.score, threshold))
    }
}

/// Dice coefficient of two word sets.
pub fn dice_score(a: &WordSet, b: &WordSet) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    let common = a.iter().filter(|(w, _)| b.contains(w)).count();
    2.0 * common as f64 / total as f64
}

/// Words of `words` absent from `other`, in first-seen order.
fn difference(words: &WordSet, other: &WordSet) -> Vec<String> {
    words
        .ordered()
        .into_iter()
        .filter(|w| !other.contains(w))
        .map(str::to_string)
        .collect()
}

/// Find the template closest to `license`.
///
/// Later templates must strictly beat the current best, so the first one wins
/// ties. An empty corpus yields no template and [`NO_MATCH_SCORE`].
pub fn match_templates<'a>(license: &[u8], templates: &'a [Template]) -> MatchResult<'a> {
    let words = normalize(license);

    let mut best: Option<&'a Template> = None;
    let mut best_score = NO_MATCH_SCORE;
    for template in templates {
        let score = dice_score(&words, &template.words);
        if score > best_score {
            best_score = score;
            best = Some(template);
        }
    }

    let (extra_words, missing_words) = match best {
        Some(t) => (difference(&words, &t.words), difference(&t.words, &words)),
        None => (Vec::new(), Vec::new()),
    };

    MatchResult {
        template: best,
        score: best_score,
        extra_words,
        missing_words,
    }
}
