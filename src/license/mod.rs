//! License text matching.
//!
//! - [`normalize`]: lowercasing, copyright stripping and tokenization into a
//!   [`WordSet`](normalize::WordSet).
//! - [`templates`]: the reference corpus, embedded or loaded from disk.
//! - [`matcher`]: Dice-coefficient scoring against the corpus.
//! - [`locator`]: finds the most likely license file for a package.
//! - [`cache`]: per-run memo of classifications by license file path.

pub mod cache;
pub mod locator;
pub mod matcher;
pub mod normalize;
pub mod templates;
