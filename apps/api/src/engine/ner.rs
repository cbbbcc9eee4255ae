//! Entity-recognition seam for the skill extractor.
//!
//! The extractor only needs one operation — "give me candidate entity phrases
//! for this text" — so the model is a trait object and the concrete
//! implementation is swappable without touching the pipeline. The shipped
//! `PhraseEntityModel` is a deterministic noun-phrase chunker; there is no
//! sampling anywhere, so identical text always yields identical candidates.

use serde::Deserialize;

/// A candidate-phrase extraction model. Implementations must be deterministic.
pub trait EntityModel: Send + Sync {
    /// Returns candidate entity phrases from raw (non-stopword-stripped)
    /// text, in document order. Candidates may repeat; callers dedup.
    fn extract_entities(&self, text: &str) -> Vec<String>;
}

/// Configuration artifact for [`PhraseEntityModel`] (`ner.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct PhraseModelConfig {
    pub max_phrase_words: usize,
}

impl Default for PhraseModelConfig {
    fn default() -> Self {
        Self {
            max_phrase_words: 3,
        }
    }
}

/// Deterministic phrase chunker.
///
/// Words are split on whitespace, stripped of surrounding punctuation (inner
/// `+ # . / -` survive, so "c++" and "node.js" stay whole), and grouped into
/// runs broken at stopwords, empty words, and pure numbers. Every contiguous
/// window of 1..=`max_phrase_words` words within a run is emitted as a
/// candidate. Membership filtering against the vocabulary happens in the
/// extractor, not here.
pub struct PhraseEntityModel {
    max_phrase_words: usize,
}

impl PhraseEntityModel {
    pub fn new(config: PhraseModelConfig) -> Self {
        Self {
            // A zero window would silence the model entirely; clamp to 1.
            max_phrase_words: config.max_phrase_words.max(1),
        }
    }
}

impl Default for PhraseEntityModel {
    fn default() -> Self {
        Self::new(PhraseModelConfig::default())
    }
}

impl EntityModel for PhraseEntityModel {
    fn extract_entities(&self, text: &str) -> Vec<String> {
        let mut candidates = Vec::new();
        let mut run: Vec<&str> = Vec::new();

        for raw_word in text.split_whitespace() {
            let word = trim_punctuation(raw_word);
            if word.is_empty() || is_run_breaker(word) {
                flush_run(&mut run, self.max_phrase_words, &mut candidates);
                continue;
            }
            // Sentence punctuation glued to the word ends the phrase after it.
            let ends_phrase = raw_word.ends_with([',', '.', ';', ':', '!', '?', ')']);
            run.push(word);
            if ends_phrase {
                flush_run(&mut run, self.max_phrase_words, &mut candidates);
            }
        }
        flush_run(&mut run, self.max_phrase_words, &mut candidates);
        candidates
    }
}

fn flush_run(run: &mut Vec<&str>, max_words: usize, out: &mut Vec<String>) {
    for width in 1..=max_words.min(run.len()) {
        for window in run.windows(width) {
            out.push(window.join(" "));
        }
    }
    run.clear();
}

/// Strips leading/trailing punctuation but keeps characters that are part of
/// technology names when they appear between other word characters.
fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && !"+#".contains(c))
}

fn is_run_breaker(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_digit()) || is_function_word(word)
}

/// Function words that delimit noun phrases. A much smaller set than the
/// normalizer's stopword list — chunk boundaries, not token filtering.
fn is_function_word(word: &str) -> bool {
    const FUNCTION_WORDS: &[&str] = &[
        "a", "an", "and", "are", "as", "at", "by", "for", "from", "in", "is", "of", "on", "or",
        "the", "to", "was", "were", "with",
    ];
    let lower = word.to_lowercase();
    FUNCTION_WORDS.binary_search(&lower.as_str()).is_ok()
}
