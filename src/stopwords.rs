//! Stopword set and the stopword/length token filter.

use std::collections::HashSet;
use stop_words::{get, LANGUAGE};

/// Immutable set of words removed before POS tagging.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// Standard Persian list extended with domain-specific additions.
    pub fn persian_with<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut words: HashSet<String> = get(LANGUAGE::Persian).iter().map(|s| s.to_string()).collect();
        words.extend(extra.iter().map(|w| w.as_ref().to_string()));
        Self { words }
    }

    /// A set built only from the given words, without the standard list.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            words: words.iter().map(|w| w.as_ref().to_string()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Drops stopwords and tokens of at most one character, keeping order.
    pub fn filter_tokens(&self, tokens: &[String]) -> Vec<String> {
        tokens.iter()
            .filter(|token| token.chars().count() > 1 && !self.contains(token))
            .cloned()
            .collect()
    }
}
