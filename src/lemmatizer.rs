use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use crate::error::{Error, Result};
use crate::normalizer::ZWNJ;

pub trait Lemmatizer {
    /// Base form of `word`. Verbs come back as `past#present` stems.
    fn lemmatize(&self, word: &str) -> Result<String>;
}

// Longest first, so "های" is tried before "ها" and "ی".
const SUFFIXES: [&str; 18] = [
    "\u{200c}هایی", "\u{200c}های", "\u{200c}ها", "هایی", "های", "ها",
    "\u{200c}ترین", "ترین", "\u{200c}تر", "تر",
    "ات", "ان", "یی", "ام", "اش", "ی", "م", "ش",
];

const PAST_ENDINGS: [&str; 6] = ["م", "ی", "", "یم", "ید", "ند"];
const PRESENT_ENDINGS: [&str; 6] = ["م", "ی", "د", "یم", "ید", "ند"];

/// Dictionary lemmatizer over a known-word list and a verb stem list.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    words: HashSet<String>,
    verbs: HashMap<String, String>,
}

impl DictionaryLemmatizer {
    /// `verb_stems` entries look like `رفت#رو`.
    pub fn new<W, V>(words: W, verb_stems: V) -> Self
    where
        W: IntoIterator<Item = String>,
        V: IntoIterator<Item = String>,
    {
        let mut verbs = HashMap::new();
        for stems in verb_stems {
            let Some((past, present)) = stems.split_once('#') else {
                warn!("skipping malformed verb stems '{}'", stems);
                continue;
            };
            for form in conjugations(past, present) {
                verbs.entry(form).or_insert_with(|| stems.clone());
            }
        }

        DictionaryLemmatizer {
            words: words.into_iter().collect(),
            verbs,
        }
    }

    /// Loads `words.dat` (word in the first tab-separated field) and
    /// `verbs.dat` (one `past#present` per line).
    pub fn load(words_path: &Path, verbs_path: &Path) -> Result<Self> {
        let words = read_lines(words_path)?
            .into_iter()
            .filter_map(|line| line.split('\t').next().map(|w| w.trim().to_string()))
            .filter(|w| !w.is_empty());
        let verbs = read_lines(verbs_path)?;

        let lemmatizer = Self::new(words, verbs);
        info!(
            "loaded lemmatizer lexicon ({} words, {} verb forms)",
            lemmatizer.words.len(),
            lemmatizer.verbs.len(),
        );
        Ok(lemmatizer)
    }

    fn known_stem(&self, word: &str) -> Option<String> {
        SUFFIXES.iter()
            .filter_map(|suffix| word.strip_suffix(suffix))
            .map(|stem| stem.trim_end_matches(ZWNJ))
            .find(|stem| !stem.is_empty() && self.words.contains(*stem))
            .map(str::to_string)
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn lemmatize(&self, word: &str) -> Result<String> {
        if word.trim().is_empty() {
            return Err(Error::Lemmatization(word.to_string()));
        }

        if self.words.contains(word) {
            return Ok(word.to_string());
        }

        if let Some(stems) = self.verbs.get(word) {
            return Ok(stems.clone());
        }

        Ok(self.known_stem(word).unwrap_or_else(|| word.to_string()))
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)
        .map_err(|e| Error::io(path, e))?
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

fn conjugations(past: &str, present: &str) -> Vec<String> {
    let mut forms = vec![
        format!("{past}ن"),
        format!("{past}ه"),
        format!("ن{past}ه"),
    ];

    for ending in PAST_ENDINGS {
        forms.push(format!("{past}{ending}"));
        forms.push(format!("ن{past}{ending}"));
        forms.push(format!("می{ZWNJ}{past}{ending}"));
        forms.push(format!("نمی{ZWNJ}{past}{ending}"));
    }

    if !present.is_empty() {
        for ending in PRESENT_ENDINGS {
            forms.push(format!("می{ZWNJ}{present}{ending}"));
            forms.push(format!("نمی{ZWNJ}{present}{ending}"));
            forms.push(format!("ب{present}{ending}"));
            forms.push(format!("ن{present}{ending}"));
        }
    }

    forms
}
