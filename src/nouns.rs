use std::slice;
use tracing::{debug, warn};
use crate::config::ExtractionConfig;
use crate::lemmatizer::Lemmatizer;
use crate::tagger::PosTagger;

/// Keeps noun tokens and reduces them to their lemma.
///
/// Tagger and lemmatizer are best-effort: a token that cannot be tagged or
/// lemmatized is dropped, the rest of the comment is kept.
pub struct NounSelector<'a> {
    tagger: &'a dyn PosTagger,
    lemmatizer: &'a dyn Lemmatizer,
    noun_prefix: String,
    noun_tag: String,
    compound_marker: char,
}

impl<'a> NounSelector<'a> {
    pub fn new(tagger: &'a dyn PosTagger, lemmatizer: &'a dyn Lemmatizer, config: &ExtractionConfig) -> Self {
        NounSelector {
            tagger,
            lemmatizer,
            noun_prefix: config.noun_tag_prefix.clone(),
            noun_tag: config.noun_tag_exact.clone(),
            compound_marker: config.compound_marker,
        }
    }

    pub fn select(&self, tokens: &[String]) -> Vec<String> {
        self.tag_tokens(tokens)
            .into_iter()
            .filter(|(_, tag)| self.is_noun(tag))
            .filter_map(|(token, _)| self.base_form(&token))
            .collect()
    }

    pub fn is_noun(&self, tag: &str) -> bool {
        tag.starts_with(&self.noun_prefix) || tag == self.noun_tag
    }

    fn tag_tokens(&self, tokens: &[String]) -> Vec<(String, String)> {
        if tokens.is_empty() {
            return Vec::new();
        }

        match self.tagger.tag(tokens) {
            Ok(tagged) if tagged.len() == tokens.len() => {
                tokens.iter().cloned().zip(tagged.into_iter().map(|(_, tag)| tag)).collect()
            }
            Ok(tagged) => {
                warn!("tagger returned {} tags for {} tokens, tagging one by one", tagged.len(), tokens.len());
                self.tag_each(tokens)
            }
            Err(err) => {
                debug!("sequence tagging failed ({}), tagging one by one", err);
                self.tag_each(tokens)
            }
        }
    }

    fn tag_each(&self, tokens: &[String]) -> Vec<(String, String)> {
        tokens.iter()
            .filter_map(|token| match self.tagger.tag(slice::from_ref(token)) {
                Ok(mut tagged) if tagged.len() == 1 => tagged.pop().map(|(_, tag)| (token.clone(), tag)),
                Ok(_) => {
                    debug!("dropping token '{}': no tag returned", token);
                    None
                }
                Err(err) => {
                    debug!("dropping token '{}': {}", token, err);
                    None
                }
            })
            .collect()
    }

    fn base_form(&self, token: &str) -> Option<String> {
        match self.lemmatizer.lemmatize(token) {
            Ok(lemma) => {
                let base = lemma.split(self.compound_marker).next().unwrap_or_default().trim();
                if base.is_empty() {
                    debug!("dropping token '{}': empty lemma '{}'", token, lemma);
                    None
                } else {
                    Some(base.to_string())
                }
            }
            Err(err) => {
                debug!("dropping token '{}': {}", token, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use super::*;
    use crate::error::{Error, Result};

    struct LexiconTagger {
        tags: HashMap<String, String>,
        broken: Option<String>,
    }

    impl LexiconTagger {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                tags: entries.iter().map(|(w, t)| (w.to_string(), t.to_string())).collect(),
                broken: None,
            }
        }

        fn failing_on(mut self, token: &str) -> Self {
            self.broken = Some(token.to_string());
            self
        }
    }

    impl PosTagger for LexiconTagger {
        fn tag(&self, tokens: &[String]) -> Result<Vec<(String, String)>> {
            if let Some(broken) = &self.broken {
                if tokens.contains(broken) {
                    return Err(Error::Tagging(format!("cannot tag '{broken}'")));
                }
            }
            Ok(tokens.iter()
                .map(|t| (t.clone(), self.tags.get(t).cloned().unwrap_or_else(|| "N".to_string())))
                .collect())
        }
    }

    struct ShortTagger;

    impl PosTagger for ShortTagger {
        fn tag(&self, tokens: &[String]) -> Result<Vec<(String, String)>> {
            Ok(tokens.iter().take(1).map(|t| (t.clone(), "N".to_string())).collect())
        }
    }

    struct MapLemmatizer(HashMap<String, String>);

    impl Lemmatizer for MapLemmatizer {
        fn lemmatize(&self, word: &str) -> Result<String> {
            if word == "خراب" {
                return Err(Error::Lemmatization(word.to_string()));
            }
            Ok(self.0.get(word).cloned().unwrap_or_else(|| word.to_string()))
        }
    }

    fn lemmas(entries: &[(&str, &str)]) -> MapLemmatizer {
        MapLemmatizer(entries.iter().map(|(w, l)| (w.to_string(), l.to_string())).collect())
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn keeps_nouns_and_lemmatizes_them() {
        let tagger = LexiconTagger::new(&[("زیاد", "ADJ"), ("رفتند", "V"), ("اسنپ", "Ne")]);
        let lemmatizer = lemmas(&[("کرایه\u{200c}ها", "کرایه"), ("رفتند", "رفت#رو")]);
        let selector = NounSelector::new(&tagger, &lemmatizer, &ExtractionConfig::default());

        let input = tokens(&["کرایه\u{200c}ها", "زیاد", "اسنپ", "رفتند"]);
        let nouns = selector.select(&input);

        assert_eq!(nouns, tokens(&["کرایه", "اسنپ"]));
        assert!(nouns.len() <= input.len());
    }

    #[test]
    fn compound_lemma_keeps_part_before_marker() {
        let tagger = LexiconTagger::new(&[]);
        let lemmatizer = lemmas(&[("سفرها", "سفر#ها")]);
        let selector = NounSelector::new(&tagger, &lemmatizer, &ExtractionConfig::default());

        assert_eq!(selector.select(&tokens(&["سفرها"])), tokens(&["سفر"]));
    }

    #[test]
    fn failing_token_is_dropped_not_the_row() {
        let tagger = LexiconTagger::new(&[]).failing_on("؟؟");
        let lemmatizer = lemmas(&[]);
        let selector = NounSelector::new(&tagger, &lemmatizer, &ExtractionConfig::default());

        let nouns = selector.select(&tokens(&["کرایه", "؟؟", "اسنپ", "خراب"]));

        assert_eq!(nouns, tokens(&["کرایه", "اسنپ"]));
    }

    #[test]
    fn misaligned_tagging_falls_back_to_single_tokens() {
        let lemmatizer = lemmas(&[]);
        let selector = NounSelector::new(&ShortTagger, &lemmatizer, &ExtractionConfig::default());

        assert_eq!(selector.select(&tokens(&["قیمت", "کرایه"])), tokens(&["قیمت", "کرایه"]));
    }

    #[test]
    fn empty_lemma_is_dropped() {
        let tagger = LexiconTagger::new(&[]);
        let lemmatizer = lemmas(&[("مبهم", "#مبهم")]);
        let selector = NounSelector::new(&tagger, &lemmatizer, &ExtractionConfig::default());

        assert!(selector.select(&tokens(&["مبهم"])).is_empty());
    }

    #[test]
    fn noun_markers_follow_config() {
        let tagger = LexiconTagger::new(&[]);
        let lemmatizer = lemmas(&[]);
        let selector = NounSelector::new(&tagger, &lemmatizer, &ExtractionConfig::default());

        assert!(selector.is_noun("N"));
        assert!(selector.is_noun("NOUN"));
        assert!(selector.is_noun("Ne"));
        assert!(!selector.is_noun("ADJ"));
        assert!(!selector.is_noun("V"));
    }
}
