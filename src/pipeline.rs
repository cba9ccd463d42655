use tracing::info;
use crate::config::Config;
use crate::lemmatizer::Lemmatizer;
use crate::models::{Comment, FilteredComment, NormalizedComment, NounComment, TokenizedComment};
use crate::normalizer::Normalizer;
use crate::nouns::NounSelector;
use crate::ranker::{rank_phrases, PhraseScore, PhraseVectorizer};
use crate::stopwords::StopwordSet;
use crate::tagger::PosTagger;
use crate::tokenizer::WordTokenizer;

/// Ranked phrases of one run together with the corpus statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub documents: usize,
    pub feature_count: usize,
    pub phrases: Vec<PhraseScore>,
}

impl Ranking {
    pub fn top(&self, n: usize) -> &[PhraseScore] {
        &self.phrases[..n.min(self.phrases.len())]
    }
}

pub struct KeywordExtractor<'a> {
    normalizer: Normalizer,
    tokenizer: WordTokenizer,
    stopwords: StopwordSet,
    nouns: NounSelector<'a>,
    vectorizer: PhraseVectorizer,
}

impl<'a> KeywordExtractor<'a> {
    /// Extractor with the Persian stopword list plus the configured additions.
    pub fn new(config: &Config, tagger: &'a dyn PosTagger, lemmatizer: &'a dyn Lemmatizer) -> Self {
        let stopwords = StopwordSet::persian_with(&config.extraction.custom_stopwords);
        info!("using {} stopwords", stopwords.len());
        Self::with_stopwords(config, stopwords, tagger, lemmatizer)
    }

    pub fn with_stopwords(
        config: &Config,
        stopwords: StopwordSet,
        tagger: &'a dyn PosTagger,
        lemmatizer: &'a dyn Lemmatizer,
    ) -> Self {
        let extraction = &config.extraction;
        KeywordExtractor {
            normalizer: Normalizer::new(config.normalizer.clone()),
            tokenizer: WordTokenizer::new(),
            stopwords,
            nouns: NounSelector::new(tagger, lemmatizer, extraction),
            vectorizer: PhraseVectorizer::new(extraction.ngram_range, extraction.max_features),
        }
    }

    pub fn normalize(&self, comments: Vec<Comment>) -> Vec<NormalizedComment> {
        info!("normalizing {} comments", comments.len());
        comments.into_iter()
            .map(|comment| {
                let normalized = self.normalizer.normalize(&comment.text);
                comment.normalized(normalized)
            })
            .collect()
    }

    pub fn tokenize(&self, comments: Vec<NormalizedComment>) -> Vec<TokenizedComment> {
        let tokenized: Vec<TokenizedComment> = comments.into_iter()
            .map(|comment| {
                let tokens = self.tokenizer.tokenize(&comment.normalized);
                comment.tokenized(tokens)
            })
            .collect();

        let total: usize = tokenized.iter().map(|c| c.tokens.len()).sum();
        info!("tokenized {} comments into {} tokens", tokenized.len(), total);
        tokenized
    }

    pub fn filter(&self, comments: Vec<TokenizedComment>) -> Vec<FilteredComment> {
        let filtered: Vec<FilteredComment> = comments.into_iter()
            .map(|comment| {
                let kept = self.stopwords.filter_tokens(&comment.tokens);
                comment.filtered(kept)
            })
            .collect();

        let total: usize = filtered.iter().map(|c| c.filtered.len()).sum();
        info!("{} tokens left after stopword and length filtering", total);
        filtered
    }

    pub fn extract_nouns(&self, comments: Vec<FilteredComment>) -> Vec<NounComment> {
        let with_nouns: Vec<NounComment> = comments.into_iter()
            .map(|comment| {
                let nouns = self.nouns.select(&comment.filtered);
                comment.with_nouns(nouns)
            })
            .collect();

        let total: usize = with_nouns.iter().map(|c| c.nouns.len()).sum();
        let empty = with_nouns.iter().filter(|c| c.nouns.is_empty()).count();
        info!("kept {} noun lemmas ({} comments without nouns)", total, empty);
        with_nouns
    }

    pub fn rank(&self, comments: &[NounComment]) -> Ranking {
        let documents: Vec<String> = comments.iter().map(NounComment::document).collect();
        let matrix = self.vectorizer.fit_transform(&documents);
        info!("vectorized {} documents over {} phrases", matrix.n_documents(), matrix.features.len());

        Ranking {
            documents: matrix.n_documents(),
            feature_count: matrix.features.len(),
            phrases: rank_phrases(&matrix),
        }
    }

    /// Runs every stage in order over the loaded comments.
    pub fn run(&self, comments: Vec<Comment>) -> Ranking {
        let normalized = self.normalize(comments);
        let tokenized = self.tokenize(normalized);
        let filtered = self.filter(tokenized);
        let nouns = self.extract_nouns(filtered);
        self.rank(&nouns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    struct NounTagger;

    impl PosTagger for NounTagger {
        fn tag(&self, tokens: &[String]) -> Result<Vec<(String, String)>> {
            Ok(tokens.iter().map(|t| (t.clone(), "N".to_string())).collect())
        }
    }

    struct Identity;

    impl Lemmatizer for Identity {
        fn lemmatize(&self, word: &str) -> Result<String> {
            Ok(word.to_string())
        }
    }

    fn comments(texts: &[&str]) -> Vec<Comment> {
        texts.iter()
            .enumerate()
            .map(|(row, text)| Comment { row, text: text.to_string() })
            .collect()
    }

    fn extractor<'a>(tagger: &'a NounTagger, lemmatizer: &'a Identity) -> KeywordExtractor<'a> {
        KeywordExtractor::with_stopwords(
            &Config::default(),
            StopwordSet::from_words(&["و", "از", "سلام"]),
            tagger,
            lemmatizer,
        )
    }

    #[test]
    fn stages_carry_rows_forward() {
        let extractor = extractor(&NounTagger, &Identity);

        let normalized = extractor.normalize(comments(&["سلام كرايه زياده"]));
        assert_eq!(normalized[0].normalized, "سلام کرایه زیاده");

        let filtered = extractor.filter(extractor.tokenize(normalized));
        assert_eq!(filtered[0].tokens, vec!["سلام", "کرایه", "زیاده"]);
        assert_eq!(filtered[0].filtered, vec!["کرایه", "زیاده"]);

        let nouns = extractor.extract_nouns(filtered);
        assert_eq!(nouns[0].row, 0);
        assert_eq!(nouns[0].text, "سلام كرايه زياده");
        assert_eq!(nouns[0].document(), "کرایه زیاده");
    }

    #[test]
    fn run_ranks_shared_phrase_first() {
        let extractor = extractor(&NounTagger, &Identity);
        let ranking = extractor.run(comments(&["قیمت کرایه اسنپ", "کرایه اسنپ باکس", "سلام"]));

        assert_eq!(ranking.documents, 3);
        assert_eq!(ranking.phrases[0].phrase, "کرایه اسنپ");
        assert_eq!(ranking.top(2).len(), 2);
        assert_eq!(ranking.top(100).len(), ranking.phrases.len());
        assert!(ranking.phrases.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn no_phrases_is_an_empty_ranking() {
        let extractor = extractor(&NounTagger, &Identity);
        let ranking = extractor.run(comments(&["سلام", "کرایه"]));

        assert_eq!(ranking.documents, 2);
        assert_eq!(ranking.feature_count, 0);
        assert!(ranking.top(40).is_empty());
    }
}
