use std::{collections::HashMap, path::Path};
use comment_keywords::error::Result;
use comment_keywords::lemmatizer::{DictionaryLemmatizer, Lemmatizer};
use comment_keywords::loader::comments_from_table;
use comment_keywords::stopwords::StopwordSet;
use comment_keywords::table::Table;
use comment_keywords::tagger::{HmmTagger, PosTagger};
use comment_keywords::{Config, KeywordExtractor};

const COMMENTS: &str = "\
id,comment
1,قیمت کرایه اسنپ زیاد شد
2,
3,کرایه اسنپ باکس بالاست
4,سلام ممنون
";

struct LexiconTagger(HashMap<&'static str, &'static str>);

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<(String, String)>> {
        Ok(tokens.iter()
            .map(|t| (t.clone(), self.0.get(t.as_str()).copied().unwrap_or("N").to_string()))
            .collect())
    }
}

struct Identity;

impl Lemmatizer for Identity {
    fn lemmatize(&self, word: &str) -> Result<String> {
        Ok(word.to_string())
    }
}

fn lexicon_tagger() -> LexiconTagger {
    LexiconTagger(HashMap::from([("زیاد", "ADJ"), ("شد", "V"), ("بالاست", "V")]))
}

fn stopwords() -> StopwordSet {
    StopwordSet::from_words(&["سلام", "ممنون", "و", "از"])
}

fn load(csv: &str) -> Vec<comment_keywords::models::Comment> {
    let table = Table::from_reader(csv.as_bytes(), Path::new("comments.csv")).unwrap();
    comments_from_table(&table, "comment", Path::new("comments.csv")).unwrap()
}

#[test]
fn shared_bigram_tops_the_ranking() {
    let config = Config::default();
    let tagger = lexicon_tagger();
    let extractor = KeywordExtractor::with_stopwords(&config, stopwords(), &tagger, &Identity);

    let comments = load(COMMENTS);
    assert_eq!(comments.len(), 3);

    let ranking = extractor.run(comments);

    assert_eq!(ranking.documents, 3);
    assert_eq!(ranking.phrases[0].phrase, "کرایه اسنپ");
    assert!(ranking.phrases[1..].iter().all(|p| p.score < ranking.phrases[0].score));
    assert!(ranking.phrases.len() <= config.extraction.max_features);
    assert!(ranking.top(config.extraction.top_n).len() <= config.extraction.top_n);
}

#[test]
fn pipeline_is_deterministic() {
    let config = Config::default();
    let tagger = lexicon_tagger();
    let extractor = KeywordExtractor::with_stopwords(&config, stopwords(), &tagger, &Identity);

    let first = extractor.run(load(COMMENTS));
    let second = extractor.run(load(COMMENTS));

    assert_eq!(first, second);
}

#[test]
fn filtered_tokens_are_an_ordered_subsequence() {
    let config = Config::default();
    let tagger = lexicon_tagger();
    let extractor = KeywordExtractor::with_stopwords(&config, stopwords(), &tagger, &Identity);

    let comments = extractor.extract_nouns(
        extractor.filter(extractor.tokenize(extractor.normalize(load(COMMENTS)))),
    );

    for comment in &comments {
        let mut tokens = comment.tokens.iter();
        assert!(comment.filtered.iter().all(|f| tokens.any(|t| t == f)));
        assert!(comment.filtered.iter().all(|f| f.chars().count() > 1 && f != "سلام"));
        assert!(comment.nouns.len() <= comment.filtered.len());
    }
    assert!(comments[2].nouns.is_empty());
}

#[test]
fn trained_components_run_end_to_end() {
    let corpus = [
        vec![("قیمت", "N"), ("کرایه", "N"), ("زیاد", "ADJ"), ("شد", "V")],
        vec![("کرایه", "N"), ("اسنپ", "N"), ("باکس", "N"), ("بالاست", "V")],
        vec![("سفرها", "N"), ("کم", "ADJ"), ("شد", "V")],
    ];
    let sentences: Vec<Vec<(String, String)>> = corpus.iter()
        .map(|s| s.iter().map(|(w, t)| (w.to_string(), t.to_string())).collect())
        .collect();

    let tagger = HmmTagger::train(&sentences).unwrap();
    let lemmatizer = DictionaryLemmatizer::new(
        ["قیمت", "کرایه", "اسنپ", "باکس", "سفر"].map(String::from),
        ["شد#شو"].map(String::from),
    );
    let config = Config::default();
    let extractor = KeywordExtractor::with_stopwords(&config, stopwords(), &tagger, &lemmatizer);

    let ranking = extractor.run(load(COMMENTS));

    assert_eq!(ranking.documents, 3);
    assert!(ranking.phrases.iter().any(|p| p.phrase == "کرایه اسنپ"));
    assert!(ranking.phrases.iter().all(|p| !p.phrase.contains("زیاد")));
}
