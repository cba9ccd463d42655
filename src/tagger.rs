use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::error::{Error, Result};

pub type TaggedSentence = Vec<(String, String)>;

/// Sequence tagger: the tag of a token may depend on its neighbours, so
/// callers pass the whole sentence and get one `(token, tag)` per token back.
pub trait PosTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<(String, String)>>;
}

const SMOOTHING: f64 = 0.1;
const LOG_FLOOR: f64 = -30.0;
const MAX_SUFFIX_LEN: usize = 3;
const RARE_WORD_COUNT: usize = 1;

/// Raw counts of a first-order HMM, as stored on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TaggerModel {
    pub tags: Vec<String>,
    pub start: Vec<usize>,
    pub transitions: Vec<Vec<usize>>,
    pub tag_counts: Vec<usize>,
    pub words: BTreeMap<String, Vec<usize>>,
    pub suffixes: BTreeMap<String, Vec<usize>>,
    pub unknown: Vec<usize>,
}

impl TaggerModel {
    pub fn train(sentences: &[TaggedSentence]) -> Self {
        // Step 1: collect the tag set
        let tags: Vec<String> = sentences.iter()
            .flatten()
            .map(|(_, tag)| tag.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<&str, usize> = tags.iter()
            .enumerate()
            .map(|(i, tag)| (tag.as_str(), i))
            .collect();
        let n = tags.len();

        let mut model = TaggerModel {
            tags: tags.clone(),
            start: vec![0; n],
            transitions: vec![vec![0; n]; n],
            tag_counts: vec![0; n],
            words: BTreeMap::new(),
            suffixes: BTreeMap::new(),
            unknown: vec![0; n],
        };

        // Step 2: count starts, transitions and emissions
        for sentence in sentences {
            let mut previous: Option<usize> = None;
            for (word, tag) in sentence {
                let t = index[tag.as_str()];
                match previous {
                    None => model.start[t] += 1,
                    Some(p) => model.transitions[p][t] += 1,
                }
                model.tag_counts[t] += 1;
                model.words.entry(word.clone()).or_insert_with(|| vec![0; n])[t] += 1;
                previous = Some(t);
            }
        }

        // Step 3: rare words stand in for unknown ones
        for (word, counts) in &model.words {
            if counts.iter().sum::<usize>() > RARE_WORD_COUNT {
                continue;
            }
            for (t, &count) in counts.iter().enumerate() {
                model.unknown[t] += count;
            }

            let chars: Vec<char> = word.chars().collect();
            for len in 1..=MAX_SUFFIX_LEN.min(chars.len().saturating_sub(1)) {
                let suffix: String = chars[chars.len() - len..].iter().collect();
                let entry = model.suffixes.entry(suffix).or_insert_with(|| vec![0; n]);
                for (t, &count) in counts.iter().enumerate() {
                    entry[t] += count;
                }
            }
        }

        model
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        serde_json::to_writer(BufWriter::new(file), self).map_err(|e| Error::model(path, e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::model(path, e))
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let n = self.tags.len();
        if n == 0 {
            return Err("model has no tags".to_string());
        }
        if self.start.len() != n || self.tag_counts.len() != n || self.unknown.len() != n {
            return Err(format!("tag vectors must have {} entries", n));
        }
        if self.transitions.len() != n || self.transitions.iter().any(|row| row.len() != n) {
            return Err(format!("transition matrix must be {n}x{n}"));
        }
        if let Some((word, _)) = self.words.iter().chain(self.suffixes.iter()).find(|(_, c)| c.len() != n) {
            return Err(format!("counts for '{}' must have {} entries", word, n));
        }
        Ok(())
    }
}

/// HMM part-of-speech tagger decoded with Viterbi. Unknown words are scored
/// from the tag distribution of rare training words sharing their suffix.
#[derive(Debug, Clone)]
pub struct HmmTagger {
    tags: Vec<String>,
    log_start: Vec<f64>,
    log_transitions: Vec<Vec<f64>>,
    log_emissions: HashMap<String, Vec<f64>>,
    suffix_scores: HashMap<String, Vec<f64>>,
    unknown_scores: Vec<f64>,
}

impl HmmTagger {
    pub fn from_model(model: &TaggerModel) -> std::result::Result<Self, String> {
        model.validate()?;
        let n = model.tags.len();
        let total_tokens: usize = model.tag_counts.iter().sum();

        let log_prior: Vec<f64> = model.tag_counts.iter()
            .map(|&c| smoothed(c, total_tokens, n).ln())
            .collect();

        let start_total: usize = model.start.iter().sum();
        let log_start = model.start.iter()
            .map(|&c| smoothed(c, start_total, n).ln())
            .collect();

        let log_transitions = model.transitions.iter()
            .map(|row| {
                let row_total: usize = row.iter().sum();
                row.iter().map(|&c| smoothed(c, row_total, n).ln()).collect()
            })
            .collect();

        let log_emissions = model.words.iter()
            .map(|(word, counts)| {
                let scores = counts.iter()
                    .zip(&model.tag_counts)
                    .map(|(&c, &tag_total)| {
                        if c == 0 { LOG_FLOOR } else { (c as f64 / tag_total as f64).ln() }
                    })
                    .collect();
                (word.clone(), scores)
            })
            .collect();

        // P(word | tag) is proportional to P(tag | suffix) / P(tag)
        let relative_to_prior = |counts: &[usize]| -> Vec<f64> {
            let total: usize = counts.iter().sum();
            counts.iter()
                .zip(&log_prior)
                .map(|(&c, prior)| smoothed(c, total, n).ln() - prior)
                .collect()
        };

        let suffix_scores = model.suffixes.iter()
            .map(|(suffix, counts)| (suffix.clone(), relative_to_prior(counts)))
            .collect();
        let unknown_scores = relative_to_prior(&model.unknown);

        Ok(HmmTagger {
            tags: model.tags.clone(),
            log_start,
            log_transitions,
            log_emissions,
            suffix_scores,
            unknown_scores,
        })
    }

    pub fn train(sentences: &[TaggedSentence]) -> Result<Self> {
        Self::from_model(&TaggerModel::train(sentences)).map_err(Error::Training)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let model = TaggerModel::load(path)?;
        let tagger = Self::from_model(&model).map_err(|reason| Error::model(path, reason))?;

        info!(
            "loaded POS tagger from {} ({} tags, {} known words)",
            path.display(),
            tagger.tags.len(),
            tagger.log_emissions.len(),
        );

        Ok(tagger)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    fn emission(&self, token: &str) -> Vec<f64> {
        if let Some(scores) = self.log_emissions.get(token) {
            return scores.clone();
        }

        let chars: Vec<char> = token.chars().collect();
        for len in (1..=MAX_SUFFIX_LEN.min(chars.len().saturating_sub(1))).rev() {
            let suffix: String = chars[chars.len() - len..].iter().collect();
            if let Some(scores) = self.suffix_scores.get(&suffix) {
                return scores.clone();
            }
        }

        self.unknown_scores.clone()
    }

    fn viterbi(&self, tokens: &[String]) -> Vec<usize> {
        let n = self.tags.len();
        let mut scores: Vec<Vec<f64>> = Vec::with_capacity(tokens.len());
        let mut backpointers: Vec<Vec<usize>> = Vec::with_capacity(tokens.len());

        let first = self.emission(&tokens[0]);
        scores.push((0..n).map(|t| self.log_start[t] + first[t]).collect());
        backpointers.push(vec![0; n]);

        for token in &tokens[1..] {
            let emission = self.emission(token);
            let previous = &scores[scores.len() - 1];

            let mut row = vec![f64::NEG_INFINITY; n];
            let mut pointers = vec![0; n];
            for t in 0..n {
                for p in 0..n {
                    let score = previous[p] + self.log_transitions[p][t];
                    if score > row[t] {
                        row[t] = score;
                        pointers[t] = p;
                    }
                }
                row[t] += emission[t];
            }

            scores.push(row);
            backpointers.push(pointers);
        }

        let mut best = argmax(&scores[scores.len() - 1]);
        let mut path = vec![best; tokens.len()];
        for i in (1..tokens.len()).rev() {
            best = backpointers[i][best];
            path[i - 1] = best;
        }
        path
    }
}

impl PosTagger for HmmTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<(String, String)>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        Ok(tokens.iter()
            .zip(self.viterbi(tokens))
            .map(|(token, t)| (token.clone(), self.tags[t].clone()))
            .collect())
    }
}

fn smoothed(count: usize, total: usize, outcomes: usize) -> f64 {
    (count as f64 + SMOOTHING) / (total as f64 + SMOOTHING * outcomes as f64)
}

fn argmax(values: &[f64]) -> usize {
    values.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

/// Reads `token<TAB>tag` lines; a blank line ends a sentence.
pub fn read_tagged_corpus(path: &Path) -> Result<Vec<TaggedSentence>> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_tagged_corpus(&content, path)
}

pub fn parse_tagged_corpus(content: &str, source: &Path) -> Result<Vec<TaggedSentence>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }

        let (token, tag) = line.trim_end()
            .rsplit_once('\t')
            .or_else(|| line.trim_end().rsplit_once(' '))
            .map(|(token, tag)| (token.trim(), tag.trim()))
            .filter(|(token, tag)| !token.is_empty() && !tag.is_empty())
            .ok_or_else(|| Error::Corpus { path: source.to_path_buf(), line: i + 1 })?;

        current.push((token.to_string(), tag.to_string()));
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "\
کرایه\tN
زیاد\tADJ
است\tV

قیمت\tN
کم\tADJ
است\tV

کرایه\tN
اسنپ\tN
کم\tADJ
شد\tV

سفر\tN
خوب\tADJ
بود\tV
";

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn trained() -> HmmTagger {
        let sentences = parse_tagged_corpus(CORPUS, Path::new("corpus.tsv")).unwrap();
        HmmTagger::train(&sentences).unwrap()
    }

    fn tags_of(tagged: Vec<(String, String)>) -> Vec<String> {
        tagged.into_iter().map(|(_, tag)| tag).collect()
    }

    #[test]
    fn corpus_is_split_into_sentences() {
        let sentences = parse_tagged_corpus(CORPUS, Path::new("corpus.tsv")).unwrap();
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[2][1], ("اسنپ".to_string(), "N".to_string()));
    }

    #[test]
    fn malformed_corpus_line_is_reported() {
        let err = parse_tagged_corpus("کرایه\tN\nبدون_برچسب\n", Path::new("corpus.tsv")).unwrap_err();
        assert!(matches!(err, Error::Corpus { line: 2, .. }));
    }

    #[test]
    fn tags_known_words() {
        let tagger = trained();
        let tagged = tagger.tag(&tokens(&["قیمت", "زیاد", "است"])).unwrap();

        assert_eq!(tagged[0].0, "قیمت");
        assert_eq!(tags_of(tagged), vec!["N", "ADJ", "V"]);
    }

    #[test]
    fn unknown_word_is_tagged_from_context() {
        let tagger = trained();
        let tagged = tagger.tag(&tokens(&["کرایه", "ناشناخته", "است"])).unwrap();
        assert_eq!(tags_of(tagged), vec!["N", "ADJ", "V"]);
    }

    #[test]
    fn empty_sequence_has_no_tags() {
        assert!(trained().tag(&[]).unwrap().is_empty());
    }

    #[test]
    fn model_survives_save_and_load() {
        let sentences = parse_tagged_corpus(CORPUS, Path::new("corpus.tsv")).unwrap();
        let model = TaggerModel::train(&sentences);
        let path = std::env::temp_dir().join(format!("pos_tagger_{}.json", std::process::id()));

        model.save(&path).unwrap();
        let loaded = HmmTagger::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.tags(), ["ADJ", "N", "V"]);
        assert_eq!(
            tags_of(loaded.tag(&tokens(&["سفر", "کم", "بود"])).unwrap()),
            vec!["N", "ADJ", "V"],
        );
    }

    #[test]
    fn inconsistent_model_is_rejected() {
        let mut model = TaggerModel::train(&parse_tagged_corpus(CORPUS, Path::new("c")).unwrap());
        model.start.pop();
        assert!(HmmTagger::from_model(&model).is_err());
        assert!(HmmTagger::from_model(&TaggerModel::default()).is_err());
    }

    #[test]
    fn empty_corpus_cannot_be_trained() {
        let err = HmmTagger::train(&[]).unwrap_err();
        assert!(matches!(err, Error::Training(_)));
        assert!(err.to_string().contains("no tags"));
    }
}
