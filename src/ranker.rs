use std::{collections::BTreeMap, fmt};
use counter::Counter;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseScore {
    pub phrase: String,
    pub score: f64,
}

impl fmt::Display for PhraseScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.4}", self.phrase, self.score)
    }
}

/// Document-by-phrase TF-IDF weights. Rows are sparse `(feature, weight)`
/// pairs and each non-empty row has unit L2 norm.
#[derive(Debug, Clone, Default)]
pub struct TfIdfMatrix {
    pub features: Vec<String>,
    pub idf: Vec<f64>,
    pub rows: Vec<Vec<(usize, f64)>>,
}

impl TfIdfMatrix {
    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.features.len()];
        for row in &self.rows {
            for &(feature, weight) in row {
                sums[feature] += weight;
            }
        }
        sums
    }
}

pub struct PhraseVectorizer {
    min_n: usize,
    max_n: usize,
    max_features: usize,
    word_re: Regex,
}

impl PhraseVectorizer {
    pub fn new(ngram_range: (usize, usize), max_features: usize) -> Self {
        let min_n = ngram_range.0.max(1);
        PhraseVectorizer {
            min_n,
            max_n: ngram_range.1.max(min_n),
            max_features,
            // Runs of two or more letters, digits or underscores. Joiners
            // (ZWNJ) and combining marks separate words.
            word_re: Regex::new(r"[\p{L}\p{N}_]{2,}").unwrap(),
        }
    }

    /// Contiguous word n-grams of the configured lengths, joined by a space.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        let words: Vec<&str> = self.word_re.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut grams = Vec::new();
        for n in self.min_n..=self.max_n.min(words.len()) {
            for window in words.windows(n) {
                grams.push(window.join(" "));
            }
        }
        grams
    }

    pub fn fit_transform(&self, documents: &[String]) -> TfIdfMatrix {
        // Step 1: count phrases per document
        let doc_counts: Vec<Counter<String>> = documents.iter()
            .map(|doc| self.analyze(doc).into_iter().collect())
            .collect();

        // Step 2: corpus frequency and document frequency, ordered by phrase
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for counts in &doc_counts {
            for (phrase, &count) in counts.iter() {
                let entry = stats.entry(phrase.as_str()).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }

        if stats.is_empty() {
            debug!("no phrases found in {} documents", documents.len());
            return TfIdfMatrix {
                rows: vec![Vec::new(); documents.len()],
                ..TfIdfMatrix::default()
            };
        }

        // Step 3: keep the most frequent phrases, ties resolved by phrase order
        let mut vocab: Vec<(&str, (usize, usize))> = stats.into_iter().collect();
        if vocab.len() > self.max_features {
            let mut by_frequency: Vec<usize> = (0..vocab.len()).collect();
            by_frequency.sort_by(|&a, &b| vocab[b].1.0.cmp(&vocab[a].1.0));
            by_frequency.truncate(self.max_features);
            by_frequency.sort_unstable();

            vocab = by_frequency.into_iter().map(|i| vocab[i]).collect();
        }

        // Step 4: smooth idf, ln((1 + n) / (1 + df)) + 1
        let total_docs = documents.len() as f64;
        let features: Vec<String> = vocab.iter().map(|(phrase, _)| phrase.to_string()).collect();
        let idf: Vec<f64> = vocab.iter()
            .map(|(_, (_, doc_freq))| ((1.0 + total_docs) / (1.0 + *doc_freq as f64)).ln() + 1.0)
            .collect();
        let index: BTreeMap<&str, usize> = features.iter()
            .enumerate()
            .map(|(i, phrase)| (phrase.as_str(), i))
            .collect();

        // Step 5: weight rows and normalize them
        let rows = doc_counts.iter()
            .map(|counts| {
                let mut row: Vec<(usize, f64)> = counts.iter()
                    .filter_map(|(phrase, &count)| {
                        index.get(phrase.as_str()).map(|&i| (i, count as f64 * idf[i]))
                    })
                    .collect();
                row.sort_by_key(|&(i, _)| i);

                let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, weight) in row.iter_mut() {
                        *weight /= norm;
                    }
                }
                row
            })
            .collect();

        TfIdfMatrix { features, idf, rows }
    }
}

/// Features by summed weight, highest first. Equal scores keep feature order.
pub fn rank_phrases(matrix: &TfIdfMatrix) -> Vec<PhraseScore> {
    let mut scores: Vec<PhraseScore> = matrix.features.iter()
        .zip(matrix.column_sums())
        .map(|(phrase, score)| PhraseScore { phrase: phrase.clone(), score })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}
