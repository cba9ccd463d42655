use std::io::Write;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::pipeline::Ranking;
use crate::ranker::PhraseScore;

#[derive(Serialize, Debug, Clone)]
pub struct KeywordReport {
    pub generated_at: DateTime<Utc>,
    pub documents: usize,
    pub features: usize,
    pub phrases: Vec<PhraseScore>,
}

impl KeywordReport {
    pub fn new(ranking: &Ranking, top_n: usize) -> Self {
        KeywordReport {
            generated_at: Utc::now(),
            documents: ranking.documents,
            features: ranking.feature_count,
            phrases: ranking.top(top_n).to_vec(),
        }
    }

    /// One `phrase: score` line per phrase.
    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for phrase in &self.phrases {
            writeln!(out, "{}", phrase)?;
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking() -> Ranking {
        Ranking {
            documents: 3,
            feature_count: 3,
            phrases: vec![
                PhraseScore { phrase: "کرایه اسنپ".into(), score: 0.8991 },
                PhraseScore { phrase: "اسنپ باکس".into(), score: 0.63166 },
                PhraseScore { phrase: "قیمت کرایه".into(), score: 0.63166 },
            ],
        }
    }

    #[test]
    fn text_report_lists_top_phrases() {
        let report = KeywordReport::new(&ranking(), 2);
        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "کرایه اسنپ: 0.8991\nاسنپ باکس: 0.6317\n",
        );
    }

    #[test]
    fn json_report_carries_counts() {
        let report = KeywordReport::new(&ranking(), 40);
        let mut out = Vec::new();
        report.write_json(&mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["documents"], 3);
        assert_eq!(value["features"], 3);
        assert_eq!(value["phrases"].as_array().unwrap().len(), 3);
        assert_eq!(value["phrases"][0]["phrase"], "کرایه اسنپ");
        assert!(value["generated_at"].is_string());
    }
}
