pub mod config;
pub mod error;
pub mod labeling;
pub mod lemmatizer;
pub mod loader;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod nouns;
pub mod pipeline;
pub mod ranker;
pub mod report;
pub mod stopwords;
pub mod table;
pub mod tagger;
pub mod tokenizer;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{KeywordExtractor, Ranking};
