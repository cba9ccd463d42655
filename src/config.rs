use std::{env, fs::read_to_string};
use std::path::{Path, PathBuf};
use tracing::warn;
use serde::Deserialize;

const DATA_PATH_VAR: &str = "DATA_PATH";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

pub const DEFAULT_LABEL_COLUMNS: [&str; 12] = [
    "Pricing", "Fuel", "Cancelation", "Incentive", "Commission",
    "Desired Destination", "App", "Insurance", "Instant Cashout",
    "Equipment", "call center", "Other",
];

// Frequent courtesy words and trend verbs that dominate driver comments
// without naming a topic.
pub const DEFAULT_CUSTOM_STOPWORDS: [&str; 5] = ["سلام", "ممنون", "خواهش", "افزایش", "کاهش"];

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub text_column: String,
    pub normalizer: NormalizerConfig,
    pub extraction: ExtractionConfig,
    pub labeling: LabelingConfig,
    pub resources: ResourcesConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NormalizerConfig {
    pub persian_numbers: bool,
    pub punctuation_spacing: bool,
    pub affix_spacing: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ExtractionConfig {
    pub input_file: String,
    pub custom_stopwords: Vec<String>,
    pub noun_tag_prefix: String,
    pub noun_tag_exact: String,
    pub compound_marker: char,
    pub ngram_range: (usize, usize),
    pub max_features: usize,
    pub top_n: usize,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LabelingConfig {
    pub raw_file: String,
    pub sample_file: String,
    pub remainder_file: String,
    pub annotated_file: String,
    pub labeled_file: String,
    pub sample_size: usize,
    pub seed: u64,
    pub label_columns: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ResourcesConfig {
    pub tagger_model: String,
    pub words: String,
    pub verbs: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            text_column: "comment".to_owned(),
            normalizer: NormalizerConfig::default(),
            extraction: ExtractionConfig::default(),
            labeling: LabelingConfig::default(),
            resources: ResourcesConfig::default(),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            persian_numbers: true,
            punctuation_spacing: true,
            affix_spacing: true,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            input_file: "comments.xlsx".to_owned(),
            custom_stopwords: DEFAULT_CUSTOM_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            noun_tag_prefix: "N".to_owned(),
            noun_tag_exact: "Ne".to_owned(),
            compound_marker: '#',
            ngram_range: (2, 5),
            max_features: 1000,
            top_n: 40,
        }
    }
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            raw_file: "raw_comments.xlsx".to_owned(),
            sample_file: "sampled_for_labeling.csv".to_owned(),
            remainder_file: "without_sampled.xlsx".to_owned(),
            annotated_file: "raw_labeled_comments.xlsx".to_owned(),
            labeled_file: "labeled_comments.xlsx".to_owned(),
            sample_size: 200,
            seed: 42,
            label_columns: DEFAULT_LABEL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            tagger_model: "resources/pos_tagger.json".to_owned(),
            words: "resources/words.dat".to_owned(),
            verbs: "resources/verbs.dat".to_owned(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    env::var_os(DATA_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data"))
}

impl Config {
    /// Reads `./config.toml` (or the given file). A missing or unparsable
    /// file is not fatal: the defaults are used and a warning is logged.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

        read_to_string(path)
            .map_err(|err| err.to_string())
            .and_then(|v| Self::from_toml(&v))
            .unwrap_or_else(|err| {
                warn!("failed to read config {}: {}", path.display(), err);
                Config::default()
            })
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|err| err.to_string())
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}
