use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot use spreadsheet {}: {reason}", path.display())]
    Spreadsheet { path: PathBuf, reason: String },

    #[error("column '{column}' not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("label column '{column}' has non-integer value '{value}' at row {row}")]
    InvalidLabel {
        column: String,
        row: usize,
        value: String,
    },

    #[error("cannot sample {requested} rows from a table of {available}")]
    SampleTooLarge { requested: usize, available: usize },

    #[error("invalid model {}: {reason}", path.display())]
    Model { path: PathBuf, reason: String },

    #[error("malformed tagged corpus {} at line {line}: expected '<token>\\t<tag>'", path.display())]
    Corpus { path: PathBuf, line: usize },

    #[error("cannot train tagger: {0}")]
    Training(String),

    #[error("tagging failed: {0}")]
    Tagging(String),

    #[error("lemmatization failed for '{0}'")]
    Lemmatization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Error::Csv { path: path.into(), source }
    }

    pub fn spreadsheet(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Spreadsheet { path: path.into(), reason: reason.to_string() }
    }

    pub fn model(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Model { path: path.into(), reason: reason.to_string() }
    }
}
