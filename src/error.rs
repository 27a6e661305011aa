use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("database error: {0}")]
    Database(#[from] postgres::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("destination category '{0}' not found in urban_dest_summary")]
    MissingCategory(String),

    #[error("duplicate entry for city '{city}' and category '{category}'")]
    DuplicateEntry { city: String, category: String },

    /// Uniform wrapper for anything that goes wrong while loading or reshaping.
    #[error("An error occurred: {0}")]
    Generation(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Wrap a load/reshape failure, keeping only the original message.
    pub fn wrap(err: ReportError) -> ReportError {
        match err {
            already @ ReportError::Generation(_) => already,
            other => ReportError::Generation(other.to_string()),
        }
    }
}
