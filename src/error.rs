use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TechfindError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed corpus data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown search algorithm '{0}' (expected brute_force, kmp, boyer_moore or fuzzy)")]
    UnknownAlgorithm(String),

    #[error("Failed to load corpus '{path}': {source}")]
    CorpusLoad {
        path: PathBuf,
        #[source]
        source: Box<TechfindError>,
    },

    #[error("Duplicate technique id: {0}")]
    DuplicateId(String),

    #[error("Technique not found: {0}")]
    TechniqueNotFound(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TechfindError>;
