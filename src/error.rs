use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  /// Positional counts for a phoneme add up to more than its total count.
  #[error("invalid phoneme counts for {phoneme}: total {total} is less than positional sum {positional}")]
  Validation {
    phoneme: String,
    total: usize,
    positional: usize
  },

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("IO error on {path}: {source}")]
  IoAt {
    path: PathBuf,
    #[source]
    source: std::io::Error
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("cache entry {path} has schema version {found}, expected {expected}")]
  CacheVersion {
    path: PathBuf,
    found: u32,
    expected: u32
  },

  #[error("malformed dictionary line {line}: {content:?}")]
  DictionaryFormat {
    line: usize,
    content: String
  },
}

impl Error {
  pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Error::IoAt { path: path.into(), source }
  }
}
