//! Error types for `layoffs-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed dataset: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("failed to read dataset: {0}")]
  Io(#[from] std::io::Error),

  #[error("unknown industry: {0:?}")]
  UnknownIndustry(String),

  #[error("unknown country: {0:?}")]
  UnknownCountry(String),

  #[error("unknown funding stage: {0:?}")]
  UnknownStage(String),

  #[error("no events recorded in year {0}")]
  UnknownYear(i32),

  #[error("not a year: {0:?}")]
  InvalidYear(String),

  #[error("unknown layoff size bucket: {0:?}")]
  InvalidSize(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
