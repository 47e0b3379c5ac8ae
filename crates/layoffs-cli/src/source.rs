//! Dataset loading from a local file or over HTTP.
//!
//! The load happens once, before the first frame. Any failure is fatal for
//! the session and is returned to `main` with context attached.

use std::{fmt, path::PathBuf, time::Duration};

use anyhow::{Context, Result, anyhow};
use layoffs_core::Dataset;
use reqwest::Client;
use tracing::debug;

/// Where the processed dataset document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
  Path(PathBuf),
  Url(String),
}

impl DatasetSource {
  /// `http://` and `https://` locations are fetched; anything else is a path.
  pub fn parse(raw: &str) -> Self {
    let raw = raw.trim();
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
      Self::Url(raw.to_string())
    } else {
      Self::Path(PathBuf::from(raw))
    }
  }

  pub async fn load(&self) -> Result<Dataset> {
    let bytes = match self {
      Self::Path(path) => tokio::fs::read(path)
        .await
        .with_context(|| format!("reading dataset {}", path.display()))?,
      Self::Url(url) => fetch(url).await?,
    };
    debug!(bytes = bytes.len(), source = %self, "dataset document read");
    Dataset::from_slice(&bytes).with_context(|| format!("decoding dataset from {self}"))
  }
}

impl fmt::Display for DatasetSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Path(path) => write!(f, "{}", path.display()),
      Self::Url(url) => f.write_str(url),
    }
  }
}

async fn fetch(url: &str) -> Result<Vec<u8>> {
  let client = Client::builder()
    .timeout(Duration::from_secs(30))
    .build()
    .context("failed to build HTTP client")?;

  let resp = client
    .get(url)
    .send()
    .await
    .with_context(|| format!("GET {url} failed"))?;

  if !resp.status().is_success() {
    return Err(anyhow!("GET {url} → {}", resp.status()));
  }
  let body = resp.bytes().await.context("reading dataset body")?;
  Ok(body.to_vec())
}
