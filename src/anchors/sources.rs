// Concrete anchor sources: a fixed list, a local CSV, and a remote sheet export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::traits::AnchorSource;
use super::SuspiciousAnchorSet;
use crate::ingest::decode_text;

/// A fixed phrase list, for tests and embedding.
pub struct StaticAnchors {
    phrases: Vec<String>,
}

impl StaticAnchors {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl AnchorSource for StaticAnchors {
    fn describe(&self) -> String {
        format!("static list ({} phrases)", self.phrases.len())
    }

    async fn load(&self) -> Result<SuspiciousAnchorSet> {
        Ok(SuspiciousAnchorSet::from_phrases(&self.phrases))
    }
}

/// A CSV file on disk with an `anchor_text` column.
pub struct CsvFileAnchors {
    path: PathBuf,
}

impl CsvFileAnchors {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AnchorSource for CsvFileAnchors {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<SuspiciousAnchorSet> {
        let name = self.describe();
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read anchor list {name}"))?;
        let text = decode_text(&name, &bytes)?;
        let set = SuspiciousAnchorSet::from_csv(&name, &text)?;

        info!(source = %name, phrases = set.len(), "Loaded suspicious anchors");
        Ok(set)
    }
}

/// A shared spreadsheet published as CSV (e.g. a Google Sheets export URL).
pub struct RemoteSheetAnchors {
    client: Client,
    url: String,
}

impl RemoteSheetAnchors {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl AnchorSource for RemoteSheetAnchors {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<SuspiciousAnchorSet> {
        debug!(url = %self.url, "Fetching suspicious anchor sheet");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch suspicious anchor sheet")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Anchor sheet {} returned {}", self.url, status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read suspicious anchor sheet body")?;
        let text = decode_text(&self.url, &bytes)?;
        let set = SuspiciousAnchorSet::from_csv(&self.url, &text)?;

        info!(source = %self.url, phrases = set.len(), "Loaded suspicious anchors");
        Ok(set)
    }
}
