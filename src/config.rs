use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::anchors::sources::{CsvFileAnchors, RemoteSheetAnchors};
use crate::anchors::traits::AnchorSource;
use crate::error::DisavowError;

/// Default directory for generated files.
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command-line
/// flags take precedence over anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV export URL of the shared suspicious-anchor sheet (DISAVOW_ANCHOR_SHEET_URL)
    pub anchor_sheet_url: Option<String>,
    /// Where generated files go (DISAVOW_OUTPUT_DIR, defaults to ./output)
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let anchor_sheet_url = env::var("DISAVOW_ANCHOR_SHEET_URL")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let output_dir = env::var("DISAVOW_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            anchor_sheet_url,
            output_dir,
        })
    }

    /// Pick the suspicious-anchor source: an explicit CSV path wins over the
    /// configured sheet URL. Fails when neither is available.
    pub fn require_anchor_source(&self, csv_path: Option<&Path>) -> Result<Box<dyn AnchorSource>> {
        if let Some(path) = csv_path {
            return Ok(Box::new(CsvFileAnchors::new(path)));
        }
        if let Some(url) = &self.anchor_sheet_url {
            return Ok(Box::new(RemoteSheetAnchors::new(url.clone())));
        }
        Err(DisavowError::MissingRequiredInput(
            "suspicious anchor list (pass --anchors <CSV> or set DISAVOW_ANCHOR_SHEET_URL)"
                .to_string(),
        )
        .into())
    }

    /// The output directory, unless a flag overrides it.
    pub fn output_dir_or(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_dir.clone())
    }
}
