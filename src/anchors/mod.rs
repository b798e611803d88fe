// Suspicious anchor phrases: an externally curated list of spam triggers.
//
// The list lives outside this tool (an uploaded CSV or a shared sheet), so
// where it comes from is behind the AnchorSource trait. Whatever the source,
// it ends up as a SuspiciousAnchorSet that is loaded once per run.

pub mod sources;
pub mod traits;

use std::collections::BTreeSet;

use crate::error::DisavowError;

/// The column holding phrases in every anchor list format.
pub const ANCHOR_COLUMN: &str = "anchor_text";

/// Lowercase, trimmed phrases; each is a substring trigger against anchors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuspiciousAnchorSet {
    phrases: BTreeSet<String>,
}

impl SuspiciousAnchorSet {
    /// Build a set from raw phrases. Blank phrases are dropped, since an empty
    /// trigger would be contained in every anchor.
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// Parse a CSV with an `anchor_text` column.
    pub fn from_csv(input_name: &str, text: &str) -> Result<Self, DisavowError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let missing_column = || DisavowError::MissingColumn {
            input: input_name.to_string(),
            column: ANCHOR_COLUMN.to_string(),
        };

        let headers = reader.headers().map_err(|_| missing_column())?.clone();
        let idx = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == ANCHOR_COLUMN)
            .ok_or_else(missing_column)?;

        let mut phrases = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DisavowError::Malformed {
                table: input_name.to_string(),
                reason: e.to_string(),
            })?;
            if let Some(cell) = record.get(idx) {
                phrases.push(cell.to_string());
            }
        }

        Ok(Self::from_phrases(phrases))
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    /// The lexicographically first phrase contained in `anchor_lower`.
    pub fn first_contained_in(&self, anchor_lower: &str) -> Option<&str> {
        self.iter().find(|phrase| anchor_lower.contains(phrase))
    }
}
