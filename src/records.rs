// Backlink record types.
//
// Every export format is reduced to CanonicalBacklinkRecord by the schema
// normalizer. EnrichedRecord adds the derived fields the classifier reads;
// those are always recomputed from the canonical fields, never edited.

use serde::{Deserialize, Serialize};

use crate::domain::extract_domain;

/// One backlink in the canonical shape, regardless of which tool exported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalBacklinkRecord {
    /// Name of the table this row came from (file name for uploads)
    pub source: String,
    pub referring_page_url: String,
    pub anchor: String,
    /// Text before the link, when the export carries it
    pub left_context: String,
    /// Text after the link, when the export carries it
    pub right_context: String,
}

/// A canonical record plus the fields the spam rules run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub canonical: CanonicalBacklinkRecord,
    /// Lowercase host of the referring page, without "www."
    pub referring_domain: String,
    /// left context, anchor, right context joined with single spaces
    pub full_context: String,
    /// Trimmed, lowercased anchor
    pub anchor_lower: String,
}

impl EnrichedRecord {
    pub fn from_canonical(canonical: CanonicalBacklinkRecord) -> Self {
        let referring_domain = extract_domain(&canonical.referring_page_url);
        let full_context = format!(
            "{} {} {}",
            canonical.left_context, canonical.anchor, canonical.right_context
        );
        let anchor_lower = canonical.anchor.trim().to_lowercase();

        Self {
            canonical,
            referring_domain,
            full_context,
            anchor_lower,
        }
    }
}

impl From<CanonicalBacklinkRecord> for EnrichedRecord {
    fn from(canonical: CanonicalBacklinkRecord) -> Self {
        Self::from_canonical(canonical)
    }
}
