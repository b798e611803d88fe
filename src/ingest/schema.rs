// Schema normalizer: maps vendor-specific export headers onto the canonical record.
//
// Each canonical field has an ordered list of header fragments. Headers are
// compared after lowercasing, dropping BOMs and quote characters, and
// collapsing whitespace; the first fragment that some header contains wins.
// New export formats are supported by adding fragments, not branches.

use crate::error::DisavowError;
use crate::ingest::RawTable;
use crate::records::CanonicalBacklinkRecord;

/// A canonical field and the header fragments that can supply it, in priority order.
pub struct ColumnMatcher {
    pub field: &'static str,
    pub fragments: &'static [&'static str],
}

impl ColumnMatcher {
    /// Index of the first header matching the highest-priority fragment possible.
    pub fn resolve(&self, normalized_headers: &[String]) -> Option<usize> {
        self.fragments.iter().find_map(|fragment| {
            normalized_headers
                .iter()
                .position(|header| header.contains(fragment))
        })
    }
}

pub const REFERRING_URL: ColumnMatcher = ColumnMatcher {
    field: "referring_page_url",
    fragments: &["source url", "referring page url", "referring url"],
};

pub const ANCHOR: ColumnMatcher = ColumnMatcher {
    field: "anchor",
    fragments: &["anchor text", "anchor"],
};

pub const LEFT_CONTEXT: ColumnMatcher = ColumnMatcher {
    field: "left_context",
    fragments: &["left context"],
};

pub const RIGHT_CONTEXT: ColumnMatcher = ColumnMatcher {
    field: "right_context",
    fragments: &["right context"],
};

/// Lowercase a header and strip the noise that export tools add to it.
pub fn normalize_header(header: &str) -> String {
    let cleaned: String = header
        .chars()
        .filter(|c| *c != '\u{feff}' && *c != '"')
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Column positions for one table, resolved once and applied to every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub referring_page_url: usize,
    pub anchor: usize,
    pub left_context: Option<usize>,
    pub right_context: Option<usize>,
}

impl ColumnMapping {
    pub fn resolve(table_name: &str, headers: &[String]) -> Result<Self, DisavowError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

        let unrecognized = |matcher: &ColumnMatcher| DisavowError::UnrecognizedSchema {
            table: table_name.to_string(),
            reason: format!(
                "no column for {} (looked for {})",
                matcher.field,
                matcher.fragments.join(", ")
            ),
        };

        let referring_page_url = REFERRING_URL
            .resolve(&normalized)
            .ok_or_else(|| unrecognized(&REFERRING_URL))?;
        let anchor = ANCHOR
            .resolve(&normalized)
            .ok_or_else(|| unrecognized(&ANCHOR))?;

        Ok(Self {
            referring_page_url,
            anchor,
            left_context: LEFT_CONTEXT.resolve(&normalized),
            right_context: RIGHT_CONTEXT.resolve(&normalized),
        })
    }
}

/// Normalize one parsed table into canonical records.
///
/// Empty tables fail with `EmptyInput`; tables without a referring-URL or
/// anchor column fail with `UnrecognizedSchema`.
pub fn normalize_table(table: &RawTable) -> Result<Vec<CanonicalBacklinkRecord>, DisavowError> {
    if table.is_empty() {
        return Err(DisavowError::EmptyInput {
            table: table.name.clone(),
        });
    }

    let mapping = ColumnMapping::resolve(&table.name, &table.headers)?;

    let cell = |row: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
    };

    let records = table
        .rows
        .iter()
        .map(|row| {
            let row = row.as_slice();
            CanonicalBacklinkRecord {
                source: table.name.clone(),
                referring_page_url: cell(row, Some(mapping.referring_page_url)),
                anchor: cell(row, Some(mapping.anchor)),
                left_context: cell(row, mapping.left_context),
                right_context: cell(row, mapping.right_context),
            }
        })
        .collect();

    Ok(records)
}
