// Backlink export ingestion: bytes in, header + rows out.
//
// Exports come from several SEO tools, sometimes saved by spreadsheet apps
// that re-encode them as Windows-1252. Decoding tries UTF-8 first and falls
// back to the single-byte Western encoding. Column meaning is resolved later
// by the schema normalizer; this module only produces a rectangular table.

pub mod schema;

use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::error::DisavowError;

/// A raw input table, named so errors and provenance can point back to it.
#[derive(Debug, Clone)]
pub struct TableInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl TableInput {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a table from disk, named after its file name.
    pub fn read(path: &Path) -> Result<Self, DisavowError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = std::fs::read(path).map_err(|source| DisavowError::Unreadable {
            table: name.clone(),
            source,
        })?;

        Ok(Self { name, bytes })
    }
}

/// A decoded, parsed table. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }
}

/// Decode bytes as UTF-8 (dropping a BOM), falling back to Windows-1252.
///
/// The fallback maps every byte, so it can't fail on its own. What it can't
/// make sense of is binary content (a workbook renamed to .csv, a UTF-16
/// export): NUL bytes never occur in delimited text, so they are rejected.
pub fn decode_text(name: &str, bytes: &[u8]) -> Result<String, DisavowError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if bytes.contains(&0) {
        return Err(DisavowError::DecodeFailure {
            table: name.to_string(),
            reason: "binary content (NUL bytes), not delimited text".to_string(),
        });
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    debug!(table = name, "Decoded with Windows-1252 fallback");
    Ok(text.into_owned())
}

/// Decode and parse a delimited table with a header row.
pub fn parse_table(input: &TableInput) -> Result<RawTable, DisavowError> {
    let text = decode_text(&input.name, &input.bytes)?;
    let delimiter = sniff_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let malformed = |e: csv::Error| DisavowError::Malformed {
        table: input.name.clone(),
        reason: e.to_string(),
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    // A headerless empty file reads back as a single empty header cell
    let headers = if headers.iter().all(|h| h.trim().is_empty()) {
        Vec::new()
    } else {
        headers
    };

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(malformed)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable {
        name: input.name.clone(),
        headers,
        rows,
    })
}

/// Some tools write tab-separated data under a .csv name.
fn sniff_delimiter(text: &str) -> u8 {
    let header_line = text.lines().next().unwrap_or("");
    if header_line.contains('\t') && !header_line.contains(',') {
        b'\t'
    } else {
        b','
    }
}
