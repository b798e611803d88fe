// Merge pipeline: reviewed spreadsheet -> updated disavow file.
//
// After someone prunes the "Disavow Details" sheet by hand, the domains left in
// it are merged back into the site's existing disavow file. Reading the whole
// review happens before anything is merged, so a bad sheet never produces a
// partial file.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Reader};
use tracing::info;

use crate::disavow::{DisavowFile, MergeReport};
use crate::error::DisavowError;
use crate::ingest::decode_text;
use crate::output::workbook::DETAILS_SHEET;

/// Column holding the reviewed domains.
pub const REVIEW_COLUMN: &str = "referring_domain";

/// Read the reviewed domain column from a workbook or CSV export.
///
/// Workbooks must contain a "Disavow Details" sheet; both formats must have a
/// `referring_domain` header. Values are returned as written, un-normalized.
pub fn read_reviewed_domains(path: &Path) -> Result<Vec<String>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_reviewed_csv(path)
    } else {
        read_reviewed_workbook(path)
    }
}

fn read_reviewed_workbook(path: &Path) -> Result<Vec<String>> {
    let input = path.display().to_string();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open reviewed workbook {input}"))?;

    if !workbook.sheet_names().iter().any(|name| name == DETAILS_SHEET) {
        return Err(DisavowError::MissingSheet {
            input,
            sheet: DETAILS_SHEET.to_string(),
        }
        .into());
    }

    let range = workbook
        .worksheet_range(DETAILS_SHEET)
        .with_context(|| format!("Failed to read sheet \"{DETAILS_SHEET}\" in {input}"))?;

    let mut rows = range.rows();
    let header = rows.next().unwrap_or_default();
    let idx = header
        .iter()
        .position(|cell| cell.to_string().trim() == REVIEW_COLUMN)
        .ok_or_else(|| DisavowError::MissingColumn {
            input: input.clone(),
            column: REVIEW_COLUMN.to_string(),
        })?;

    Ok(rows
        .filter_map(|row| row.get(idx))
        .map(|cell| cell.to_string())
        .collect())
}

fn read_reviewed_csv(path: &Path) -> Result<Vec<String>> {
    let input = path.display().to_string();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read reviewed sheet {input}"))?;
    let text = decode_text(&input, &bytes)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let idx = reader
        .headers()
        .with_context(|| format!("Failed to read headers of {input}"))?
        .iter()
        .position(|h| h.trim() == REVIEW_COLUMN)
        .ok_or_else(|| DisavowError::MissingColumn {
            input: input.clone(),
            column: REVIEW_COLUMN.to_string(),
        })?;

    let mut domains = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Malformed row in {input}"))?;
        if let Some(cell) = record.get(idx) {
            domains.push(cell.to_string());
        }
    }
    Ok(domains)
}

/// Merge a reviewed spreadsheet into the text of an existing disavow file.
pub fn run(reviewed_path: &Path, existing_text: &str) -> Result<MergeReport> {
    let reviewed = read_reviewed_domains(reviewed_path)?;
    let existing = DisavowFile::parse(existing_text);
    let report = existing.merge(&reviewed);

    info!(
        reviewed = report.reviewed,
        already_present = report.already_present.len(),
        newly_added = report.newly_added.len(),
        "Merged reviewed domains"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_review_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviewed.csv");
        std::fs::write(&path, "anchor,referring_domain\nx,www.new.com\ny,old.com\nz,\n").unwrap();

        let report = run(&path, "# site\ndomain:old.com").unwrap();
        assert_eq!(report.reviewed, 2);
        assert_eq!(report.already_present, vec!["old.com"]);
        assert_eq!(report.newly_added, vec!["new.com"]);
        assert_eq!(report.content, "# site\ndomain:old.com\ndomain:new.com");
    }

    #[test]
    fn csv_review_without_domain_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviewed.csv");
        std::fs::write(&path, "Referring Domain\nnew.com\n").unwrap();

        let err = run(&path, "").unwrap_err();
        let err = err.downcast_ref::<DisavowError>().unwrap();
        assert!(matches!(err, DisavowError::MissingColumn { .. }));
    }
}
