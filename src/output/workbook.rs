// Detail export workbook.
//
// Two sheets: the final domain list, and every matched backlink with all of
// its fields so a reviewer can prune false positives. The merge flow reads the
// pruned "Disavow Details" sheet back, keyed on its referring_domain column.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::truncate_chars;
use crate::classify::MatchResult;

pub const DOMAINS_SHEET: &str = "Disavow Domains";
pub const DETAILS_SHEET: &str = "Disavow Details";

/// Excel's per-cell character limit.
const MAX_CELL_CHARS: usize = 32_767;

pub const DETAIL_COLUMNS: [&str; 9] = [
    "source",
    "referring_page_url",
    "anchor",
    "left_context",
    "right_context",
    "referring_domain",
    "full_context",
    "anchor_lower",
    "matched_rules",
];

/// Build the detail workbook in memory and return the .xlsx bytes.
pub fn build_detail_workbook(final_domains: &[String], matches: &[MatchResult]) -> Result<Vec<u8>> {
    let header = Format::new().set_bold();

    let mut domains_sheet = Worksheet::new();
    domains_sheet.set_name(DOMAINS_SHEET)?;
    domains_sheet.write_string_with_format(0, 0, "Referring Domain", &header)?;
    domains_sheet.set_column_width(0, 40)?;
    for (i, domain) in final_domains.iter().enumerate() {
        domains_sheet.write_string(i as u32 + 1, 0, domain)?;
    }

    let mut details_sheet = Worksheet::new();
    details_sheet.set_name(DETAILS_SHEET)?;
    for (col, name) in DETAIL_COLUMNS.iter().enumerate() {
        details_sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (i, m) in matches.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in detail_row(m).iter().enumerate() {
            details_sheet.write_string(row, col as u16, truncate_chars(value, MAX_CELL_CHARS))?;
        }
    }

    let mut workbook = Workbook::new();
    workbook.push_worksheet(domains_sheet);
    workbook.push_worksheet(details_sheet);

    workbook
        .save_to_buffer()
        .context("Failed to serialize detail workbook")
}

/// Cell values for one matched record, in DETAIL_COLUMNS order.
pub fn detail_row(m: &MatchResult) -> [String; 9] {
    let r = &m.record;
    [
        r.canonical.source.clone(),
        r.canonical.referring_page_url.clone(),
        r.canonical.anchor.clone(),
        r.canonical.left_context.clone(),
        r.canonical.right_context.clone(),
        r.referring_domain.clone(),
        r.full_context.clone(),
        r.anchor_lower.clone(),
        m.reasons_label(),
    ]
}
