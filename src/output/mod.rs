// Output: disavow text, detail workbook, and terminal summaries.

pub mod terminal;
pub mod workbook;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::disavow::render_domain_lines;
use crate::pipeline::generate::GenerateReport;

pub const DISAVOW_LIST_FILE: &str = "disavow_list.txt";
pub const DETAIL_EXPORT_FILE: &str = "disavow_export.xlsx";
pub const MERGED_DISAVOW_FILE: &str = "merged_disavow.txt";

/// Paths written by a generate run.
#[derive(Debug, Clone)]
pub struct GeneratedFiles {
    pub disavow_list: PathBuf,
    pub detail_export: PathBuf,
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let keep = max_chars.saturating_sub(3);
        let truncated: String = text.chars().take(keep).collect();
        format!("{truncated}...")
    }
}

/// Write `disavow_list.txt` and `disavow_export.xlsx` into `out_dir`.
///
/// Both payloads are built before anything touches the disk, and the list is
/// removed again if the workbook can't be written.
pub fn write_generate_outputs(out_dir: &Path, report: &GenerateReport) -> Result<GeneratedFiles> {
    let list = render_domain_lines(&report.final_domains);
    let workbook = workbook::build_detail_workbook(&report.final_domains, &report.matches)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let files = GeneratedFiles {
        disavow_list: out_dir.join(DISAVOW_LIST_FILE),
        detail_export: out_dir.join(DETAIL_EXPORT_FILE),
    };

    std::fs::write(&files.disavow_list, list)
        .with_context(|| format!("Failed to write {}", files.disavow_list.display()))?;
    if let Err(e) = std::fs::write(&files.detail_export, workbook) {
        // A list without its review sheet is not a usable output set
        let _ = std::fs::remove_file(&files.disavow_list);
        return Err(e)
            .with_context(|| format!("Failed to write {}", files.detail_export.display()));
    }

    info!(
        list = %files.disavow_list.display(),
        export = %files.detail_export.display(),
        domains = report.final_domains.len(),
        "Wrote disavow outputs"
    );

    Ok(files)
}
