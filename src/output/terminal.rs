// Colored terminal summaries for generate and merge runs.
//
// All user-facing text goes through here; tracing output stays on stderr for
// diagnostics.

use colored::Colorize;

use super::truncate_chars;
use crate::classify::rules::SpamRuleSet;
use crate::disavow::MergeReport;
use crate::pipeline::generate::GenerateReport;

/// How many matched backlinks to preview in the generate summary.
const PREVIEW_ROWS: usize = 10;

/// Display the outcome of a generate run.
pub fn display_generate_summary(report: &GenerateReport) {
    println!("\n{}", "=== Disavow Candidates ===".bold());

    for skipped in &report.skipped {
        println!(
            "  {} Skipped {}: {}",
            "Warning:".yellow(),
            skipped.table,
            skipped.reason.dimmed()
        );
    }

    println!(
        "  Tables read: {}  |  Backlinks scanned: {}",
        report.tables_used.len(),
        report.records_scanned
    );
    println!(
        "  Matches: {}  |  Already disavowed: {}",
        report.matches.len(),
        report.excluded_existing
    );
    if report.empty_domain > 0 {
        println!(
            "  {} {} matches had no parseable domain",
            "~".yellow(),
            report.empty_domain
        );
    }

    if !report.hit_counts.is_empty() {
        let hits: Vec<String> = report
            .hit_counts
            .iter()
            .map(|(kind, n)| format!("{kind} {n}"))
            .collect();
        println!("  Rule hits: {}", hits.join(", "));
    }

    if !report.matches.is_empty() {
        println!();
        println!(
            "  {:<32} {:<24} {}",
            "Domain".dimmed(),
            "Rules".dimmed(),
            "Anchor".dimmed()
        );
        println!("  {}", "-".repeat(78).dimmed());
        for m in report.matches.iter().take(PREVIEW_ROWS) {
            println!(
                "  {:<32} {:<24} {}",
                truncate_chars(&m.record.referring_domain, 32),
                truncate_chars(&m.reasons_label(), 24),
                truncate_chars(&m.record.canonical.anchor, 60).dimmed()
            );
        }
        if report.matches.len() > PREVIEW_ROWS {
            println!(
                "  {}",
                format!("... and {} more", report.matches.len() - PREVIEW_ROWS).dimmed()
            );
        }
    }

    println!();
    let count = report.final_domains.len();
    if count == 0 {
        println!("  {} No new spam domains detected.", "ok".green());
    } else {
        println!(
            "  {} {} new spammy domains detected.",
            "!!".red().bold(),
            count
        );
    }
}

/// Display the outcome of a merge run.
pub fn display_merge_summary(report: &MergeReport) {
    println!("\n{}", "=== Disavow Merge ===".bold());
    println!("  Reviewed domains: {}", report.reviewed);
    println!(
        "  Already present:  {}",
        report.already_present.len().to_string().dimmed()
    );
    println!(
        "  Newly added:      {}",
        report.newly_added.len().to_string().green().bold()
    );
    for domain in &report.newly_added {
        println!("    + {domain}");
    }
}

/// Display the built-in rule categories.
pub fn display_rules(rules: &SpamRuleSet) {
    println!("\n{}", "=== Spam Rules ===".bold());
    for rule in rules.rules() {
        println!(
            "\n  {} ({} on {})",
            rule.category.as_str().bold(),
            rule.mode.as_str(),
            rule.target.as_str()
        );
        println!("    {}", rule.phrases.join(", ").dimmed());
    }
    println!(
        "\n  {}",
        "Suspicious anchors: substring match on anchor_lower, loaded per run".dimmed()
    );
}
