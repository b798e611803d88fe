// Generate pipeline: backlink exports -> new disavow candidates.
//
// Each export is decoded, normalized and enriched independently. A table that
// fails any of those steps is skipped with a warning; only when no table
// survives does the whole run fail. Classification and filtering happen once,
// over every surviving record.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::anchors::SuspiciousAnchorSet;
use crate::classify::rules::SpamRuleSet;
use crate::classify::{hit_counts, MatchResult, SpamClassifier};
use crate::disavow::DisavowFile;
use crate::error::DisavowError;
use crate::ingest::schema::normalize_table;
use crate::ingest::{parse_table, TableInput};
use crate::records::{CanonicalBacklinkRecord, EnrichedRecord};

/// A backlink table that was left out of the run, and why.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedTable {
    pub table: String,
    pub reason: String,
}

/// The backlink inputs for one run, including ones that already failed to load.
#[derive(Debug, Default)]
pub struct TableBatch {
    inputs: Vec<TableInput>,
    skipped: Vec<SkippedTable>,
}

impl TableBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every path; unreadable files are recorded as skipped.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut batch = Self::new();
        for path in paths {
            match TableInput::read(path.as_ref()) {
                Ok(input) => batch.push(input),
                Err(e) => batch.skip(&e),
            }
        }
        batch
    }

    pub fn push(&mut self, input: TableInput) {
        self.inputs.push(input);
    }

    pub fn len(&self) -> usize {
        self.inputs.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn skip(&mut self, err: &DisavowError) {
        self.skipped.push(skipped_table(None, err));
    }
}

fn skipped_table(name: Option<&str>, err: &DisavowError) -> SkippedTable {
    let table = match err {
        DisavowError::UnrecognizedSchema { table, .. }
        | DisavowError::EmptyInput { table }
        | DisavowError::DecodeFailure { table, .. }
        | DisavowError::Malformed { table, .. }
        | DisavowError::Unreadable { table, .. } => table.clone(),
        _ => name.unwrap_or_default().to_string(),
    };
    warn!(table = %table, error = %err, "Skipped backlink table");
    SkippedTable {
        table,
        reason: err.to_string(),
    }
}

/// Everything a generate run produced.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    /// Sorted unique domains to disavow
    pub final_domains: Vec<String>,
    /// Matched records not already disavowed (the detail sheet)
    pub matches: Vec<MatchResult>,
    pub tables_used: Vec<String>,
    pub skipped: Vec<SkippedTable>,
    pub records_scanned: usize,
    /// Matches dropped because their domain was already in the disavow file
    pub excluded_existing: usize,
    /// Matches kept in the detail sheet that have no parseable domain
    pub empty_domain: usize,
    /// Matches per reason kind ("adult", "suspicious-anchor", ...)
    pub hit_counts: BTreeMap<String, usize>,
}

/// Normalize every table in the batch, isolating per-table failures.
///
/// Returns the surviving records, the names of the tables they came from,
/// and every skipped table.
pub fn ingest(
    batch: &TableBatch,
) -> (Vec<CanonicalBacklinkRecord>, Vec<String>, Vec<SkippedTable>) {
    let mut skipped = batch.skipped.clone();
    let mut records = Vec::new();
    let mut used = Vec::new();

    for input in &batch.inputs {
        match parse_table(input).and_then(|table| normalize_table(&table)) {
            Ok(rows) => {
                info!(table = %input.name, rows = rows.len(), "Normalized backlink table");
                records.extend(rows);
                used.push(input.name.clone());
            }
            Err(e) => skipped.push(skipped_table(Some(&input.name), &e)),
        }
    }

    (records, used, skipped)
}

/// Run the full generate flow over a batch of backlink exports.
pub fn run(
    batch: &TableBatch,
    rules: &SpamRuleSet,
    anchors: &SuspiciousAnchorSet,
    existing: &DisavowFile,
) -> Result<GenerateReport, DisavowError> {
    if batch.is_empty() {
        return Err(DisavowError::MissingRequiredInput(
            "at least one backlink export".to_string(),
        ));
    }

    let (records, tables_used, skipped) = ingest(batch);
    if tables_used.is_empty() {
        return Err(DisavowError::NoUsableTables {
            skipped: skipped.len(),
        });
    }

    let records_scanned = records.len();
    let enriched = records.into_iter().map(EnrichedRecord::from_canonical);

    let classifier = SpamClassifier::new(rules, anchors);
    let matches = classifier.classify(enriched);
    let matched = matches.len();

    let outcome = existing.filter_new(matches);
    if outcome.empty_domain > 0 {
        warn!(
            count = outcome.empty_domain,
            "Matched backlinks without a parseable referring domain were left out of the disavow list"
        );
    }

    info!(
        records = records_scanned,
        matched,
        already_disavowed = outcome.excluded_existing,
        new_domains = outcome.final_domains.len(),
        "Classification complete"
    );

    Ok(GenerateReport {
        hit_counts: hit_counts(&outcome.remaining),
        final_domains: outcome.final_domains,
        matches: outcome.remaining,
        tables_used,
        skipped,
        records_scanned,
        excluded_existing: outcome.excluded_existing,
        empty_domain: outcome.empty_domain,
    })
}
