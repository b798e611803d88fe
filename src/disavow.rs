// Disavow file reconciliation.
//
// A disavow file is line-oriented: `domain:<host>` lines name disavowed
// domains, everything else (comments, URL lines, blanks) is kept verbatim so a
// merge can write the file back without losing anything. The domain prefix is
// matched case-insensitively after trimming.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::classify::MatchResult;
use crate::domain::normalize_domain;

const DOMAIN_PREFIX: &str = "domain:";

/// A parsed disavow file: its domain set plus every other line, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisavowFile {
    domains: BTreeSet<String>,
    passthrough: Vec<String>,
}

/// Outcome of merging reviewed domains into an existing disavow file.
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// Full text of the merged disavow file
    pub content: String,
    /// Unique reviewed domains considered
    pub reviewed: usize,
    /// Reviewed domains that were already disavowed
    pub already_present: Vec<String>,
    /// Reviewed domains appended by this merge
    pub newly_added: Vec<String>,
}

/// Outcome of subtracting the known domain set from classifier matches.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Matches whose domain isn't disavowed yet, in input order
    pub remaining: Vec<MatchResult>,
    /// Sorted unique non-empty domains of `remaining`
    pub final_domains: Vec<String>,
    /// Matches dropped because their domain is already disavowed
    pub excluded_existing: usize,
    /// Remaining matches that have no referring domain
    pub empty_domain: usize,
}

impl DisavowFile {
    /// A file with no domains and no other lines (used when none was supplied).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        let mut file = Self::default();

        for line in text.lines() {
            match domain_from_line(line) {
                Some(domain) => {
                    file.domains.insert(domain);
                }
                None => file.passthrough.push(line.to_string()),
            }
        }

        file
    }

    pub fn domains(&self) -> &BTreeSet<String> {
        &self.domains
    }

    pub fn passthrough_lines(&self) -> &[String] {
        &self.passthrough
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Drop matches for domains that are already disavowed, and collect the
    /// sorted unique domains of what's left.
    ///
    /// Matches with an empty referring domain stay in `remaining` (and so in
    /// the review sheet) but are left out of `final_domains`: rendering them
    /// would put a bare `domain:` line at the top of the list, which is not a
    /// valid disavow entry. They are counted in `empty_domain` instead.
    pub fn filter_new(&self, matches: Vec<MatchResult>) -> FilterOutcome {
        let before = matches.len();
        let remaining: Vec<MatchResult> = matches
            .into_iter()
            .filter(|m| !self.contains(&m.record.referring_domain))
            .collect();
        let excluded_existing = before - remaining.len();

        let empty_domain = remaining
            .iter()
            .filter(|m| m.record.referring_domain.is_empty())
            .count();

        let final_domains: Vec<String> = remaining
            .iter()
            .map(|m| m.record.referring_domain.as_str())
            .filter(|d| !d.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        FilterOutcome {
            remaining,
            final_domains,
            excluded_existing,
            empty_domain,
        }
    }

    /// Merge reviewed domains into this file.
    ///
    /// Output is the passthrough lines in their original order, then every
    /// existing domain sorted, then the newly added domains sorted. Merging the
    /// same reviewed set into the result again adds nothing.
    pub fn merge<I, S>(&self, reviewed: I) -> MergeReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let reviewed: BTreeSet<String> = reviewed
            .into_iter()
            .map(|d| normalize_domain(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();

        let (already_present, newly_added): (Vec<String>, Vec<String>) = reviewed
            .iter()
            .cloned()
            .partition(|d| self.domains.contains(d));

        let mut lines: Vec<String> = self.passthrough.clone();
        lines.extend(self.domains.iter().map(|d| format!("{DOMAIN_PREFIX}{d}")));
        lines.extend(newly_added.iter().map(|d| format!("{DOMAIN_PREFIX}{d}")));

        MergeReport {
            content: lines.join("\n"),
            reviewed: reviewed.len(),
            already_present,
            newly_added,
        }
    }
}

/// The normalized domain on a `domain:` line, or None for any other line.
fn domain_from_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let prefix = trimmed.get(..DOMAIN_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(DOMAIN_PREFIX) {
        return None;
    }

    let domain = normalize_domain(&trimmed[DOMAIN_PREFIX.len()..]);
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

/// Render domains as disavow lines, one `domain:<d>` per line.
pub fn render_domain_lines(domains: &[String]) -> String {
    domains
        .iter()
        .map(|d| format!("{DOMAIN_PREFIX}{d}"))
        .collect::<Vec<_>>()
        .join("\n")
}
