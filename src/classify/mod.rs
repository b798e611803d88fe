// Spam classification: decides which backlinks are disavow candidates.
//
// A record is a candidate when any rule fires: a keyword category from the
// SpamRuleSet, or a phrase from the externally curated suspicious-anchor set.
// Rules are independent; every one that fires is recorded so the review
// sheet can show why a link was flagged.

pub mod rules;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::anchors::SuspiciousAnchorSet;
use crate::records::EnrichedRecord;
use rules::{RuleCategory, RuleTarget, SpamRuleSet};

/// Why a record was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchReason {
    Category(RuleCategory),
    /// The suspicious-anchor phrase found in the anchor
    SuspiciousAnchor(String),
}

impl MatchReason {
    /// Short label used for hit counts: the category name or "suspicious-anchor".
    pub fn kind(&self) -> &'static str {
        match self {
            MatchReason::Category(c) => c.as_str(),
            MatchReason::SuspiciousAnchor(_) => "suspicious-anchor",
        }
    }
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchReason::Category(c) => write!(f, "{c}"),
            MatchReason::SuspiciousAnchor(phrase) => write!(f, "suspicious-anchor:{phrase}"),
        }
    }
}

/// A flagged record and every rule that fired for it.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub record: EnrichedRecord,
    pub reasons: Vec<MatchReason>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Reasons joined for display, e.g. "adult, suspicious-anchor:casino".
    pub fn reasons_label(&self) -> String {
        self.reasons
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Applies a rule set and a suspicious-anchor set to enriched records.
pub struct SpamClassifier<'a> {
    rules: &'a SpamRuleSet,
    anchors: &'a SuspiciousAnchorSet,
}

impl<'a> SpamClassifier<'a> {
    pub fn new(rules: &'a SpamRuleSet, anchors: &'a SuspiciousAnchorSet) -> Self {
        Self { rules, anchors }
    }

    /// Every reason this record matches. Empty means not spam.
    pub fn evaluate(&self, record: &EnrichedRecord) -> Vec<MatchReason> {
        let mut reasons: Vec<MatchReason> = self
            .rules
            .rules()
            .iter()
            .filter(|rule| {
                let text = match rule.target {
                    RuleTarget::FullContext => &record.full_context,
                    RuleTarget::Anchor => &record.anchor_lower,
                };
                rule.is_match(text)
            })
            .map(|rule| MatchReason::Category(rule.category))
            .collect();

        if let Some(phrase) = self.anchors.first_contained_in(&record.anchor_lower) {
            reasons.push(MatchReason::SuspiciousAnchor(phrase.to_string()));
        }

        reasons
    }

    /// Keep only the records that match at least one rule.
    pub fn classify<I>(&self, records: I) -> Vec<MatchResult>
    where
        I: IntoIterator<Item = EnrichedRecord>,
    {
        records
            .into_iter()
            .filter_map(|record| {
                let reasons = self.evaluate(&record);
                if reasons.is_empty() {
                    None
                } else {
                    Some(MatchResult { record, reasons })
                }
            })
            .collect()
    }
}

/// Count how many matches each reason kind contributed to.
pub fn hit_counts(matches: &[MatchResult]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for m in matches {
        for reason in &m.reasons {
            *counts.entry(reason.kind().to_string()).or_insert(0) += 1;
        }
    }
    counts
}
