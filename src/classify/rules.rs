// Built-in spam keyword categories.
//
// Short common words (adult, pharma) only count as whole words, so "sextant"
// does not trip "sex". The seo-spam phrases are multi-word and unambiguous,
// so they match anywhere. Which field a category reads is part of the rule:
// adult terms are checked against the full link context, the rest against
// the anchor alone. Word boundaries are Unicode-aware: accented letters count
// as word characters, so "pornô" is not "porn".

use regex::Regex;
use serde::Serialize;

use crate::error::DisavowError;

/// A named keyword category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RuleCategory {
    Adult,
    Pharma,
    SeoSpam,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Adult => "adult",
            RuleCategory::Pharma => "pharma",
            RuleCategory::SeoSpam => "seo-spam",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which record field a category is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleTarget {
    /// left context + anchor + right context
    FullContext,
    /// trimmed, lowercased anchor
    Anchor,
}

impl RuleTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTarget::FullContext => "full_context",
            RuleTarget::Anchor => "anchor_lower",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchMode {
    /// Phrase must be bounded by non-word characters
    WholeWord,
    /// Phrase may appear anywhere
    Substring,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::WholeWord => "whole-word",
            MatchMode::Substring => "substring",
        }
    }
}

pub const ADULT_PHRASES: &[&str] = &["porn", "sex", "camgirl", "escort", "xxx", "anal", "nude"];

pub const PHARMA_PHRASES: &[&str] = &["penis", "erectile", "enlargement", "enhancement"];

pub const SEO_SPAM_PHRASES: &[&str] = &[
    "buy backlinks",
    "seo tool",
    "cheap backlinks",
    "rank booster",
    "pbn",
];

/// One category compiled into a case-insensitive matcher.
#[derive(Debug)]
pub struct SpamRule {
    pub category: RuleCategory,
    pub target: RuleTarget,
    pub mode: MatchMode,
    pub phrases: Vec<String>,
    pattern: Regex,
}

impl SpamRule {
    pub fn new(
        category: RuleCategory,
        target: RuleTarget,
        mode: MatchMode,
        phrases: &[&str],
    ) -> Result<Self, DisavowError> {
        let invalid = |reason: String| DisavowError::InvalidRule {
            category: category.to_string(),
            reason,
        };

        if phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(invalid("no phrases".to_string()));
        }

        let alternation = phrases
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");

        let source = match mode {
            MatchMode::WholeWord => format!(r"(?i)\b(?:{alternation})\b"),
            MatchMode::Substring => format!(r"(?i)(?:{alternation})"),
        };

        Ok(Self {
            category,
            target,
            mode,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            pattern: Regex::new(&source).map_err(|e| invalid(e.to_string()))?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// The full set of keyword categories used for one run.
#[derive(Debug)]
pub struct SpamRuleSet {
    rules: Vec<SpamRule>,
}

impl SpamRuleSet {
    pub fn new(rules: Vec<SpamRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SpamRule] {
        &self.rules
    }

    pub fn get(&self, category: RuleCategory) -> Option<&SpamRule> {
        self.rules.iter().find(|r| r.category == category)
    }

    /// The built-in categories: adult (whole-word, full context), pharma
    /// (whole-word, anchor) and seo-spam (substring, anchor).
    pub fn builtin() -> Result<Self, DisavowError> {
        let specs: [(RuleCategory, RuleTarget, MatchMode, &[&str]); 3] = [
            (
                RuleCategory::Adult,
                RuleTarget::FullContext,
                MatchMode::WholeWord,
                ADULT_PHRASES,
            ),
            (
                RuleCategory::Pharma,
                RuleTarget::Anchor,
                MatchMode::WholeWord,
                PHARMA_PHRASES,
            ),
            (
                RuleCategory::SeoSpam,
                RuleTarget::Anchor,
                MatchMode::Substring,
                SEO_SPAM_PHRASES,
            ),
        ];

        let rules = specs
            .into_iter()
            .map(|(category, target, mode, phrases)| SpamRule::new(category, target, mode, phrases))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_all_categories() {
        let rules = SpamRuleSet::builtin().unwrap();
        assert_eq!(rules.rules().len(), 3);
        assert!(rules.get(RuleCategory::Adult).is_some());
        assert!(rules.get(RuleCategory::Pharma).is_some());
        assert!(rules.get(RuleCategory::SeoSpam).is_some());
    }

    #[test]
    fn whole_word_rejects_embedded_terms() {
        let rules = SpamRuleSet::builtin().unwrap();
        let adult = rules.get(RuleCategory::Adult).unwrap();
        assert!(!adult.is_match("sextant tour"));
        assert!(!adult.is_match("analysis of canals"));
        assert!(adult.is_match("free sex now"));
        assert!(adult.is_match("FREE SEX NOW"));
        assert!(adult.is_match("xxx-videos"));
    }

    #[test]
    fn substring_mode_matches_inside_words() {
        let rules = SpamRuleSet::builtin().unwrap();
        let seo = rules.get(RuleCategory::SeoSpam).unwrap();
        assert!(seo.is_match("pbnlinks for sale"));
        assert!(seo.is_match("where to buy backlinks cheap"));
        assert!(!seo.is_match("buy links"));
    }

    #[test]
    fn phrases_are_escaped() {
        let rule = SpamRule::new(
            RuleCategory::SeoSpam,
            RuleTarget::Anchor,
            MatchMode::Substring,
            &["c++ seo", "a.b"],
        )
        .unwrap();
        assert!(rule.is_match("learn c++ seo"));
        assert!(!rule.is_match("axb"));
    }

    #[test]
    fn whole_word_treats_accented_letters_as_word_characters() {
        let rules = SpamRuleSet::builtin().unwrap();
        let adult = rules.get(RuleCategory::Adult).unwrap();
        assert!(!adult.is_match("pornô grátis"));
        assert!(!adult.is_match("ésex"));
        assert!(!adult.is_match("nudeé"));
        assert!(adult.is_match("vidéo porn gratuite"));
        assert!(adult.is_match("café sex"));
    }

    #[test]
    fn rule_without_phrases_is_rejected() {
        let err = SpamRule::new(
            RuleCategory::Pharma,
            RuleTarget::Anchor,
            MatchMode::WholeWord,
            &["", "  "],
        )
        .unwrap_err();
        assert!(matches!(err, DisavowError::InvalidRule { ref category, .. } if category == "pharma"));
    }

    #[test]
    fn category_names_are_stable() {
        assert_eq!(RuleCategory::Adult.to_string(), "adult");
        assert_eq!(RuleCategory::Pharma.to_string(), "pharma");
        assert_eq!(RuleCategory::SeoSpam.to_string(), "seo-spam");
    }
}
