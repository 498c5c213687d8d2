//! Restriction detection
//!
//! Detection runs in two phases and stops at the first match:
//!
//! 1. Line items, in document order. Each item's prefixes are normalized and
//!    checked against the restricted prefix set, unless a suppression rule
//!    marks the item as a known extraction artifact.
//! 2. Document-wide text (routing keywords, page summaries and page item
//!    descriptions), checked for any restricted keyword as a case-insensitive
//!    substring.
//!
//! A clean document yields `None`; that is a normal outcome, not an error.

use std::collections::HashSet;

use super::decision::DecisionTrail;
use super::normalize::{normalize_prefix, normalize_prefixes};
use crate::config::RestrictionConfig;
use crate::types::{ExtractionResult, LineItem};

/// Evidence that a document must go to the specialist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestrictionMatch {
    /// A line item carried a restricted prefix
    Prefix {
        prefix: String,
        line_number: String,
        page_number: u32,
        part_number: String,
    },
    /// The document text contained a restricted keyword
    Keyword { keyword: String },
}

impl RestrictionMatch {
    pub fn reason(&self) -> String {
        match self {
            RestrictionMatch::Prefix { prefix, .. } => format!("Restricted Prefix '{}'", prefix),
            RestrictionMatch::Keyword { .. } => "Global Keyword Match".to_string(),
        }
    }

    /// Literal excerpt recorded as the decision's evidence
    pub fn evidence(&self) -> String {
        match self {
            RestrictionMatch::Prefix {
                prefix,
                line_number,
                page_number,
                part_number,
            } => format!(
                "Line: {}\nPage: {}\nPart: {}\nPrefix: [{}]",
                line_number, page_number, part_number, prefix
            ),
            RestrictionMatch::Keyword { keyword } => keyword.clone(),
        }
    }
}

/// Suppression rule with its prefix already normalized
#[derive(Debug, Clone)]
struct Suppression {
    part_number_prefix: String,
    prefix: String,
}

/// Compiled restriction rules
#[derive(Debug, Clone)]
pub struct RestrictionDetector {
    prefixes: HashSet<String>,
    keywords: Vec<String>,
    suppressions: Vec<Suppression>,
}

impl RestrictionDetector {
    /// Compile a detector from configuration
    ///
    /// Prefixes are normalized and keywords upper-cased once here so that the
    /// scan compares canonical forms only.
    pub fn new(config: &RestrictionConfig) -> Self {
        Self {
            prefixes: config
                .prefixes
                .iter()
                .map(|p| normalize_prefix(p))
                .filter(|p| !p.is_empty())
                .collect(),
            keywords: config
                .keywords
                .iter()
                .map(|k| k.trim().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
            suppressions: config
                .suppressions
                .iter()
                .map(|rule| Suppression {
                    part_number_prefix: rule.part_number_prefix.clone(),
                    prefix: normalize_prefix(&rule.prefix),
                })
                .collect(),
        }
    }

    /// Run detection without keeping a trail
    pub fn detect(&self, extraction: &ExtractionResult) -> Option<RestrictionMatch> {
        self.scan(extraction, &mut DecisionTrail::new())
    }

    /// Run detection, recording the match (if any) on the trail
    pub fn scan(
        &self,
        extraction: &ExtractionResult,
        trail: &mut DecisionTrail,
    ) -> Option<RestrictionMatch> {
        self.scan_line_items(&extraction.line_items, trail)
            .or_else(|| self.scan_document_text(extraction, trail))
    }

    fn scan_line_items(
        &self,
        items: &[LineItem],
        trail: &mut DecisionTrail,
    ) -> Option<RestrictionMatch> {
        for item in items {
            let normalized = normalize_prefixes(&item.prefixes);

            if let Some(rule) = self.suppression_for(item, &normalized) {
                tracing::warn!(
                    part_number = %item.part_number,
                    prefix = %rule.prefix,
                    "ignoring prefix on suppressed part number"
                );
                trail.record(format!(
                    "Ignored prefix '{}' on part {} (known extraction artifact)",
                    rule.prefix, item.part_number
                ));
                continue;
            }

            if let Some(prefix) = normalized.iter().find(|p| self.prefixes.contains(*p)) {
                tracing::debug!(
                    prefix = %prefix,
                    line = %item.line_number,
                    page = item.page_number,
                    "restricted prefix matched"
                );
                trail.record(format!(
                    "Restricted prefix '{}' found on page {}",
                    prefix, item.page_number
                ));
                return Some(RestrictionMatch::Prefix {
                    prefix: prefix.clone(),
                    line_number: item.line_number.clone(),
                    page_number: item.page_number,
                    part_number: item.part_number.clone(),
                });
            }
        }

        None
    }

    fn suppression_for(&self, item: &LineItem, normalized: &[String]) -> Option<&Suppression> {
        self.suppressions.iter().find(|rule| {
            item.part_number.starts_with(&rule.part_number_prefix)
                && normalized.iter().any(|p| *p == rule.prefix)
        })
    }

    fn scan_document_text(
        &self,
        extraction: &ExtractionResult,
        trail: &mut DecisionTrail,
    ) -> Option<RestrictionMatch> {
        let corpus = document_corpus(extraction);

        let keyword = self.keywords.iter().find(|k| corpus.contains(k.as_str()))?;
        tracing::debug!(keyword = %keyword, "restricted keyword matched");
        trail.record(format!("Global keyword '{}' found", keyword));

        Some(RestrictionMatch::Keyword {
            keyword: keyword.clone(),
        })
    }
}

/// Upper-cased document text searched by the keyword phase
///
/// Fragments are joined with newlines so a keyword never matches across the
/// boundary of two fragments.
fn document_corpus(extraction: &ExtractionResult) -> String {
    let keywords = extraction.routing_keywords.iter().map(String::as_str);
    let summaries = extraction.pages.iter().map(|p| p.summary.as_str());
    let descriptions = extraction
        .pages
        .iter()
        .flat_map(|p| p.items_on_page.iter().map(|i| i.desc.as_str()));

    keywords
        .chain(summaries)
        .chain(descriptions)
        .collect::<Vec<_>>()
        .join("\n")
        .to_uppercase()
}
