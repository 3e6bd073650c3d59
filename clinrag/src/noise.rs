//! Removal of recurring non-content artifacts from extracted text.
//!
//! Page numbers, running headers and footers repeat on every page of a
//! guideline document. Left in place they end up inside every passage and
//! skew similarity search, so they are stripped before chunking.
//!
//! The default [`NoisePolicy::RepeatedLines`] runs these steps over the whole
//! document text:
//!
//! 1. drop `page N` / `page N of M` lines (case-insensitive)
//! 2. drop lines holding only a number, or `N-M` / `N/M`
//! 3. drop lines holding only a Roman numeral
//! 4. drop every occurrence of a short line (under 50 chars, trimmed and
//!    lower-cased) that appears more than twice in the document
//! 5. normalize whitespace: trim line ends, collapse blank-line runs to a
//!    single paragraph break, trim the whole text
//!
//! Step 4 is two separate passes, [`count_short_lines`] then a filter, so the
//! frequency table can be inspected on its own.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;

static PAGE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*page\s+\d+(?:\s+of\s+\d+)?\s*$").expect("valid page label pattern")
});

static PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+(?:\s*[-/]\s*\d+)?\s*$").expect("valid page number pattern")
});

static ROMAN_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[IVX]+|[ivx]+)\.?\s*$").expect("valid roman numeral pattern")
});

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank run pattern"));

/// Which header/footer heuristic the filter applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoisePolicy {
    /// Page markers plus repetition-count header/footer detection.
    #[default]
    RepeatedLines,
    /// Lower-fidelity fallback: drop every line shorter than a few characters.
    ///
    /// Catches bare page numbers but not running headers.
    ShortLines,
}

/// Strips page numbers, running headers/footers and excess whitespace.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    policy: NoisePolicy,
    repeat_threshold: usize,
    max_repeated_len: usize,
    min_line_len: usize,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(NoisePolicy::default())
    }
}

impl NoiseFilter {
    /// Lines seen more than this many times are treated as headers/footers.
    pub const DEFAULT_REPEAT_THRESHOLD: usize = 2;
    /// Only normalized lines shorter than this are candidates for repetition.
    pub const DEFAULT_MAX_REPEATED_LEN: usize = 50;
    /// [`NoisePolicy::ShortLines`] drops lines shorter than this.
    pub const DEFAULT_MIN_LINE_LEN: usize = 4;

    /// Create a filter using the given policy and default thresholds.
    pub fn new(policy: NoisePolicy) -> Self {
        Self {
            policy,
            repeat_threshold: Self::DEFAULT_REPEAT_THRESHOLD,
            max_repeated_len: Self::DEFAULT_MAX_REPEATED_LEN,
            min_line_len: Self::DEFAULT_MIN_LINE_LEN,
        }
    }

    /// Override the repetition count above which a short line is dropped.
    pub fn with_repeat_threshold(mut self, threshold: usize) -> Self {
        self.repeat_threshold = threshold;
        self
    }

    /// The active policy.
    pub fn policy(&self) -> NoisePolicy {
        self.policy
    }

    /// Clean a whole document: pages are joined by newlines first.
    pub fn clean_document(&self, document: &Document) -> String {
        self.clean(&document.joined_text())
    }

    /// Clean already-joined document text.
    pub fn clean(&self, text: &str) -> String {
        let lines: Vec<&str> = match self.policy {
            NoisePolicy::RepeatedLines => {
                let content: Vec<&str> = text.lines().filter(|l| !is_page_marker(l)).collect();
                let repeated = self.repeated_lines(&content);
                content
                    .into_iter()
                    .filter(|line| !repeated.contains(&normalize(line)))
                    .collect()
            }
            NoisePolicy::ShortLines => text
                .lines()
                .filter(|l| l.trim().is_empty() || l.trim().chars().count() >= self.min_line_len)
                .collect(),
        };

        let cleaned = normalize_whitespace(&lines);
        debug!(
            policy = ?self.policy,
            input_chars = text.len(),
            output_chars = cleaned.len(),
            "removed document noise"
        );
        cleaned
    }

    /// Normalized short lines occurring more than the repeat threshold.
    fn repeated_lines(&self, lines: &[&str]) -> HashSet<String> {
        count_short_lines(lines, self.max_repeated_len)
            .into_iter()
            .filter(|(_, count)| *count > self.repeat_threshold)
            .map(|(line, _)| line)
            .collect()
    }
}

/// Trimmed, lower-cased form used to compare lines.
fn normalize(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Whether a line is a page label, page number, number range or Roman numeral.
pub fn is_page_marker(line: &str) -> bool {
    PAGE_LABEL.is_match(line) || PAGE_NUMBER.is_match(line) || ROMAN_NUMERAL.is_match(line)
}

/// Count occurrences of each non-empty normalized line shorter than `max_len` chars.
pub fn count_short_lines(lines: &[&str], max_len: usize) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for line in lines {
        let normalized = normalize(line);
        let len = normalized.chars().count();
        if len > 0 && len < max_len {
            *counts.entry(normalized).or_insert(0) += 1;
        }
    }
    counts
}

/// Trim line ends, collapse 3+ newlines to a paragraph break and trim the text.
///
/// Line ends are trimmed before collapsing so that whitespace-only lines
/// cannot survive as an over-long blank run.
fn normalize_whitespace(lines: &[&str]) -> String {
    let joined = lines.iter().map(|l| l.trim_end()).collect::<Vec<_>>().join("\n");
    BLANK_RUN.replace_all(&joined, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_page_labels() {
        let text = "Dosage table\nPage 4\nPAGE 4 of 120\n  page 12  \nfollows here";
        assert_eq!(NoiseFilter::default().clean(text), "Dosage table\nfollows here");
    }

    #[test]
    fn drops_standalone_numbers_and_ranges() {
        let text = "Intro\n12\n 3 - 4 \n7/9\nadult dose 12 mg";
        assert_eq!(NoiseFilter::default().clean(text), "Intro\nadult dose 12 mg");
    }

    #[test]
    fn drops_roman_numerals() {
        let text = "Preface\nIV\nxii.\nVision statement";
        assert_eq!(NoiseFilter::default().clean(text), "Preface\nVision statement");
    }

    #[test]
    fn line_repeated_three_times_is_removed_everywhere() {
        let text = "WHO Malaria Guidelines\nfirst page body\nWHO Malaria Guidelines\n\
                    second page body\n  who malaria guidelines  \nthird page body";
        let cleaned = NoiseFilter::default().clean(text);
        assert!(!cleaned.to_lowercase().contains("who malaria guidelines"));
        assert!(cleaned.contains("first page body"));
        assert!(cleaned.contains("third page body"));
    }

    #[test]
    fn line_repeated_twice_is_kept() {
        let text = "Footer\nbody one\nFooter\nbody two";
        assert_eq!(NoiseFilter::default().clean(text), text);
    }

    #[test]
    fn long_lines_are_never_treated_as_headers() {
        let long = "This sentence is comfortably longer than fifty characters in total.";
        let text = format!("{long}\n{long}\n{long}");
        assert_eq!(NoiseFilter::default().clean(&text), text);
    }

    #[test]
    fn collapses_blank_runs_and_trims() {
        let text = "\n\n  first paragraph   \n\n\n\n   \n\nsecond paragraph\t\n\n";
        assert_eq!(NoiseFilter::default().clean(text), "first paragraph\n\nsecond paragraph");
    }

    #[test]
    fn counting_pass_ignores_empty_and_long_lines() {
        let long = "x".repeat(60);
        let lines = ["Header", "", "header ", long.as_str(), "HEADER"];
        let counts = count_short_lines(&lines, 50);
        assert_eq!(counts.get("header"), Some(&3));
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn short_line_fallback_drops_tiny_lines_only() {
        let filter = NoiseFilter::new(NoisePolicy::ShortLines);
        let text = "Header text\n12\nab\nbody line\nHeader text\nHeader text";
        assert_eq!(filter.clean(text), "Header text\nbody line\nHeader text\nHeader text");
    }

    #[test]
    fn cleans_joined_pages() {
        let pages = ["Running head\nalpha\n1", "Running head\nbeta\n2", "Running head\ngamma\n3"];
        let doc = Document::new("guide", pages.iter().map(|p| p.to_string()).collect());
        assert_eq!(NoiseFilter::default().clean_document(&doc), "alpha\nbeta\ngamma");
    }
}
