//! Word/character counts and history statistics.
//!
//! This module provides the counts attached to every analysis result and
//! the aggregate figures shown above the history list.

use crate::models::{AnalysisResult, HistoryRecord, SentenceAnalysis};

/// Sentences scoring above this likelihood are highlighted as machine-like.
pub const AI_SENTENCE_THRESHOLD: f64 = 40.0;

/// Number of whitespace-separated words in the trimmed text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of characters in the text.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Overwrite the counts of a service result with locally computed ones.
pub fn with_local_counts(mut result: AnalysisResult, text: &str) -> AnalysisResult {
    result.word_count = word_count(text);
    result.char_count = char_count(text);
    result
}

/// Sentences whose AI likelihood exceeds `threshold`, in document order.
pub fn flagged_sentences(result: &AnalysisResult, threshold: f64) -> Vec<&SentenceAnalysis> {
    result
        .sentences
        .iter()
        .filter(|s| s.ai_likelihood > threshold)
        .collect()
}

/// Aggregate figures over the stored history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySummary {
    pub total: usize,
    pub humanized: usize,
    pub average_human_percentage: Option<f64>,
}

impl HistorySummary {
    /// Compute the summary for a set of records.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a HistoryRecord>,
    {
        let mut summary = Self::default();
        let mut human_total = 0.0;

        for record in records {
            summary.total += 1;
            if record.humanized.is_some() {
                summary.humanized += 1;
            }
            human_total += record.analysis.human_percentage;
        }

        if summary.total > 0 {
            summary.average_human_percentage = Some(human_total / summary.total as f64);
        }

        summary
    }
}
