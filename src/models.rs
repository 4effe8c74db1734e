//! Data models for the text analyzer.
//!
//! This module contains the payloads exchanged with the AI service and the
//! records persisted in the local history. Field names are camelCase on the
//! wire so stored history stays readable by other TextGuard front ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rewrite tone requested from the humanizer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Tone {
    Casual,
    #[default]
    Professional,
    Academic,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Casual => write!(f, "Casual"),
            Tone::Professional => write!(f, "Professional"),
            Tone::Academic => write!(f, "Academic"),
        }
    }
}

/// The three screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppView {
    #[default]
    Analyze,
    Results,
    History,
}

impl fmt::Display for AppView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppView::Analyze => write!(f, "Analyze"),
            AppView::Results => write!(f, "Results"),
            AppView::History => write!(f, "History"),
        }
    }
}

/// A scored metric with a categorical status ("Low", "Very Low", "Good", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetric {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub status: String,
}

impl AnalysisMetric {
    /// Whether the status indicates a strong machine-writing signal.
    pub fn is_concerning(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "very low" | "poor")
    }
}

/// Linguistic complexity breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complexity {
    #[serde(default)]
    pub vocabulary_richness: f64,
    #[serde(default)]
    pub structural_variety: f64,
    #[serde(default)]
    pub grade_level: String,
}

/// A recurring non-trivial word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordFrequency {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub count: f64,
}

/// Per-sentence AI likelihood.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceAnalysis {
    #[serde(default)]
    pub text: String,
    /// 0 to 100.
    #[serde(default)]
    pub ai_likelihood: f64,
    #[serde(default)]
    pub reason: String,
}

/// Result of an analysis call.
///
/// Everything except the local counts comes from the AI service verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub human_percentage: f64,
    pub ai_percentage: f64,
    pub perplexity: AnalysisMetric,
    pub burstiness: AnalysisMetric,
    pub readability: AnalysisMetric,
    pub complexity: Complexity,
    pub word_frequency: Vec<WordFrequency>,
    pub verdict: String,
    pub verdict_description: String,
    pub sentences: Vec<SentenceAnalysis>,
    /// Computed locally from the submitted text.
    #[serde(default)]
    pub word_count: usize,
    /// Computed locally from the submitted text.
    #[serde(default)]
    pub char_count: usize,
}

/// A single change the humanizer made.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Result of a humanization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizedResult {
    pub text: String,
    pub humanization_score: f64,
    pub improvements: Vec<Improvement>,
}

/// One entry of the local history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub original_text: String,
    pub analysis: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humanized: Option<HumanizedResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
}

impl HistoryRecord {
    /// Creates a record stamped with a fresh id and the current time.
    pub fn new(
        original_text: String,
        analysis: AnalysisResult,
        humanized: Option<HumanizedResult>,
        tone: Option<Tone>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            original_text,
            analysis,
            humanized,
            tone,
        }
    }

    /// Record time as a UTC datetime.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }

    /// Label shown in the history list.
    pub fn kind_label(&self) -> &'static str {
        if self.humanized.is_some() {
            "HUMANIZED"
        } else {
            "ANALYSIS"
        }
    }
}

/// An onboarding mission tracked across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub action_hint: String,
    pub icon: String,
}
