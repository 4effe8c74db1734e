//! Markdown rendering of the three views.
//!
//! Each view (Analyze, Results, History) plus the mission card is rendered
//! to a Markdown string that is printed or written to `--output`.

use crate::analysis::{flagged_sentences, HistorySummary, AI_SENTENCE_THRESHOLD};
use crate::models::{
    AnalysisMetric, AnalysisResult, AppView, HistoryRecord, HumanizedResult, Tone,
};
use crate::storage::ProgressTracker;
use anyhow::Result;
use serde::Serialize;

/// Characters of original text shown per history entry.
const SNIPPET_CHARS: usize = 160;

/// JSON shape of the Analyze and Results views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPayload<'a> {
    pub view: AppView,
    pub original_text: &'a str,
    pub analysis: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humanized: Option<&'a HumanizedResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
}

/// Render the Analyze view for a finished analysis.
pub fn render_analysis_markdown(text: &str, analysis: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str("# TextGuard Analysis\n\n");
    output.push_str(&generate_verdict_section(analysis));
    output.push_str(&generate_metrics_section(analysis));
    output.push_str(&generate_complexity_section(analysis));
    output.push_str(&generate_word_frequency_section(analysis));
    output.push_str(&generate_sentence_section(text, analysis));
    output.push_str(&generate_footer());

    output
}

/// Render the Results view: the analysis summary next to the rewrite.
pub fn render_results_markdown(
    text: &str,
    analysis: &AnalysisResult,
    humanized: Option<&HumanizedResult>,
    tone: Option<Tone>,
) -> String {
    let mut output = String::new();

    output.push_str("# TextGuard Results\n\n");
    output.push_str(&generate_verdict_section(analysis));
    output.push_str(&generate_sentence_section(text, analysis));

    match humanized {
        Some(result) => output.push_str(&generate_humanized_section(result, tone)),
        None => output.push_str(
            "## Humanized Version\n\nNo rewrite yet. Run `textguard humanize` to apply the humanization protocol.\n\n",
        ),
    }

    output.push_str(&generate_footer());
    output
}

/// Render the History view, newest first.
pub fn render_history_markdown(records: &[&HistoryRecord]) -> String {
    let mut output = String::new();

    output.push_str("# Your Activity\n\n");

    if records.is_empty() {
        output.push_str("No records found. Perform an analysis to save your progress here.\n\n");
        output.push_str(&generate_footer());
        return output;
    }

    let summary = HistorySummary::from_records(records.iter().copied());
    output.push_str(&format!(
        "*{} records | {} humanized",
        summary.total, summary.humanized
    ));
    if let Some(avg) = summary.average_human_percentage {
        output.push_str(&format!(" | average human score {:.0}%", avg));
    }
    output.push_str("*\n\n");

    for record in records {
        output.push_str(&generate_history_entry(record));
    }

    output.push_str(&generate_footer());
    output
}

/// Render the mission card.
pub fn render_progress_markdown(progress: &ProgressTracker) -> String {
    let mut output = String::new();

    output.push_str("# Missions\n\n");

    if progress.all_completed() {
        output.push_str("**Master Protocols Active.** All training modules completed.\n\n");
    } else if let Some(current) = progress.current() {
        output.push_str(&format!("**Primary Mission:** {}\n\n", current.title));
        output.push_str(&format!("{}\n\n", current.description));
        output.push_str(&format!("> Next step: `{}`\n\n", current.action_hint));
    }

    for protocol in progress.protocols() {
        let mark = if protocol.completed { "x" } else { " " };
        output.push_str(&format!("- [{}] {}\n", mark, protocol.title));
    }
    output.push('\n');

    output
}

/// Serialize any view payload as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(payload: &T) -> Result<String> {
    serde_json::to_string_pretty(payload).map_err(Into::into)
}

fn generate_verdict_section(analysis: &AnalysisResult) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Verdict: {}\n\n", analysis.verdict));
    if !analysis.verdict_description.is_empty() {
        section.push_str(&format!("{}\n\n", analysis.verdict_description));
    }
    section.push_str("| Authenticity | AI Likelihood | Words | Characters |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}%** | {}% | {} | {} |\n\n",
        analysis.human_percentage, analysis.ai_percentage, analysis.word_count, analysis.char_count
    ));

    section
}

fn metric_row(label: &str, metric: &AnalysisMetric) -> String {
    let flag = if metric.is_concerning() { " ⚠️" } else { "" };
    format!("| {} | {} | {}{} |\n", label, metric.value, metric.status, flag)
}

fn generate_metrics_section(analysis: &AnalysisResult) -> String {
    let mut section = String::new();

    section.push_str("## Metrics\n\n");
    section.push_str("| Metric | Value | Status |\n");
    section.push_str("|:---|:---:|:---|\n");
    section.push_str(&metric_row("Perplexity", &analysis.perplexity));
    section.push_str(&metric_row("Burstiness", &analysis.burstiness));
    section.push_str(&metric_row("Readability", &analysis.readability));
    section.push('\n');

    section
}

fn generate_complexity_section(analysis: &AnalysisResult) -> String {
    let complexity = &analysis.complexity;
    let mut section = String::new();

    section.push_str("## Linguistic Complexity\n\n");
    section.push_str(&format!(
        "- **Vocabulary Richness:** {}\n",
        complexity.vocabulary_richness
    ));
    section.push_str(&format!(
        "- **Structural Variety:** {}\n",
        complexity.structural_variety
    ));
    if !complexity.grade_level.is_empty() {
        section.push_str(&format!("- **Grade Level:** {}\n", complexity.grade_level));
    }
    section.push('\n');

    section
}

fn generate_word_frequency_section(analysis: &AnalysisResult) -> String {
    if analysis.word_frequency.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Word Frequency\n\n");
    section.push_str("| Word | Count |\n");
    section.push_str("|:---|:---:|\n");
    for entry in &analysis.word_frequency {
        section.push_str(&format!("| {} | {} |\n", entry.word, entry.count));
    }
    section.push('\n');

    section
}

/// Sentence breakdown; falls back to the raw text when the service sent none.
fn generate_sentence_section(text: &str, analysis: &AnalysisResult) -> String {
    let mut section = String::new();

    section.push_str("## Sentence Breakdown\n\n");

    if analysis.sentences.is_empty() {
        section.push_str(&format!("> {}\n\n", text.replace('\n', "\n> ")));
        return section;
    }

    for sentence in &analysis.sentences {
        if sentence.ai_likelihood > AI_SENTENCE_THRESHOLD {
            section.push_str(&format!(
                "- 🔴 **{}** *({}% AI: {})*\n",
                sentence.text, sentence.ai_likelihood, sentence.reason
            ));
        } else {
            section.push_str(&format!(
                "- 🟢 {} *({}% AI)*\n",
                sentence.text, sentence.ai_likelihood
            ));
        }
    }

    let flagged = flagged_sentences(analysis, AI_SENTENCE_THRESHOLD).len();
    section.push_str(&format!(
        "\n*{} of {} sentences flagged as machine-like*\n\n",
        flagged,
        analysis.sentences.len()
    ));

    section
}

fn generate_humanized_section(result: &HumanizedResult, tone: Option<Tone>) -> String {
    let mut section = String::new();

    section.push_str("## Humanized Version\n\n");
    section.push_str(&format!(
        "*Tone: {} | Humanization score: {}%*\n\n",
        tone.unwrap_or_default(),
        result.humanization_score
    ));
    section.push_str(&result.text);
    section.push_str("\n\n");

    if !result.improvements.is_empty() {
        section.push_str("### Improvements\n\n");
        for improvement in &result.improvements {
            section.push_str(&format!(
                "- **{}**: {}\n",
                improvement.title, improvement.description
            ));
        }
        section.push('\n');
    }

    section
}

fn generate_history_entry(record: &HistoryRecord) -> String {
    let mut entry = String::new();

    entry.push_str(&format!(
        "### {} `{}`\n\n",
        record.recorded_at().format("%b %d, %Y %H:%M"),
        record.id
    ));

    entry.push_str(&format!(
        "**{}** | Human score: {}%",
        record.kind_label(),
        record.analysis.human_percentage
    ));
    if let Some(tone) = record.tone {
        entry.push_str(&format!(" | Tone: {}", tone));
    }
    entry.push_str("\n\n");

    entry.push_str(&format!("> \"{}\"\n\n", snippet(&record.original_text)));

    entry
}

fn snippet(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(SNIPPET_CHARS).collect();
    format!("{}…", cut.trim_end())
}

fn generate_footer() -> String {
    "---\n\n*Generated by TextGuard. Scores are estimates from an external AI model.*\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{sample_analysis, sample_humanized};
    use crate::storage::ProtocolId;

    #[test]
    fn test_render_analysis_markdown() {
        let analysis = sample_analysis(30.0);
        let markdown = render_analysis_markdown("Furthermore, synergy is pivotal.", &analysis);

        assert!(markdown.contains("# TextGuard Analysis"));
        assert!(markdown.contains("## Verdict: Likely AI"));
        assert!(markdown.contains("**30%**"));
        assert!(markdown.contains("| Burstiness | 12 | Very Low ⚠️ |"));
        assert!(markdown.contains("| synergy | 3 |"));
        assert!(markdown.contains("1 of 2 sentences flagged"));
    }

    #[test]
    fn test_sentence_section_without_sentences_shows_text() {
        let mut analysis = sample_analysis(50.0);
        analysis.sentences.clear();

        let section = generate_sentence_section("line one\nline two", &analysis);
        assert!(section.contains("> line one\n> line two"));
    }

    #[test]
    fn test_render_results_markdown_pending() {
        let analysis = sample_analysis(30.0);
        let markdown = render_results_markdown("text", &analysis, None, None);

        assert!(markdown.contains("# TextGuard Results"));
        assert!(markdown.contains("No rewrite yet"));
    }

    #[test]
    fn test_render_results_markdown_with_rewrite() {
        let analysis = sample_analysis(30.0);
        let humanized = sample_humanized();
        let markdown =
            render_results_markdown("text", &analysis, Some(&humanized), Some(Tone::Casual));

        assert!(markdown.contains("Tone: Casual | Humanization score: 88%"));
        assert!(markdown.contains("We met Tuesday and talked it through."));
        assert!(markdown.contains("**Dropped filler transitions**"));
    }

    #[test]
    fn test_render_history_markdown() {
        let plain = HistoryRecord::new("First".to_string(), sample_analysis(20.0), None, None);
        let rewritten = HistoryRecord::new(
            "Second".to_string(),
            sample_analysis(60.0),
            Some(sample_humanized()),
            Some(Tone::Academic),
        );

        let markdown = render_history_markdown(&[&rewritten, &plain]);

        assert!(markdown.contains("2 records | 1 humanized | average human score 40%"));
        assert!(markdown.contains("**HUMANIZED** | Human score: 60% | Tone: Academic"));
        assert!(markdown.contains("**ANALYSIS** | Human score: 20%"));
        assert!(markdown.find("Second").unwrap() < markdown.find("First").unwrap());
    }

    #[test]
    fn test_render_history_markdown_empty() {
        let markdown = render_history_markdown(&[]);
        assert!(markdown.contains("No records found"));
    }

    #[test]
    fn test_snippet_truncates_long_text() {
        let long = "word ".repeat(100);
        let cut = snippet(&long);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= SNIPPET_CHARS + 1);
        assert_eq!(snippet("short\n text"), "short text");
    }

    #[test]
    fn test_render_progress_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let mut progress = ProgressTracker::open(dir.path());

        let markdown = render_progress_markdown(&progress);
        assert!(markdown.contains("**Primary Mission:** Run Your First Analysis"));
        assert!(markdown.contains("- [ ] Humanize a Message"));

        for id in [
            ProtocolId::FirstAnalysis,
            ProtocolId::UploadDocument,
            ProtocolId::FirstHumanize,
            ProtocolId::ReviewHistory,
        ] {
            progress.complete(id).unwrap();
        }
        let markdown = render_progress_markdown(&progress);
        assert!(markdown.contains("Master Protocols Active"));
        assert!(markdown.contains("- [x] Revisit Past Work"));
    }

    #[test]
    fn test_view_payload_json() {
        let analysis = sample_analysis(30.0);
        let payload = ViewPayload {
            view: AppView::Results,
            original_text: "text",
            analysis: &analysis,
            humanized: None,
            tone: None,
        };

        let json = to_json(&payload).unwrap();
        assert!(json.contains("\"view\": \"RESULTS\""));
        assert!(json.contains("\"originalText\": \"text\""));
        assert!(!json.contains("humanized"));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&sample_analysis(30.0)).unwrap();
        assert!(json.contains("\"humanPercentage\""));
        assert!(json.contains("\"sentences\""));
    }
}
