//! View-state orchestration.
//!
//! A [`Session`] owns the active input, the latest analysis and humanized
//! results, the current view, and the persisted history and progress. Every
//! user action goes through it so the view transitions stay consistent:
//! Analyze → Results → History, with Results only reachable once an analysis
//! exists.

use crate::gemini::{ServiceError, TextService};
use crate::models::{AnalysisResult, AppView, HistoryRecord, HumanizedResult, Tone};
use crate::storage::{HistoryStore, ProgressTracker, ProtocolId};
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No text to process")]
    EmptyInput,

    #[error("Another request is already in flight")]
    Busy,

    #[error("No analysis available; analyze the text first")]
    NoAnalysis,

    #[error("History record not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Failed to persist history: {0}")]
    Storage(#[from] std::io::Error),
}

/// Application state for one front-end session.
pub struct Session<S> {
    service: S,
    history: HistoryStore,
    progress: ProgressTracker,
    view: AppView,
    input_text: String,
    analysis: Option<AnalysisResult>,
    humanized: Option<HumanizedResult>,
    tone: Option<Tone>,
    loading: bool,
    humanizing: bool,
}

impl<S: TextService> Session<S> {
    pub fn new(service: S, history: HistoryStore, progress: ProgressTracker) -> Self {
        Self {
            service,
            history,
            progress,
            view: AppView::Analyze,
            input_text: String::new(),
            analysis: None,
            humanized: None,
            tone: None,
            loading: false,
            humanizing: false,
        }
    }

    /// Replace the active input text.
    ///
    /// `from_document` marks text that came from an uploaded file.
    pub fn set_input(&mut self, text: impl Into<String>, from_document: bool) {
        self.input_text = text.into();
        if from_document && !self.input_text.trim().is_empty() {
            self.complete_protocol(ProtocolId::UploadDocument);
        }
    }

    /// Analyze the active input and record the result in history.
    ///
    /// On failure the previous analysis is left untouched.
    pub async fn analyze(&mut self) -> Result<&AnalysisResult, SessionError> {
        if self.input_text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.loading || self.humanizing {
            return Err(SessionError::Busy);
        }

        self.loading = true;
        let outcome = self.service.analyze(&self.input_text).await;
        self.loading = false;

        let result = outcome.map_err(|e| {
            error!("Analysis failed: {}", e);
            SessionError::Service(e)
        })?;

        info!(
            "Analysis complete: {}% human ({})",
            result.human_percentage, result.verdict
        );

        self.history.append(HistoryRecord::new(
            self.input_text.clone(),
            result.clone(),
            None,
            None,
        ))?;
        self.complete_protocol(ProtocolId::FirstAnalysis);

        self.humanized = None;
        self.tone = None;
        self.view = AppView::Analyze;
        Ok(self.analysis.insert(result))
    }

    /// Rewrite the active input in `tone` and record it with the current analysis.
    pub async fn humanize(&mut self, tone: Tone) -> Result<&HumanizedResult, SessionError> {
        if self.input_text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.loading || self.humanizing {
            return Err(SessionError::Busy);
        }
        let Some(analysis) = self.analysis.clone() else {
            return Err(SessionError::NoAnalysis);
        };

        self.humanizing = true;
        self.view = AppView::Results;
        let outcome = self.service.humanize(&self.input_text, tone).await;
        self.humanizing = false;

        let result = outcome.map_err(|e| {
            error!("Humanization failed: {}", e);
            SessionError::Service(e)
        })?;

        info!(
            "Humanization complete: score {} ({})",
            result.humanization_score, tone
        );

        self.history.append(HistoryRecord::new(
            self.input_text.clone(),
            analysis,
            Some(result.clone()),
            Some(tone),
        ))?;
        self.complete_protocol(ProtocolId::FirstHumanize);

        self.tone = Some(tone);
        Ok(self.humanized.insert(result))
    }

    /// Restore a history record into the active view.
    pub fn select_record(&mut self, id: &str) -> Result<&HistoryRecord, SessionError> {
        let record = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        self.input_text = record.original_text.clone();
        self.analysis = Some(record.analysis.clone());
        self.humanized = record.humanized.clone();
        self.tone = record.tone;
        self.view = if record.humanized.is_some() {
            AppView::Results
        } else {
            AppView::Analyze
        };
        self.complete_protocol(ProtocolId::ReviewHistory);

        self.history
            .get(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Delete a history record.
    pub fn delete_record(&mut self, id: &str) -> Result<HistoryRecord, SessionError> {
        self.history
            .delete(id)?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Switch views. Results requires an analysis.
    pub fn navigate(&mut self, view: AppView) -> Result<(), SessionError> {
        if view == AppView::Results && self.analysis.is_none() {
            return Err(SessionError::NoAnalysis);
        }
        self.view = view;
        Ok(())
    }

    fn complete_protocol(&mut self, id: ProtocolId) {
        if let Err(e) = self.progress.complete(id) {
            warn!("Failed to save progress for {}: {}", id.as_str(), e);
        }
    }

    pub fn view(&self) -> AppView {
        self.view
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn humanized(&self) -> Option<&HumanizedResult> {
        self.humanized.as_ref()
    }

    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.loading || self.humanizing
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{sample_analysis, sample_humanized};
    use std::cell::Cell;
    use std::path::Path;

    /// Service double returning canned results or failing on demand.
    struct FakeService {
        fail: Cell<bool>,
        human: Cell<f64>,
        calls: Cell<usize>,
    }

    impl FakeService {
        fn new() -> Self {
            Self {
                fail: Cell::new(false),
                human: Cell::new(25.0),
                calls: Cell::new(0),
            }
        }
    }

    impl TextService for FakeService {
        async fn analyze(&self, _text: &str) -> Result<AnalysisResult, ServiceError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(ServiceError::Timeout(1));
            }
            Ok(sample_analysis(self.human.get()))
        }

        async fn humanize(&self, _text: &str, _tone: Tone) -> Result<HumanizedResult, ServiceError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(ServiceError::EmptyResponse);
            }
            Ok(sample_humanized())
        }
    }

    fn session(dir: &Path) -> Session<FakeService> {
        Session::new(
            FakeService::new(),
            HistoryStore::open(dir),
            ProgressTracker::open(dir),
        )
    }

    #[test]
    fn test_analyze_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.set_input("Some message", false);

        let human = tokio_test::block_on(session.analyze())
            .unwrap()
            .human_percentage;

        assert_eq!(human, 25.0);
        assert_eq!(session.view(), AppView::Analyze);
        assert!(!session.is_loading());
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            session.history().newest_first()[0].original_text,
            "Some message"
        );
    }

    #[test]
    fn test_empty_input_is_rejected_without_calling_service() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.set_input("   \n", false);

        let result = tokio_test::block_on(session.analyze());
        assert!(matches!(result, Err(SessionError::EmptyInput)));
        assert_eq!(session.service.calls.get(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_failed_analysis_keeps_prior_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.set_input("First text", false);
        tokio_test::block_on(session.analyze()).unwrap();
        let before = session.analysis().cloned();

        session.service.fail.set(true);
        session.set_input("Second text", false);
        let result = tokio_test::block_on(session.analyze());

        assert!(matches!(result, Err(SessionError::Service(_))));
        assert_eq!(session.analysis().cloned(), before);
        assert!(!session.is_loading());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_failed_first_analysis_leaves_no_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.service.fail.set(true);
        session.set_input("Text", false);

        assert!(tokio_test::block_on(session.analyze()).is_err());
        assert!(session.analysis().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_unwritable_history_fails_analysis_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let mut session = session(&blocker.join("data"));
        session.set_input("Text", false);

        let result = tokio_test::block_on(session.analyze());
        assert!(matches!(result, Err(SessionError::Storage(_))));
        assert!(session.analysis().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_humanize_requires_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.set_input("Text", false);

        let result = tokio_test::block_on(session.humanize(Tone::Casual));
        assert!(matches!(result, Err(SessionError::NoAnalysis)));
        assert_eq!(session.view(), AppView::Analyze);
    }

    #[test]
    fn test_humanize_saves_record_with_tone() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.set_input("Text", false);
        tokio_test::block_on(session.analyze()).unwrap();

        tokio_test::block_on(session.humanize(Tone::Academic)).unwrap();

        assert_eq!(session.view(), AppView::Results);
        assert_eq!(session.tone(), Some(Tone::Academic));
        assert_eq!(session.history().len(), 2);
        let latest = session.history().newest_first()[0].clone();
        assert_eq!(latest.tone, Some(Tone::Academic));
        assert_eq!(latest.humanized, Some(sample_humanized()));
        assert_eq!(latest.analysis, sample_analysis(25.0));
    }

    #[test]
    fn test_failed_humanize_keeps_prior_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.set_input("Text", false);
        tokio_test::block_on(session.analyze()).unwrap();
        tokio_test::block_on(session.humanize(Tone::Casual)).unwrap();

        session.service.fail.set(true);
        let result = tokio_test::block_on(session.humanize(Tone::Professional));

        assert!(matches!(result, Err(SessionError::Service(_))));
        assert_eq!(session.humanized(), Some(&sample_humanized()));
        assert_eq!(session.tone(), Some(Tone::Casual));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_new_analysis_clears_stale_humanized_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.set_input("Text", false);
        tokio_test::block_on(session.analyze()).unwrap();
        tokio_test::block_on(session.humanize(Tone::Casual)).unwrap();

        session.set_input("Different text", false);
        tokio_test::block_on(session.analyze()).unwrap();

        assert!(session.humanized().is_none());
        assert_eq!(session.view(), AppView::Analyze);
    }

    #[test]
    fn test_select_record_restores_exactly_that_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());

        session.set_input("Older text", false);
        session.service.human.set(10.0);
        tokio_test::block_on(session.analyze()).unwrap();
        let older_id = session.history().newest_first()[0].id.clone();

        session.set_input("Newer text", false);
        session.service.human.set(90.0);
        tokio_test::block_on(session.analyze()).unwrap();
        tokio_test::block_on(session.humanize(Tone::Casual)).unwrap();

        let selected = session.select_record(&older_id).unwrap().clone();
        assert_eq!(selected.original_text, "Older text");
        assert_eq!(session.input_text(), "Older text");
        assert_eq!(session.analysis(), Some(&selected.analysis));
        assert_eq!(session.analysis().map(|a| a.human_percentage), Some(10.0));
        assert!(session.humanized().is_none());
        assert_eq!(session.tone(), None);
        assert_eq!(session.view(), AppView::Analyze);
    }

    #[test]
    fn test_select_humanized_record_opens_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.set_input("Text", false);
        tokio_test::block_on(session.analyze()).unwrap();
        tokio_test::block_on(session.humanize(Tone::Professional)).unwrap();
        let id = session.history().newest_first()[0].id.clone();

        session.navigate(AppView::History).unwrap();
        session.select_record(&id).unwrap();

        assert_eq!(session.view(), AppView::Results);
        assert_eq!(session.tone(), Some(Tone::Professional));
        assert_eq!(session.humanized(), Some(&sample_humanized()));
    }

    #[test]
    fn test_select_unknown_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        assert!(matches!(
            session.select_record("nope"),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_only_that_record_from_persisted_history() {
        let dir = tempfile::tempdir().unwrap();
        let ids: Vec<String> = {
            let mut session = session(dir.path());
            for text in ["one", "two", "three"] {
                session.set_input(text, false);
                tokio_test::block_on(session.analyze()).unwrap();
            }
            let ids = session
                .history()
                .newest_first()
                .iter()
                .map(|r| r.id.clone())
                .collect();
            let target = session.history().newest_first()[1].id.clone();
            let removed = session.delete_record(&target).unwrap();
            assert_eq!(removed.original_text, "two");
            ids
        };

        let reloaded = HistoryStore::open(dir.path());
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.get(&ids[0]).is_some());
        assert!(reloaded.get(&ids[1]).is_none());
        assert!(reloaded.get(&ids[2]).is_some());
    }

    #[test]
    fn test_delete_unknown_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        assert!(matches!(
            session.delete_record("nope"),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_results_view_requires_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());

        assert!(matches!(
            session.navigate(AppView::Results),
            Err(SessionError::NoAnalysis)
        ));
        session.navigate(AppView::History).unwrap();
        assert_eq!(session.view(), AppView::History);

        session.set_input("Text", false);
        tokio_test::block_on(session.analyze()).unwrap();
        session.navigate(AppView::Results).unwrap();
        assert_eq!(session.view(), AppView::Results);
    }

    #[test]
    fn test_progress_follows_actions() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());

        session.set_input("From a file", true);
        assert_eq!(
            session.progress().current().map(|p| p.id.as_str()),
            Some("first-analysis")
        );

        tokio_test::block_on(session.analyze()).unwrap();
        assert_eq!(
            session.progress().current().map(|p| p.id.as_str()),
            Some("first-humanize")
        );

        tokio_test::block_on(session.humanize(Tone::Casual)).unwrap();
        let id = session.history().newest_first()[0].id.clone();
        session.select_record(&id).unwrap();
        assert!(session.progress().all_completed());
    }
}
