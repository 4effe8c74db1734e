//! Onboarding missions.
//!
//! A fixed list of protocols walks a new user through the tool. Completion
//! flags are persisted in the `textguard_protocols` slot and merged back onto
//! the built-in list at startup.

use super::slot::JsonSlot;
use super::PROGRESS_SLOT;
use crate::models::Protocol;
use std::path::Path;
use tracing::{debug, info};

/// Identifiers of the built-in protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolId {
    FirstAnalysis,
    UploadDocument,
    FirstHumanize,
    ReviewHistory,
}

impl ProtocolId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstAnalysis => "first-analysis",
            Self::UploadDocument => "upload-document",
            Self::FirstHumanize => "first-humanize",
            Self::ReviewHistory => "review-history",
        }
    }
}

fn protocol(id: ProtocolId, title: &str, description: &str, hint: &str, icon: &str) -> Protocol {
    Protocol {
        id: id.as_str().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        completed: false,
        action_hint: hint.to_string(),
        icon: icon.to_string(),
    }
}

/// The built-in protocols, in the order they are offered.
pub fn default_protocols() -> Vec<Protocol> {
    vec![
        protocol(
            ProtocolId::FirstAnalysis,
            "Run Your First Analysis",
            "Submit a message and inspect its AI-likelihood report.",
            "textguard analyze \"<text>\"",
            "analytics",
        ),
        protocol(
            ProtocolId::UploadDocument,
            "Analyze a Document",
            "Feed a PDF, DOCX or TXT file straight into the analyzer.",
            "textguard analyze --file report.pdf",
            "upload_file",
        ),
        protocol(
            ProtocolId::FirstHumanize,
            "Humanize a Message",
            "Rewrite flagged text in a casual, professional or academic tone.",
            "textguard humanize --tone casual \"<text>\"",
            "face",
        ),
        protocol(
            ProtocolId::ReviewHistory,
            "Revisit Past Work",
            "Open a saved record from your on-device history.",
            "textguard show <id>",
            "history",
        ),
    ]
}

/// Tracks which protocols the user has completed.
pub struct ProgressTracker {
    slot: JsonSlot<Protocol>,
    protocols: Vec<Protocol>,
}

impl ProgressTracker {
    pub fn open(data_dir: &Path) -> Self {
        let slot: JsonSlot<Protocol> = JsonSlot::new(data_dir, PROGRESS_SLOT);
        let stored = slot.load();

        let mut protocols = default_protocols();
        for protocol in &mut protocols {
            if let Some(saved) = stored.iter().find(|s| s.id == protocol.id) {
                protocol.completed = saved.completed;
            }
        }

        debug!(
            "Loaded progress: {}/{} protocols completed",
            protocols.iter().filter(|p| p.completed).count(),
            protocols.len()
        );

        Self { slot, protocols }
    }

    /// Mark a protocol complete. Returns whether anything changed.
    pub fn complete(&mut self, id: ProtocolId) -> std::io::Result<bool> {
        let Some(protocol) = self.protocols.iter_mut().find(|p| p.id == id.as_str()) else {
            return Ok(false);
        };
        if protocol.completed {
            return Ok(false);
        }

        protocol.completed = true;
        info!("Protocol completed: {}", protocol.title);
        self.slot.save(&self.protocols)?;
        Ok(true)
    }

    /// The first protocol still open.
    pub fn current(&self) -> Option<&Protocol> {
        self.protocols.iter().find(|p| !p.completed)
    }

    pub fn all_completed(&self) -> bool {
        self.protocols.iter().all(|p| p.completed)
    }

    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }
}
