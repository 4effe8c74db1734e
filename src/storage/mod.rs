//! Local on-device persistence.
//!
//! Two named slots live under the data directory, each holding a JSON array:
//! the analysis history and the onboarding progress markers.

pub mod history;
pub mod progress;
pub mod slot;

pub use history::HistoryStore;
pub use progress::{ProgressTracker, ProtocolId};

/// Slot holding the serialized history records.
pub const HISTORY_SLOT: &str = "textguard_history";

/// Slot holding the onboarding progress markers.
pub const PROGRESS_SLOT: &str = "textguard_protocols";
