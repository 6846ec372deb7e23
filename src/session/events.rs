use chrono::{DateTime, Utc};

use crate::models::CaseIdentity;

/// Notifications sent to session subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CaseOpened(CaseIdentity),
    CaseClosed,
    /// In-memory state changed; `revision` increases with every edit
    Changed { revision: u64 },
    /// An autosave did not reach disk. The in-memory state is unaffected.
    AutosaveFailed { message: String },
}

/// Outcome of the most recent autosave
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AutosaveStatus {
    /// Nothing saved yet in this session
    #[default]
    Idle,
    Saved { at: DateTime<Utc> },
    Failed { message: String, at: DateTime<Utc> },
}

impl AutosaveStatus {
    /// True when the last edit may not be on disk
    pub fn is_degraded(&self) -> bool {
        matches!(self, AutosaveStatus::Failed { .. })
    }
}
