//! The live editing session for the currently open case
//!
//! [`SessionController`] owns the in-memory [`CaseData`](crate::models::CaseData) and writes
//! it through [`SnapshotStore`](crate::store::SnapshotStore) after every edit.
//!
//! # Error Handling Strategy
//!
//! Autosave failures never reach the caller: they are logged, recorded in
//! [`AutosaveStatus`] and broadcast as [`SessionEvent::AutosaveFailed`], so the next edit
//! proceeds normally and a UI can still show that persistence is degraded.

pub mod controller;
pub mod events;

pub use controller::{NoteSection, SessionController};
pub use events::{AutosaveStatus, SessionEvent};
