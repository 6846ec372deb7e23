//! Local persistence for cases
//!
//! One directory per case under a storage root, holding the case metadata, the latest
//! snapshot and the image directory shared with camera capture. See [`layout`] for the
//! exact tree.
//!
//! # Error Handling Strategy
//!
//! - **NotFound / Corrupt**: a missing or undecodable snapshot loads as `None`; a broken
//!   `project.json` is skipped during listing; deleting a missing case returns `false`.
//! - **I/O failures** on explicit writes (`create_case`, `save_snapshot`, `delete_case`)
//!   are returned as [`StoreError`] so the caller can offer a retry.
//! - All writes go through a temp file + rename, so a crash mid-write leaves the previous
//!   file intact.

pub mod case_store;
pub mod layout;
pub mod persistence;

pub use case_store::{SnapshotStore, StoreError};
pub use persistence::write_atomic;
