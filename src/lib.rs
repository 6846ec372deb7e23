//! Casefile - Snapshot persistence and portable archives for forensic case work
//!
//! This library keeps the working state of a forensic investigation on local disk and
//! moves it between devices as a single zip file. It provides:
//!
//! - A typed case model ([`SnapshotModel`]) serialized to camelCase JSON
//! - A directory-per-case store with atomic writes ([`SnapshotStore`])
//! - An editing session that autosaves after every change ([`SessionController`])
//! - Export to and import from portable archives ([`ArchiveExporter`], [`import_archive`])
//!
//! # Example
//!
//! ```no_run
//! use casefile::{CaseIdentity, SessionController, SnapshotStore};
//! use casefile::session::NoteSection;
//!
//! let store = SnapshotStore::new("/data/casefile/cases");
//! let identity = CaseIdentity::new("2024-001", "Kitchen Fire")?;
//! store.create_case(&identity)?;
//!
//! let mut session = SessionController::new(store);
//! session.open_case(identity);
//! session.add_note(NoteSection::OnSite, "Smoke detector disabled");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod archive;
pub mod cli;
pub mod models;
pub mod parsers;
pub mod session;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use archive::{
    ArchiveExporter, ImportedArchive, import_archive, import_archive_file, try_import_archive,
};
pub use models::{CaseData, CaseIdentity, SnapshotModel};
pub use session::SessionController;
pub use store::SnapshotStore;
pub use utils::paths::{encode_segment, format_path_with_tilde};
