//! Portable case archives
//!
//! An archive is a zip file holding the snapshot plus the case's images:
//!
//! ```text
//! project_state.json
//! images/<filename>
//! ```
//!
//! Export and import both stage their work in a fresh temporary directory that is removed
//! when the operation returns, whether it succeeded or not. Export builds the zip next to
//! its destination and only renames it into place once complete, so a failed export never
//! leaves a partial archive behind.

pub mod export;
pub mod import;

pub use export::{ArchiveExporter, ExportError};
pub use import::{
    ImportError, ImportedArchive, import_archive, import_archive_file, try_import_archive,
};

/// Entry holding the encoded snapshot
pub const ARCHIVE_SNAPSHOT_ENTRY: &str = "project_state.json";

/// Entry group holding the case images
pub const ARCHIVE_IMAGES_DIR: &str = "images";
