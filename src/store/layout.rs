//! On-disk layout of a case directory
//!
//! ```text
//! <root>/<caseNumber>/<caseName>/
//!   project.json            case identity, written once at creation
//!   project_state.json      snapshot, overwritten by every save
//!   markers.txt             placeholder consumed by the reconstruction engine
//!   Reconstruction/images/  captured images
//! ```

use std::path::{Path, PathBuf};

use crate::models::CaseIdentity;
use crate::utils::encode_segment;

pub const CASE_METADATA_FILENAME: &str = "project.json";
pub const SNAPSHOT_FILENAME: &str = "project_state.json";
pub const MARKERS_FILENAME: &str = "markers.txt";
pub const RECONSTRUCTION_DIR_NAME: &str = "Reconstruction";
pub const IMAGES_DIR_NAME: &str = "images";

pub fn case_dir(root: &Path, identity: &CaseIdentity) -> PathBuf {
    root.join(encode_segment(&identity.case_number)).join(encode_segment(&identity.case_name))
}

pub fn image_dir(case_dir: &Path) -> PathBuf {
    case_dir.join(RECONSTRUCTION_DIR_NAME).join(IMAGES_DIR_NAME)
}

pub fn metadata_path(case_dir: &Path) -> PathBuf {
    case_dir.join(CASE_METADATA_FILENAME)
}

pub fn snapshot_path(case_dir: &Path) -> PathBuf {
    case_dir.join(SNAPSHOT_FILENAME)
}
