use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::layout::{self, CASE_METADATA_FILENAME, MARKERS_FILENAME, RECONSTRUCTION_DIR_NAME};
use super::persistence::write_atomic;
use crate::models::{CaseIdentity, SnapshotModel};
use crate::parsers::{
    encode_case_identity, encode_snapshot, read_case_identity_file, read_snapshot_file,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("case already exists at {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("case directory not found: {}", .0.display())]
    CaseNotFound(PathBuf),
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io { path: path.to_path_buf(), source }
}

/// Reads and writes cases under a storage root.
///
/// Listing and loading are best-effort: a corrupt or foreign file is logged and treated as
/// absent so one broken case never blocks the others. Explicit writes report failures.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn case_dir(&self, identity: &CaseIdentity) -> PathBuf {
        layout::case_dir(&self.root, identity)
    }

    /// Where captured images for a case are written; nothing is created on disk
    pub fn image_dir(&self, identity: &CaseIdentity) -> PathBuf {
        layout::image_dir(&self.case_dir(identity))
    }

    pub fn case_exists(&self, identity: &CaseIdentity) -> bool {
        layout::metadata_path(&self.case_dir(identity)).is_file()
    }

    /// Create the case directory tree and write its metadata file
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyExists`] if the directory already holds case metadata
    /// - [`StoreError::Io`] if any directory or file cannot be written
    pub fn create_case(&self, identity: &CaseIdentity) -> Result<PathBuf, StoreError> {
        let case_dir = self.case_dir(identity);
        let metadata_path = layout::metadata_path(&case_dir);
        if metadata_path.exists() {
            return Err(StoreError::AlreadyExists(case_dir));
        }

        let image_dir = layout::image_dir(&case_dir);
        fs::create_dir_all(&image_dir).map_err(io_error(&image_dir))?;

        let markers_path = case_dir.join(MARKERS_FILENAME);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&markers_path)
            .map_err(io_error(&markers_path))?;

        let json = encode_case_identity(identity)
            .map_err(|source| StoreError::Encode { what: "case metadata", source })?;
        write_atomic(&metadata_path, json.as_bytes()).map_err(io_error(&metadata_path))?;

        info!(case_id = %identity.case_id(), dir = %case_dir.display(), "created case");
        Ok(case_dir)
    }

    /// Enumerate every case under the root
    ///
    /// Metadata files that cannot be read or decoded are skipped with a warning. Symlinks
    /// are not followed and reconstruction output is not descended into. Results are ordered
    /// by creation time, then case id.
    pub fn list_cases(&self) -> Vec<CaseIdentity> {
        if !self.root.is_dir() {
            return Vec::new();
        }

        let mut cases = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != RECONSTRUCTION_DIR_NAME);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry while listing cases: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || entry.file_name() != CASE_METADATA_FILENAME {
                continue;
            }

            match read_case_identity_file(entry.path()) {
                Ok(identity) => cases.push(identity),
                Err(e) => warn!("Skipping case with unreadable metadata: {:#}", e),
            }
        }

        cases.sort_by(|a, b| {
            a.created_at.cmp(&b.created_at).then_with(|| a.case_id().cmp(&b.case_id()))
        });
        cases
    }

    /// Remove a case directory and everything in it
    ///
    /// Returns `Ok(false)` when there was nothing to delete. The case number directory is
    /// removed too once it holds no other case.
    pub fn delete_case(&self, identity: &CaseIdentity) -> Result<bool, StoreError> {
        let case_dir = self.case_dir(identity);
        if fs::symlink_metadata(&case_dir).is_err() {
            return Ok(false);
        }

        fs::remove_dir_all(&case_dir).map_err(io_error(&case_dir))?;

        if let Some(number_dir) = case_dir.parent()
            && number_dir != self.root
        {
            // Fails harmlessly while other cases share the number
            let _ = fs::remove_dir(number_dir);
        }

        info!(case_id = %identity.case_id(), "deleted case");
        Ok(true)
    }

    /// Overwrite the case's snapshot file with `snapshot`
    ///
    /// # Errors
    ///
    /// - [`StoreError::CaseNotFound`] if the case directory does not exist
    /// - [`StoreError::Io`] / [`StoreError::Encode`] if the write fails
    pub fn save_snapshot(&self, snapshot: &SnapshotModel) -> Result<(), StoreError> {
        let case_dir = self.case_dir(&snapshot.identity);
        if !case_dir.is_dir() {
            return Err(StoreError::CaseNotFound(case_dir));
        }

        let json = encode_snapshot(snapshot)
            .map_err(|source| StoreError::Encode { what: "snapshot", source })?;
        let path = layout::snapshot_path(&case_dir);
        write_atomic(&path, json.as_bytes()).map_err(io_error(&path))?;

        debug!(case_id = %snapshot.identity.case_id(), "saved snapshot");
        Ok(())
    }

    /// Load the last saved snapshot, or `None` if there is none or it cannot be decoded
    pub fn load_snapshot(&self, identity: &CaseIdentity) -> Option<SnapshotModel> {
        let path = layout::snapshot_path(&self.case_dir(identity));
        if !path.is_file() {
            return None;
        }

        match read_snapshot_file(&path) {
            Ok(snapshot) if snapshot.identity.same_case(identity) => Some(snapshot),
            Ok(snapshot) => {
                warn!(
                    "Ignoring snapshot at {} that belongs to case {}",
                    path.display(),
                    snapshot.identity.case_id()
                );
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable snapshot: {:#}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::models::{Observation, SnapshotModel};
    use crate::store::layout::{SNAPSHOT_FILENAME, image_dir};

    fn identity(number: &str, name: &str) -> CaseIdentity {
        CaseIdentity::new(number, name).unwrap()
    }

    #[test]
    fn test_create_case_builds_layout() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let case = identity("2024-001", "Kitchen Fire");

        let dir = store.create_case(&case).unwrap();

        assert_eq!(dir, root.path().join("2024-001").join("Kitchen Fire"));
        assert!(dir.join(CASE_METADATA_FILENAME).is_file());
        assert!(dir.join(MARKERS_FILENAME).is_file());
        assert!(image_dir(&dir).is_dir());
        assert_eq!(store.image_dir(&case), image_dir(&dir));
        assert!(store.case_exists(&case));
    }

    #[test]
    fn test_create_case_twice_fails() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let case = identity("1", "a");

        store.create_case(&case).unwrap();
        let err = store.create_case(&case).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[test]
    fn test_create_case_keeps_existing_images() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let case = identity("1", "a");

        let images = store.image_dir(&case);
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("photo.jpg"), b"jpeg").unwrap();

        store.create_case(&case).unwrap();
        assert_eq!(fs::read(images.join("photo.jpg")).unwrap(), b"jpeg");
    }

    #[test]
    fn test_list_cases_missing_root() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path().join("does-not-exist"));
        assert!(store.list_cases().is_empty());
    }

    #[test]
    fn test_list_cases_ignores_metadata_inside_reconstruction() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let case = identity("1", "a");
        let dir = store.create_case(&case).unwrap();

        let stray = dir.join(RECONSTRUCTION_DIR_NAME).join(CASE_METADATA_FILENAME);
        fs::write(&stray, encode_case_identity(&identity("2", "b")).unwrap()).unwrap();

        assert_eq!(store.list_cases(), vec![case]);
    }

    #[test]
    fn test_delete_missing_case_returns_false() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        assert!(!store.delete_case(&identity("1", "a")).unwrap());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_delete_case_keeps_sibling_cases() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let first = identity("2024-001", "Kitchen");
        let second = identity("2024-001", "Garage");
        store.create_case(&first).unwrap();
        store.create_case(&second).unwrap();

        assert!(store.delete_case(&first).unwrap());
        assert!(root.path().join("2024-001").is_dir());
        assert!(store.case_exists(&second));

        assert!(store.delete_case(&second).unwrap());
        assert!(!root.path().join("2024-001").exists());
        assert!(root.path().is_dir());
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let case = identity("1", "a");
        store.create_case(&case).unwrap();

        let mut snapshot = SnapshotModel::empty(case.clone());
        snapshot.data.observations.push(Observation::new("footprint", "porch", ""));
        store.save_snapshot(&snapshot).unwrap();

        assert_eq!(store.load_snapshot(&case), Some(snapshot));
    }

    #[test]
    fn test_save_snapshot_without_case_dir_fails() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let snapshot = SnapshotModel::empty(identity("1", "a"));

        let err = store.save_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, StoreError::CaseNotFound(_)));
    }

    #[test]
    fn test_load_snapshot_absent_and_corrupt() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let case = identity("1", "a");
        let dir = store.create_case(&case).unwrap();

        assert_eq!(store.load_snapshot(&case), None);

        fs::write(dir.join(SNAPSHOT_FILENAME), "{ not json").unwrap();
        assert_eq!(store.load_snapshot(&case), None);
    }

    #[test]
    fn test_load_snapshot_rejects_foreign_snapshot() {
        let root = TempDir::new().unwrap();
        let store = SnapshotStore::new(root.path());
        let case = identity("1", "a");
        let dir = store.create_case(&case).unwrap();

        let foreign = SnapshotModel::empty(identity("9", "z"));
        fs::write(dir.join(SNAPSHOT_FILENAME), encode_snapshot(&foreign).unwrap()).unwrap();

        assert_eq!(store.load_snapshot(&case), None);
    }
}
