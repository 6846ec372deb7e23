use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use super::{ARCHIVE_IMAGES_DIR, ARCHIVE_SNAPSHOT_ENTRY};
use crate::models::SnapshotModel;
use crate::parsers::read_snapshot_file;
use crate::store::{SnapshotStore, StoreError};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("not a readable zip archive: {0}")]
    InvalidArchive(#[source] zip::result::ZipError),
    #[error("archive has no project_state.json entry")]
    MissingSnapshot,
    #[error("archive snapshot could not be decoded: {0}")]
    Corrupt(String),
    #[error("I/O error during import: {0}")]
    Io(#[from] io::Error),
}

/// The contents of an imported archive, held in memory
///
/// Nothing is written to the case store until [`ImportedArchive::adopt_into`] is called.
#[derive(Debug, Clone)]
pub struct ImportedArchive {
    pub snapshot: SnapshotModel,
    /// Image file name to bytes, for every regular file under `images/`
    pub images: BTreeMap<String, Vec<u8>>,
}

impl ImportedArchive {
    /// Write the images into `dir`, creating it if needed
    ///
    /// Names that are not plain file names are skipped. Returns how many images were written.
    pub fn install_images(&self, dir: &Path) -> io::Result<usize> {
        fs::create_dir_all(dir)?;

        let mut written = 0;
        for (name, bytes) in &self.images {
            if !is_plain_file_name(name) {
                warn!("Skipping image with unsafe name: {:?}", name);
                continue;
            }
            fs::write(dir.join(name), bytes)?;
            written += 1;
        }
        Ok(written)
    }

    /// Turn the archive into a local case
    ///
    /// Creates the case, saves the snapshot and installs the images. Returns the new case
    /// directory.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyExists`] if a case with the same number and name is already
    /// stored; the existing case is left untouched.
    pub fn adopt_into(&self, store: &SnapshotStore) -> Result<PathBuf, StoreError> {
        let identity = &self.snapshot.identity;
        let case_dir = store.create_case(identity)?;
        store.save_snapshot(&self.snapshot)?;

        let image_dir = store.image_dir(identity);
        let installed = self
            .install_images(&image_dir)
            .map_err(|source| StoreError::Io { path: image_dir.clone(), source })?;

        info!(case_id = %identity.case_id(), images = installed, "adopted imported case");
        Ok(case_dir)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.file_name().is_some_and(|file_name| file_name == path.as_os_str())
}

/// Read a case archive, returning `None` if it is not a usable archive
///
/// The reason is logged at `warn` level. Use [`try_import_archive`] to get it instead.
pub fn import_archive(source: impl Read) -> Option<ImportedArchive> {
    match try_import_archive(source) {
        Ok(archive) => Some(archive),
        Err(e) => {
            warn!("Import failed: {}", e);
            None
        }
    }
}

/// Like [`import_archive`], reading from a file on disk
pub fn import_archive_file(path: &Path) -> Option<ImportedArchive> {
    match File::open(path) {
        Ok(file) => import_archive(file),
        Err(e) => {
            warn!("Cannot open archive {}: {}", path.display(), e);
            None
        }
    }
}

/// Read a case archive
///
/// The bytes are copied into a private temporary directory and extracted there; the
/// directory is removed before this returns. Entries that would extract outside it are
/// skipped. Other entries are extracted but only the snapshot and the images are read.
///
/// # Errors
///
/// - [`ImportError::InvalidArchive`] if the bytes are not a zip archive
/// - [`ImportError::MissingSnapshot`] if there is no `project_state.json`
/// - [`ImportError::Corrupt`] if the snapshot does not decode
/// - [`ImportError::Io`] if the temporary copy cannot be written
pub fn try_import_archive(mut source: impl Read) -> Result<ImportedArchive, ImportError> {
    let workdir = tempfile::Builder::new().prefix("casefile-import-").tempdir()?;

    let archive_path = workdir.path().join("import.zip");
    let mut copy = File::create(&archive_path)?;
    io::copy(&mut source, &mut copy)?;
    drop(copy);

    let extract_dir = workdir.path().join("extracted");
    fs::create_dir(&extract_dir)?;
    extract(&archive_path, &extract_dir)?;

    let snapshot_path = extract_dir.join(ARCHIVE_SNAPSHOT_ENTRY);
    if !snapshot_path.is_file() {
        return Err(ImportError::MissingSnapshot);
    }
    let snapshot =
        read_snapshot_file(&snapshot_path).map_err(|e| ImportError::Corrupt(format!("{:#}", e)))?;

    let images = read_images(&extract_dir.join(ARCHIVE_IMAGES_DIR))?;

    debug!(
        case_id = %snapshot.identity.case_id(),
        images = images.len(),
        "imported archive"
    );
    Ok(ImportedArchive { snapshot, images })
}

fn extract(archive_path: &Path, extract_dir: &Path) -> Result<(), ImportError> {
    let mut archive =
        ZipArchive::new(File::open(archive_path)?).map_err(ImportError::InvalidArchive)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(ImportError::InvalidArchive)?;
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            warn!("Skipping archive entry with unsafe path: {:?}", entry.name());
            continue;
        };

        let target = extract_dir.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
    }
    Ok(())
}

fn read_images(images_dir: &Path) -> io::Result<BTreeMap<String, Vec<u8>>> {
    let mut images = BTreeMap::new();
    if !images_dir.is_dir() {
        return Ok(images);
    }

    for entry in fs::read_dir(images_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => {
                images.insert(name, fs::read(entry.path())?);
            }
            Err(name) => warn!("Skipping image with non UTF-8 name: {:?}", name),
        }
    }
    Ok(images)
}
