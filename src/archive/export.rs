use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

use super::{ARCHIVE_IMAGES_DIR, ARCHIVE_SNAPSHOT_ENTRY};
use crate::models::SnapshotModel;
use crate::parsers::encode_snapshot;
use crate::store::SnapshotStore;
use crate::utils::encode_segment;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export directory {} lies inside the case directory", .0.display())]
    OutputInsideCase(PathBuf),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("I/O error during export at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ExportError + '_ {
    move |source| ExportError::Io { path: path.to_path_buf(), source }
}

/// Bundles a snapshot and its case images into one zip file in `output_dir`
#[derive(Debug, Clone)]
pub struct ArchiveExporter {
    store: SnapshotStore,
    output_dir: PathBuf,
}

impl ArchiveExporter {
    /// `store` locates each case's image directory; archives are written to `output_dir`
    pub fn new(store: SnapshotStore, output_dir: impl Into<PathBuf>) -> Self {
        Self { store, output_dir: output_dir.into() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write an archive for `snapshot` and return its path
    ///
    /// The archive is named `case_<number>_<name>_<YYYYmmdd_HHMMSS>.zip`; a numeric suffix is
    /// added if that name is taken.
    ///
    /// # Errors
    ///
    /// Any failure aborts the export. No archive file is left in the output directory and
    /// the staging directory is always removed.
    pub fn export(&self, snapshot: &SnapshotModel) -> Result<PathBuf, ExportError> {
        let case_dir = self.store.case_dir(&snapshot.identity);
        if self.output_dir.starts_with(&case_dir) {
            return Err(ExportError::OutputInsideCase(self.output_dir.clone()));
        }
        fs::create_dir_all(&self.output_dir).map_err(io_error(&self.output_dir))?;

        let staging = tempfile::Builder::new()
            .prefix("casefile-export-")
            .tempdir()
            .map_err(io_error(&std::env::temp_dir()))?;

        let snapshot_path = staging.path().join(ARCHIVE_SNAPSHOT_ENTRY);
        fs::write(&snapshot_path, encode_snapshot(snapshot)?).map_err(io_error(&snapshot_path))?;

        let image_count = stage_images(
            &self.store.image_dir(&snapshot.identity),
            &staging.path().join(ARCHIVE_IMAGES_DIR),
        )?;

        let mut archive = NamedTempFile::with_prefix_in(".casefile-export-", &self.output_dir)
            .map_err(io_error(&self.output_dir))?;
        write_zip(staging.path(), archive.as_file_mut())?;

        let file_name = archive_file_name(snapshot);
        let destination = unused_path(&self.output_dir, &file_name);
        archive
            .persist_noclobber(&destination)
            .map_err(|e| ExportError::Io { path: destination.clone(), source: e.error })?;

        info!(
            case_id = %snapshot.identity.case_id(),
            images = image_count,
            archive = %destination.display(),
            "exported case"
        );
        Ok(destination)
    }
}

/// Copy regular files from the case image directory into the staging area
fn stage_images(image_dir: &Path, staged_images: &Path) -> Result<usize, ExportError> {
    if !image_dir.is_dir() {
        return Ok(0);
    }
    fs::create_dir_all(staged_images).map_err(io_error(staged_images))?;

    let mut count = 0;
    for entry in fs::read_dir(image_dir).map_err(io_error(image_dir))? {
        let entry = entry.map_err(io_error(image_dir))?;
        let file_type = entry.file_type().map_err(io_error(&entry.path()))?;
        if !file_type.is_file() {
            debug!("Skipping non-regular file in image directory: {}", entry.path().display());
            continue;
        }

        fs::copy(entry.path(), staged_images.join(entry.file_name()))
            .map_err(io_error(&entry.path()))?;
        count += 1;
    }
    Ok(count)
}

/// Zip every file under `staging`, using `/`-separated paths relative to it
fn write_zip(staging: &Path, out: &mut File) -> Result<(), ExportError> {
    let mut zip = ZipWriter::new(out);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(staging).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ExportError::Io {
            path: staging.to_path_buf(),
            source: io::Error::from(e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry_name(staging, entry.path());
        zip.start_file(name, options)?;
        let mut source = File::open(entry.path()).map_err(io_error(entry.path()))?;
        io::copy(&mut source, &mut zip).map_err(io_error(entry.path()))?;
    }

    zip.finish()?;
    Ok(())
}

fn entry_name(staging: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(staging).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn archive_file_name(snapshot: &SnapshotModel) -> String {
    format!(
        "case_{}_{}_{}",
        encode_segment(&snapshot.identity.case_number),
        encode_segment(&snapshot.identity.case_name),
        Utc::now().format("%Y%m%d_%H%M%S")
    )
}

/// `<dir>/<stem>.zip`, or `<dir>/<stem>-N.zip` for the first N not yet taken
fn unused_path(dir: &Path, stem: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.zip", stem));
    if !candidate.exists() {
        return candidate;
    }
    (1..)
        .map(|n| dir.join(format!("{}-{}.zip", stem, n)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
