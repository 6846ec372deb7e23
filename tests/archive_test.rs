/// End-to-end tests for portable archives
///
/// These tests verify complete workflows: stored case → export → import → adopt
mod common;

use std::fs::{self, File};
use std::io::{Cursor, Write};

use casefile::archive::{ImportError, import_archive_file};
use casefile::models::{Observation, Theme};
use casefile::store::SnapshotStore;
use casefile::{ArchiveExporter, CaseIdentity, SnapshotModel, try_import_archive};
use common::{CaseBuilder, CaseHomeBuilder, cases_root, legacy_snapshot_json};
use zip::write::{FileOptions, ZipWriter};

fn stored_case(store: &SnapshotStore, images: usize) -> SnapshotModel {
    let identity = CaseIdentity::new("2024-001", "Kitchen Fire").unwrap();
    store.create_case(&identity).unwrap();

    let mut snapshot = SnapshotModel::empty(identity);
    snapshot.data.observations.push(Observation::new("Scorched wall", "Kitchen", ""));
    snapshot.data.themes.push(Theme::new("Accident", true, "no forced entry"));
    store.save_snapshot(&snapshot).unwrap();

    let image_dir = store.image_dir(&snapshot.identity);
    for i in 0..images {
        fs::write(image_dir.join(format!("photo_{i}.jpg")), vec![i as u8; 64]).unwrap();
    }
    snapshot
}

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn test_e2e_export_import_roundtrip() {
    let home = CaseHomeBuilder::new().build();
    let store = SnapshotStore::new(cases_root(home.path()));
    let snapshot = stored_case(&store, 3);

    let exporter = ArchiveExporter::new(store, home.path().join("exports"));
    let archive = exporter.export(&snapshot).unwrap();

    let imported = import_archive_file(&archive).expect("archive should import");
    assert_eq!(imported.snapshot, snapshot);
    assert_eq!(imported.images.len(), 3);
    assert_eq!(imported.images["photo_2.jpg"], vec![2u8; 64]);
}

#[test]
fn test_e2e_adopt_on_another_device() {
    let source = CaseHomeBuilder::new().build();
    let source_store = SnapshotStore::new(cases_root(source.path()));
    let snapshot = stored_case(&source_store, 2);
    let archive = ArchiveExporter::new(source_store, source.path().join("exports"))
        .export(&snapshot)
        .unwrap();

    let target = CaseHomeBuilder::new().build();
    let target_store = SnapshotStore::new(cases_root(target.path()));
    let imported = import_archive_file(&archive).unwrap();
    imported.adopt_into(&target_store).unwrap();

    assert_eq!(target_store.list_cases(), vec![snapshot.identity.clone()]);
    assert_eq!(target_store.load_snapshot(&snapshot.identity), Some(snapshot.clone()));
    let image_dir = target_store.image_dir(&snapshot.identity);
    assert_eq!(fs::read_dir(image_dir).unwrap().count(), 2);
}

#[test]
fn test_export_leaves_case_untouched() {
    let home = CaseHomeBuilder::new()
        .with_case(
            CaseBuilder::new("2024-001", "Kitchen Fire")
                .snapshot_json(&legacy_snapshot_json("2024-001", "Kitchen Fire"))
                .image("overview.jpg", b"jpeg"),
        )
        .build();
    let store = SnapshotStore::new(cases_root(home.path()));
    let identity = store.list_cases().remove(0);
    let snapshot_path = store.case_dir(&identity).join("project_state.json");
    let before = fs::read(&snapshot_path).unwrap();

    let snapshot = store.load_snapshot(&identity).unwrap();
    let archive = ArchiveExporter::new(store.clone(), home.path().join("exports"))
        .export(&snapshot)
        .unwrap();

    assert_eq!(fs::read(&snapshot_path).unwrap(), before);
    let imported = import_archive_file(&archive).unwrap();
    assert_eq!(imported.snapshot, snapshot);
    assert_eq!(imported.images["overview.jpg"], b"jpeg");
}

#[test]
fn test_import_rejects_archive_without_snapshot() {
    let bytes = zip_bytes(&[("images/a.jpg", b"aaa"), ("readme.txt", b"hello")]);
    let err = try_import_archive(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, ImportError::MissingSnapshot));
}

#[test]
fn test_import_rejects_non_zip_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("notes.zip");
    File::create(&path).unwrap().write_all(b"this is not a zip archive").unwrap();

    assert!(import_archive_file(&path).is_none());
    assert!(import_archive_file(&dir.path().join("missing.zip")).is_none());
}

#[test]
fn test_import_ignores_unknown_and_unsafe_entries() {
    let json = legacy_snapshot_json("2024-001", "Kitchen Fire");
    let bytes = zip_bytes(&[
        ("project_state.json", json.as_bytes()),
        ("../../outside.txt", b"escape"),
        ("/absolute.txt", b"escape"),
        ("images/a.jpg", b"aaa"),
        ("images/nested/b.jpg", b"bbb"),
        ("extra/notes.txt", b"ignored"),
    ]);

    let imported = try_import_archive(Cursor::new(bytes)).unwrap();
    assert_eq!(imported.snapshot.identity.case_name, "Kitchen Fire");
    assert_eq!(imported.images.keys().collect::<Vec<_>>(), vec!["a.jpg"]);
}
