//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a casefile data directory: `<home>/cases` and `<home>/exports`
pub struct CaseHomeBuilder {
    temp_dir: TempDir,
}

impl CaseHomeBuilder {
    /// Create a new builder with an empty `cases/` directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("cases")).expect("Failed to create cases dir");
        Self { temp_dir }
    }

    /// Get the path to the data directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a case written the way an earlier app build would have left it on disk
    pub fn with_case(self, case: CaseBuilder) -> Self {
        case.create_in(&self.temp_dir.path().join("cases"));
        self
    }

    /// Add an arbitrary file relative to `cases/`
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join("cases").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for CaseHomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage root inside a data directory built by [`CaseHomeBuilder`]
pub fn cases_root(home: &Path) -> PathBuf {
    home.join("cases")
}

/// Builder for one on-disk case
pub struct CaseBuilder {
    number: String,
    name: String,
    created_at_millis: i64,
    metadata: Option<String>,
    snapshot: Option<String>,
    images: Vec<(String, Vec<u8>)>,
}

impl CaseBuilder {
    /// Create a case with plain (unencoded) number and name
    pub fn new(number: &str, name: &str) -> Self {
        Self {
            number: number.to_string(),
            name: name.to_string(),
            created_at_millis: 1_700_000_000_000,
            metadata: None,
            snapshot: None,
            images: Vec::new(),
        }
    }

    /// Set the creation time in epoch milliseconds
    pub fn created_at(mut self, millis: i64) -> Self {
        self.created_at_millis = millis;
        self
    }

    /// Replace `project.json` with raw content
    pub fn raw_metadata(mut self, content: &str) -> Self {
        self.metadata = Some(content.to_string());
        self
    }

    /// Write `project_state.json` with raw content
    pub fn snapshot_json(mut self, content: &str) -> Self {
        self.snapshot = Some(content.to_string());
        self
    }

    /// Add a file to `Reconstruction/images/`
    pub fn image(mut self, name: &str, bytes: &[u8]) -> Self {
        self.images.push((name.to_string(), bytes.to_vec()));
        self
    }

    /// Metadata JSON with a millisecond timestamp
    pub fn metadata_json(&self) -> String {
        format!(
            r#"{{"caseNumber":"{}","caseName":"{}","createdAt":{}}}"#,
            self.number, self.name, self.created_at_millis
        )
    }

    /// Create the case tree under `root`
    pub fn create_in(&self, root: &Path) {
        let case_dir = root.join(&self.number).join(&self.name);
        let image_dir = case_dir.join("Reconstruction").join("images");
        fs::create_dir_all(&image_dir).expect("Failed to create case dir");

        let metadata = self.metadata.clone().unwrap_or_else(|| self.metadata_json());
        fs::write(case_dir.join("project.json"), metadata).expect("Failed to write metadata");

        if let Some(snapshot) = &self.snapshot {
            fs::write(case_dir.join("project_state.json"), snapshot)
                .expect("Failed to write snapshot");
        }

        for (name, bytes) in &self.images {
            fs::write(image_dir.join(name), bytes).expect("Failed to write image");
        }
    }
}

/// A snapshot as written by an earlier app build: no format version, millisecond
/// timestamps, an unknown key and a page this build does not know about
pub fn legacy_snapshot_json(number: &str, name: &str) -> String {
    format!(
        r#"{{
  "identity": {{ "caseNumber": "{number}", "caseName": "{name}", "createdAt": 1700000000000 }},
  "preliminaryNotes": ["Called in by neighbour"],
  "observations": [
    {{ "id": "obs-1", "createdAt": 1700000100000, "description": "Scorched wall",
       "location": "Kitchen", "notes": "", "bookmarked": true }}
  ],
  "focusPoints": [
    {{ "id": "fp-1", "title": "Ignition", "themeRef": "theme-1",
       "primaryActions": [
         {{ "id": "a-1", "descriptionAndLocation": "Swab stove knob",
            "actionKind": "Secure", "sampleKind": "Blood" }}
       ] }}
  ],
  "pageCompletion": {{ "Info": true, "Legacy": true }},
  "viewerSettings": {{ "zoom": 2 }}
}}"#
    )
}
