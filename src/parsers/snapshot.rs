use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{CaseIdentity, SnapshotModel};
use crate::utils::validate_file_size;

/// Encode a snapshot as pretty-printed JSON
pub fn encode_snapshot(snapshot: &SnapshotModel) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Decode a snapshot, ignoring unknown keys and defaulting missing collections.
/// Duplicate ids are collapsed so collections stay sets.
pub fn decode_snapshot(json: &str) -> serde_json::Result<SnapshotModel> {
    let mut snapshot: SnapshotModel = serde_json::from_str(json)?;
    snapshot.data.dedupe_ids();
    Ok(snapshot)
}

pub fn encode_case_identity(identity: &CaseIdentity) -> serde_json::Result<String> {
    serde_json::to_string_pretty(identity)
}

pub fn decode_case_identity(json: &str) -> serde_json::Result<CaseIdentity> {
    serde_json::from_str(json)
}

/// Read and decode a snapshot file, refusing oversized files
pub fn read_snapshot_file(path: &Path) -> Result<SnapshotModel> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut json = String::new();
    (&file)
        .read_to_string(&mut json)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

    decode_snapshot(&json)
        .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))
}

/// Read and decode a case metadata file
pub fn read_case_identity_file(path: &Path) -> Result<CaseIdentity> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open case metadata: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut json = String::new();
    (&file)
        .read_to_string(&mut json)
        .with_context(|| format!("Failed to read case metadata: {}", path.display()))?;

    decode_case_identity(&json)
        .with_context(|| format!("Failed to parse case metadata: {}", path.display()))
}
