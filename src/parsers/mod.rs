//! JSON codec for snapshots and case metadata
//!
//! # Error Handling Strategy
//!
//! Decoding is **forward compatible**: unknown keys are ignored and missing keys take their
//! defaults, so a snapshot written by a newer build still opens in an older one. Anything
//! that is not valid JSON, lacks the case identity, or exceeds the file size limit is an
//! error here; callers in `store` and `archive` decide whether that means "no snapshot".

pub mod deserializers;
pub mod snapshot;

pub use snapshot::{
    decode_case_identity, decode_snapshot, encode_case_identity, encode_snapshot,
    read_case_identity_file, read_snapshot_file,
};
