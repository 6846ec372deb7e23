//! Data model for a forensic case.
//!
//! - [`CaseIdentity`] - Case number and name; the stable directory key
//! - [`SnapshotModel`] - Aggregate root: identity plus all user-entered [`CaseData`]
//! - [`Observation`], [`Theme`], [`FocusPoint`], [`ActionItem`] - Leaf value objects
//! - [`Marker`], [`RoomOrientation`] - Spatial data produced by the reconstruction engine
//! - [`CrimeType`] - Presets that expand into main themes
//!
//! All id-bearing entities get a random UUID at creation which never changes afterwards.

pub mod case;
pub mod focus_point;
pub mod observation;
pub mod page;
pub mod presets;
pub mod snapshot;
pub mod spatial;
pub mod theme;

pub use case::{CaseIdentity, IdentityError};
pub use focus_point::{ActionItem, ActionKind, ActionList, FocusPoint, SampleKind, SceneProbability};
pub use observation::Observation;
pub use page::PageId;
pub use presets::{CrimeType, ThemeKind};
pub use snapshot::{CaseData, SNAPSHOT_FORMAT_VERSION, SnapshotModel};
pub use spatial::{Marker, RoomOrientation};
pub use theme::Theme;

/// Generate a new process-wide unique entity id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
