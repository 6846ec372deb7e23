use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{CaseIdentity, FocusPoint, Marker, Observation, PageId, RoomOrientation, Theme};

/// Snapshot format written by this build
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

fn current_format_version() -> u32 {
    SNAPSHOT_FORMAT_VERSION
}

/// Everything the user has entered for one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotModel {
    #[serde(default = "current_format_version")]
    pub format_version: u32,
    pub identity: CaseIdentity,
    #[serde(flatten)]
    pub data: CaseData,
}

/// The editable part of a snapshot, independent of which case it belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseData {
    pub preliminary_notes: Vec<String>,
    pub on_site_notes: Vec<String>,
    pub observations: Vec<Observation>,
    pub themes: Vec<Theme>,
    pub focus_points: Vec<FocusPoint>,
    pub markers: Vec<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_model: Option<RoomOrientation>,
    pub freeform_data: BTreeMap<String, String>,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_page_completion")]
    pub page_completion: BTreeMap<PageId, bool>,
}

impl SnapshotModel {
    /// Empty snapshot for a freshly created case
    pub fn empty(identity: CaseIdentity) -> Self {
        Self::new(identity, CaseData::default())
    }

    pub fn new(identity: CaseIdentity, data: CaseData) -> Self {
        Self { format_version: SNAPSHOT_FORMAT_VERSION, identity, data }
    }
}

impl CaseData {
    /// Drop entries whose id was already seen; the first occurrence wins
    pub fn dedupe_ids(&mut self) {
        dedupe_by(&mut self.observations, |o| o.id.clone());
        dedupe_by(&mut self.themes, |t| t.id.clone());
        dedupe_by(&mut self.focus_points, |f| f.id.clone());
        dedupe_by(&mut self.markers, |m| m.id.clone());
    }

    pub fn is_page_complete(&self, page: PageId) -> bool {
        self.page_completion.get(&page).copied().unwrap_or(false)
    }

    /// True once every assessment page has been marked complete
    pub fn can_finish(&self) -> bool {
        PageId::ALL.iter().all(|page| self.is_page_complete(*page))
    }

    pub fn relevant_theme_count(&self) -> usize {
        self.themes.iter().filter(|t| t.relevant).count()
    }
}

fn dedupe_by<T>(items: &mut Vec<T>, key: impl Fn(&T) -> String) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(key(item)));
}
