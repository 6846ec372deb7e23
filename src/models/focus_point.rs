use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::new_id;

/// Colours assigned to scenes in the order they are added
const SCENE_PALETTE: [&str; 6] = ["#E57373", "#FFB74D", "#FFF176", "#81C784", "#64B5F6", "#BA68C8"];

fn default_scene_color() -> String {
    "#6496C8".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Secure,
    Sample,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleKind {
    Epithelial,
    Saliva,
    Blood,
    Semen,
    Other,
}

/// Which action list of a focus point an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionList {
    Primary,
    Other,
}

/// A planned forensic action.
///
/// `sample_kind` only exists for [`ActionKind::Sample`] and `other_description` only for
/// [`ActionKind::Other`] or [`SampleKind::Other`]. Constructors and decoding both enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ActionItemRecord")]
pub struct ActionItem {
    pub id: String,
    pub description_and_location: String,
    action_kind: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_kind: Option<SampleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    other_description: Option<String>,
}

/// Wire shape of an action item before normalisation
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionItemRecord {
    id: String,
    #[serde(default)]
    description_and_location: String,
    action_kind: ActionKind,
    #[serde(default)]
    sample_kind: Option<SampleKind>,
    #[serde(default)]
    other_description: Option<String>,
}

impl From<ActionItemRecord> for ActionItem {
    fn from(record: ActionItemRecord) -> Self {
        let mut item = ActionItem::from_parts(
            record.description_and_location,
            record.action_kind,
            record.sample_kind,
            record.other_description,
        );
        item.id = record.id;
        item
    }
}

impl ActionItem {
    pub fn secure(description_and_location: impl Into<String>) -> Self {
        Self::from_parts(description_and_location.into(), ActionKind::Secure, None, None)
    }

    pub fn sample(
        description_and_location: impl Into<String>,
        sample_kind: SampleKind,
        other_description: Option<String>,
    ) -> Self {
        Self::from_parts(
            description_and_location.into(),
            ActionKind::Sample,
            Some(sample_kind),
            other_description,
        )
    }

    pub fn other(
        description_and_location: impl Into<String>,
        other_description: impl Into<String>,
    ) -> Self {
        Self::from_parts(
            description_and_location.into(),
            ActionKind::Other,
            None,
            Some(other_description.into()),
        )
    }

    /// Build an item from loose parts, dropping sub-fields the kind does not allow.
    /// A sample may leave its sample kind unset.
    pub fn from_parts(
        description_and_location: String,
        action_kind: ActionKind,
        sample_kind: Option<SampleKind>,
        other_description: Option<String>,
    ) -> Self {
        let sample_kind = sample_kind.filter(|_| action_kind == ActionKind::Sample);
        let allows_other =
            action_kind == ActionKind::Other || sample_kind == Some(SampleKind::Other);
        let other_description = other_description.filter(|_| allows_other);

        Self {
            id: new_id(),
            description_and_location,
            action_kind,
            sample_kind,
            other_description,
        }
    }

    /// Keep an existing id, used when an edited copy replaces the original
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn action_kind(&self) -> ActionKind {
        self.action_kind
    }

    pub fn sample_kind(&self) -> Option<SampleKind> {
        self.sample_kind
    }

    pub fn other_description(&self) -> Option<&str> {
        self.other_description.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneProbability {
    pub scene: String,
    #[serde(default)]
    pub percent: u32,
    #[serde(default = "default_scene_color")]
    pub color_hex: String,
}

/// An area of investigative attention tied to one theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusPoint {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub theme_ref: String,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub relevant_scenes: Vec<String>,
    #[serde(default)]
    pub scene_probabilities: Vec<SceneProbability>,
    #[serde(default)]
    pub expected_traces: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub primary_actions: Vec<ActionItem>,
    #[serde(default)]
    pub other_actions: Vec<ActionItem>,
}

impl FocusPoint {
    pub fn new(
        title: impl Into<String>,
        theme_ref: impl Into<String>,
        bullet_points: Vec<String>,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            theme_ref: theme_ref.into(),
            bullet_points,
            relevant_scenes: Vec::new(),
            scene_probabilities: Vec::new(),
            expected_traces: BTreeMap::new(),
            primary_actions: Vec::new(),
            other_actions: Vec::new(),
        }
    }

    /// Add a relevant scene with a 0% probability and no expected traces.
    /// Returns false for blank or duplicate scene names.
    pub fn add_scene(&mut self, scene: &str) -> bool {
        let scene = scene.trim();
        if scene.is_empty() || self.relevant_scenes.iter().any(|s| s == scene) {
            return false;
        }

        let color = SCENE_PALETTE[self.scene_probabilities.len() % SCENE_PALETTE.len()];
        self.relevant_scenes.push(scene.to_string());
        self.scene_probabilities.push(SceneProbability {
            scene: scene.to_string(),
            percent: 0,
            color_hex: color.to_string(),
        });
        self.expected_traces.insert(scene.to_string(), Vec::new());
        true
    }

    pub fn remove_scene(&mut self, scene: &str) -> bool {
        let before = self.relevant_scenes.len();
        self.relevant_scenes.retain(|s| s != scene);
        self.scene_probabilities.retain(|p| p.scene != scene);
        self.expected_traces.remove(scene);
        self.relevant_scenes.len() != before
    }

    /// Rename a scene everywhere it is referenced
    pub fn rename_scene(&mut self, old: &str, new: &str) -> bool {
        let new = new.trim();
        if new.is_empty() || (new != old && self.relevant_scenes.iter().any(|s| s == new)) {
            return false;
        }
        let Some(slot) = self.relevant_scenes.iter_mut().find(|s| s.as_str() == old) else {
            return false;
        };
        *slot = new.to_string();

        if let Some(probability) = self.scene_probabilities.iter_mut().find(|p| p.scene == old) {
            probability.scene = new.to_string();
        }
        if let Some(traces) = self.expected_traces.remove(old) {
            self.expected_traces.insert(new.to_string(), traces);
        }
        true
    }

    /// Set one scene's percentage (clamped to 100). Totals are not enforced here.
    pub fn set_scene_probability(&mut self, scene: &str, percent: u32) -> bool {
        match self.scene_probabilities.iter_mut().find(|p| p.scene == scene) {
            Some(probability) => {
                probability.percent = percent.min(100);
                true
            }
            None => false,
        }
    }

    /// Spread 100% over the relevant scenes; the last scene takes the remainder
    pub fn distribute_evenly(&mut self) {
        self.sync_probabilities();

        let count = self.scene_probabilities.len() as u32;
        if count == 0 {
            return;
        }

        let share = 100 / count;
        for probability in &mut self.scene_probabilities {
            probability.percent = share;
        }
        if let Some(last) = self.scene_probabilities.last_mut() {
            last.percent += 100 - share * count;
        }
    }

    pub fn probability_total(&self) -> u32 {
        self.scene_probabilities.iter().map(|p| p.percent).sum()
    }

    pub fn add_expected_trace(&mut self, scene: &str, trace: &str) -> bool {
        let trace = trace.trim();
        if trace.is_empty() || !self.relevant_scenes.iter().any(|s| s == scene) {
            return false;
        }
        self.expected_traces.entry(scene.to_string()).or_default().push(trace.to_string());
        true
    }

    pub fn remove_expected_trace(&mut self, scene: &str, index: usize) -> bool {
        match self.expected_traces.get_mut(scene) {
            Some(traces) if index < traces.len() => {
                traces.remove(index);
                true
            }
            _ => false,
        }
    }

    pub fn actions(&self, list: ActionList) -> &[ActionItem] {
        match list {
            ActionList::Primary => &self.primary_actions,
            ActionList::Other => &self.other_actions,
        }
    }

    pub fn push_action(&mut self, list: ActionList, item: ActionItem) {
        match list {
            ActionList::Primary => self.primary_actions.push(item),
            ActionList::Other => self.other_actions.push(item),
        }
    }

    /// Replace the action with the same id, in whichever list holds it
    pub fn replace_action(&mut self, item: ActionItem) -> bool {
        let slot = self
            .primary_actions
            .iter_mut()
            .chain(self.other_actions.iter_mut())
            .find(|existing| existing.id == item.id);
        match slot {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    pub fn remove_action(&mut self, action_id: &str) -> bool {
        let before = self.primary_actions.len() + self.other_actions.len();
        self.primary_actions.retain(|a| a.id != action_id);
        self.other_actions.retain(|a| a.id != action_id);
        before != self.primary_actions.len() + self.other_actions.len()
    }

    /// Make `scene_probabilities` mirror `relevant_scenes`, keeping existing entries
    fn sync_probabilities(&mut self) {
        let mut synced = Vec::with_capacity(self.relevant_scenes.len());
        for (idx, scene) in self.relevant_scenes.iter().enumerate() {
            let existing = self.scene_probabilities.iter().find(|p| &p.scene == scene).cloned();
            synced.push(existing.unwrap_or_else(|| SceneProbability {
                scene: scene.clone(),
                percent: 0,
                color_hex: SCENE_PALETTE[idx % SCENE_PALETTE.len()].to_string(),
            }));
        }
        self.scene_probabilities = synced;
    }
}
