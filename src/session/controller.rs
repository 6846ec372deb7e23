use std::sync::mpsc::{self, Receiver, Sender};

use chrono::Utc;
use tracing::{debug, error, info};

use super::events::{AutosaveStatus, SessionEvent};
use crate::models::{
    ActionItem, ActionList, CaseData, CaseIdentity, CrimeType, FocusPoint, Marker, Observation,
    PageId, RoomOrientation, SnapshotModel, Theme,
};
use crate::store::SnapshotStore;

/// The two free-text note lists on the info page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSection {
    /// Gathered before arriving on site
    Preliminary,
    OnSite,
}

/// Holds the open case and its live data, saving after every edit.
///
/// Construct one per process and hand it to the UI layer by reference. Edits made while
/// no case is open stay in memory only.
pub struct SessionController {
    store: SnapshotStore,
    active_case: Option<CaseIdentity>,
    data: CaseData,
    revision: u64,
    autosave_status: AutosaveStatus,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl SessionController {
    pub fn new(store: SnapshotStore) -> Self {
        Self {
            store,
            active_case: None,
            data: CaseData::default(),
            revision: 0,
            autosave_status: AutosaveStatus::Idle,
            subscribers: Vec::new(),
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn active_case(&self) -> Option<&CaseIdentity> {
        self.active_case.as_ref()
    }

    /// Read-only view of the live data
    pub fn data(&self) -> &CaseData {
        &self.data
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn autosave_status(&self) -> &AutosaveStatus {
        &self.autosave_status
    }

    /// Receive an event for every open, close, edit and failed autosave from now on
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Make `identity` the active case and replace all live data with its saved snapshot,
    /// or with empty defaults if it has none
    pub fn open_case(&mut self, identity: CaseIdentity) {
        self.data = match self.store.load_snapshot(&identity) {
            Some(snapshot) => snapshot.data,
            None => CaseData::default(),
        };
        self.autosave_status = AutosaveStatus::Idle;
        self.revision += 1;

        info!(case_id = %identity.case_id(), "opened case");
        self.active_case = Some(identity.clone());
        self.notify(SessionEvent::CaseOpened(identity));
    }

    /// Detach from the active case without further I/O
    pub fn close_case(&mut self) {
        if let Some(identity) = self.active_case.take() {
            info!(case_id = %identity.case_id(), "closed case");
            self.notify(SessionEvent::CaseClosed);
        }
    }

    /// Snapshot of the live data for the active case, used by export
    pub fn current_snapshot(&self) -> Option<SnapshotModel> {
        self.active_case
            .as_ref()
            .map(|identity| SnapshotModel::new(identity.clone(), self.data.clone()))
    }

    /// Persist the live data for the active case. No-op without one.
    ///
    /// Failures are logged and recorded in [`autosave_status`](Self::autosave_status),
    /// never returned.
    pub fn auto_save(&mut self) {
        let Some(snapshot) = self.current_snapshot() else {
            return;
        };

        match self.store.save_snapshot(&snapshot) {
            Ok(()) => {
                debug!(revision = self.revision, "autosaved");
                self.autosave_status = AutosaveStatus::Saved { at: Utc::now() };
            }
            Err(e) => {
                error!(case_id = %snapshot.identity.case_id(), "Autosave failed: {}", e);
                let message = e.to_string();
                self.autosave_status =
                    AutosaveStatus::Failed { message: message.clone(), at: Utc::now() };
                self.notify(SessionEvent::AutosaveFailed { message });
            }
        }
    }

    // ===== Info notes =====

    pub fn add_note(&mut self, section: NoteSection, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.edit(|data| notes_mut(data, section).push(text.to_string()));
        true
    }

    pub fn update_note(&mut self, section: NoteSection, index: usize, text: &str) -> bool {
        self.edit(|data| match notes_mut(data, section).get_mut(index) {
            Some(note) => {
                *note = text.to_string();
                true
            }
            None => false,
        })
    }

    pub fn remove_note(&mut self, section: NoteSection, index: usize) -> bool {
        self.edit(|data| {
            let notes = notes_mut(data, section);
            if index < notes.len() {
                notes.remove(index);
                true
            } else {
                false
            }
        })
    }

    // ===== Observations =====

    /// Record a new observation and return its id
    pub fn add_observation(&mut self, description: &str, location: &str, notes: &str) -> String {
        let observation = Observation::new(description, location, notes);
        let id = observation.id.clone();
        self.edit(|data| data.observations.push(observation));
        id
    }

    /// Replace the observation with the same id
    pub fn update_observation(&mut self, observation: Observation) -> bool {
        self.edit(|data| match data.observations.iter_mut().find(|o| o.id == observation.id) {
            Some(existing) => {
                *existing = observation;
                true
            }
            None => false,
        })
    }

    pub fn remove_observation(&mut self, id: &str) -> bool {
        self.edit(|data| remove_by(&mut data.observations, |o| o.id == id))
    }

    pub fn toggle_bookmark(&mut self, id: &str) -> bool {
        self.edit(|data| match data.observations.iter_mut().find(|o| o.id == id) {
            Some(observation) => {
                observation.bookmarked = !observation.bookmarked;
                true
            }
            None => false,
        })
    }

    // ===== Themes =====

    /// Add a theme; refused if a theme with the same id already exists
    pub fn add_theme(&mut self, theme: Theme) -> bool {
        if self.data.themes.iter().any(|t| t.id == theme.id) {
            return false;
        }
        self.edit(|data| data.themes.push(theme));
        true
    }

    /// Add the preset themes for a crime type, skipping names already present.
    /// Returns the ids of the themes added.
    pub fn add_preset_themes(&mut self, crime_type: CrimeType) -> Vec<String> {
        self.edit(|data| {
            let mut added = Vec::new();
            for theme in crime_type.themes() {
                if data.themes.iter().any(|t| t.name == theme.name) {
                    continue;
                }
                added.push(theme.id.clone());
                data.themes.push(theme);
            }
            added
        })
    }

    pub fn update_theme(&mut self, theme: Theme) -> bool {
        self.edit(|data| match data.themes.iter_mut().find(|t| t.id == theme.id) {
            Some(existing) => {
                *existing = theme;
                true
            }
            None => false,
        })
    }

    pub fn remove_theme(&mut self, id: &str) -> bool {
        self.edit(|data| remove_by(&mut data.themes, |t| t.id == id))
    }

    pub fn relevant_theme_count(&self) -> usize {
        self.data.relevant_theme_count()
    }

    // ===== Focus points =====

    /// Create a focus point for a theme and return its id
    pub fn add_focus_point(
        &mut self,
        title: &str,
        theme_ref: &str,
        bullet_points: Vec<String>,
    ) -> String {
        let point = FocusPoint::new(title, theme_ref, bullet_points);
        let id = point.id.clone();
        self.edit(|data| data.focus_points.push(point));
        id
    }

    pub fn update_focus_point(&mut self, point: FocusPoint) -> bool {
        self.edit(|data| match data.focus_points.iter_mut().find(|f| f.id == point.id) {
            Some(existing) => {
                *existing = point;
                true
            }
            None => false,
        })
    }

    pub fn remove_focus_point(&mut self, id: &str) -> bool {
        self.edit(|data| remove_by(&mut data.focus_points, |f| f.id == id))
    }

    pub fn add_scene(&mut self, focus_point_id: &str, scene: &str) -> bool {
        self.edit_focus_point(focus_point_id, |point| point.add_scene(scene))
    }

    pub fn rename_scene(&mut self, focus_point_id: &str, old: &str, new: &str) -> bool {
        self.edit_focus_point(focus_point_id, |point| point.rename_scene(old, new))
    }

    pub fn remove_scene(&mut self, focus_point_id: &str, scene: &str) -> bool {
        self.edit_focus_point(focus_point_id, |point| point.remove_scene(scene))
    }

    pub fn set_scene_probability(
        &mut self,
        focus_point_id: &str,
        scene: &str,
        percent: u32,
    ) -> bool {
        self.edit_focus_point(focus_point_id, |point| point.set_scene_probability(scene, percent))
    }

    /// Spread 100% evenly over the focus point's relevant scenes
    pub fn distribute_scene_probabilities(&mut self, focus_point_id: &str) -> bool {
        self.edit_focus_point(focus_point_id, |point| {
            point.distribute_evenly();
            true
        })
    }

    pub fn add_expected_trace(&mut self, focus_point_id: &str, scene: &str, trace: &str) -> bool {
        self.edit_focus_point(focus_point_id, |point| point.add_expected_trace(scene, trace))
    }

    pub fn remove_expected_trace(
        &mut self,
        focus_point_id: &str,
        scene: &str,
        index: usize,
    ) -> bool {
        self.edit_focus_point(focus_point_id, |point| point.remove_expected_trace(scene, index))
    }

    pub fn add_primary_action(&mut self, focus_point_id: &str, item: ActionItem) -> bool {
        self.add_action(focus_point_id, ActionList::Primary, item)
    }

    pub fn add_other_action(&mut self, focus_point_id: &str, item: ActionItem) -> bool {
        self.add_action(focus_point_id, ActionList::Other, item)
    }

    /// Replace the action with the same id within a focus point
    pub fn update_action(&mut self, focus_point_id: &str, item: ActionItem) -> bool {
        self.edit_focus_point(focus_point_id, |point| point.replace_action(item))
    }

    pub fn remove_action(&mut self, focus_point_id: &str, action_id: &str) -> bool {
        self.edit_focus_point(focus_point_id, |point| point.remove_action(action_id))
    }

    fn add_action(&mut self, focus_point_id: &str, list: ActionList, item: ActionItem) -> bool {
        self.edit_focus_point(focus_point_id, |point| {
            point.push_action(list, item);
            true
        })
    }

    // ===== Markers and room model =====

    pub fn add_marker(&mut self, marker: Marker) -> bool {
        if self.data.markers.iter().any(|m| m.id == marker.id) {
            return false;
        }
        self.edit(|data| data.markers.push(marker.sanitized()));
        true
    }

    pub fn remove_marker(&mut self, id: &str) -> bool {
        self.edit(|data| remove_by(&mut data.markers, |m| m.id == id))
    }

    /// Replace all markers, e.g. after the reconstruction engine re-emits them
    pub fn replace_markers(&mut self, markers: Vec<Marker>) {
        self.edit(|data| {
            data.markers = markers.into_iter().map(Marker::sanitized).collect();
            data.dedupe_ids();
        });
    }

    pub fn set_room_model(&mut self, room_model: Option<RoomOrientation>) {
        self.edit(|data| data.room_model = room_model.map(RoomOrientation::sanitized));
    }

    /// Update the rotation offsets, creating a room model if there is none yet
    pub fn set_room_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.edit(|data| {
            let room = data.room_model.take().unwrap_or_default();
            let rotated = RoomOrientation {
                rotation_offset_x: x,
                rotation_offset_y: y,
                rotation_offset_z: z,
                ..room
            };
            data.room_model = Some(rotated.sanitized());
        });
    }

    // ===== Freeform data and page completion =====

    pub fn set_freeform(&mut self, key: &str, value: &str) {
        self.edit(|data| {
            data.freeform_data.insert(key.to_string(), value.to_string());
        });
    }

    pub fn remove_freeform(&mut self, key: &str) -> bool {
        self.edit(|data| data.freeform_data.remove(key).is_some())
    }

    pub fn set_page_complete(&mut self, page: PageId, complete: bool) {
        self.edit(|data| {
            data.page_completion.insert(page, complete);
        });
    }

    pub fn is_page_complete(&self, page: PageId) -> bool {
        self.data.is_page_complete(page)
    }

    pub fn can_finish(&self) -> bool {
        self.data.can_finish()
    }

    // ===== Internals =====

    /// Apply one edit to the live data, notify subscribers, then autosave
    fn edit<R>(&mut self, apply: impl FnOnce(&mut CaseData) -> R) -> R {
        let result = apply(&mut self.data);
        self.revision += 1;
        self.notify(SessionEvent::Changed { revision: self.revision });
        self.auto_save();
        result
    }

    fn edit_focus_point(
        &mut self,
        focus_point_id: &str,
        apply: impl FnOnce(&mut FocusPoint) -> bool,
    ) -> bool {
        self.edit(|data| {
            data.focus_points
                .iter_mut()
                .find(|point| point.id == focus_point_id)
                .map(apply)
                .unwrap_or(false)
        })
    }

    fn notify(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

fn notes_mut(data: &mut CaseData, section: NoteSection) -> &mut Vec<String> {
    match section {
        NoteSection::Preliminary => &mut data.preliminary_notes,
        NoteSection::OnSite => &mut data.on_site_notes,
    }
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}
