use serde::{Deserialize, Serialize};

/// JSON has no NaN or infinity, so coordinates are kept finite before they are stored
fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

/// A 3D annotation point placed in the reconstructed scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_coordinate")]
    pub x: f32,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_coordinate")]
    pub y: f32,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_coordinate")]
    pub z: f32,
}

impl Marker {
    /// Replace NaN and infinite coordinates with zero
    pub fn sanitized(self) -> Self {
        Self {
            x: finite_or_zero(self.x),
            y: finite_or_zero(self.y),
            z: finite_or_zero(self.z),
            ..self
        }
    }
}

/// Orientation correction applied to the reconstructed room model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomOrientation {
    pub id: String,
    pub description: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_coordinate")]
    pub rotation_offset_x: f32,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_coordinate")]
    pub rotation_offset_y: f32,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_coordinate")]
    pub rotation_offset_z: f32,
}

impl RoomOrientation {
    /// Replace NaN and infinite rotation offsets with zero
    pub fn sanitized(self) -> Self {
        Self {
            rotation_offset_x: finite_or_zero(self.rotation_offset_x),
            rotation_offset_y: finite_or_zero(self.rotation_offset_y),
            rotation_offset_z: finite_or_zero(self.rotation_offset_z),
            ..self
        }
    }
}
