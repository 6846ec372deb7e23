use serde::{Deserialize, Serialize};

use super::new_id;

/// A main hypothesis (e.g. "Accident") and whether it is still considered relevant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub relevant: bool,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub possibilities: Vec<String>,
}

impl Theme {
    pub fn new(name: impl Into<String>, relevant: bool, rationale: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            relevant,
            rationale: rationale.into(),
            possibilities: Vec::new(),
        }
    }

    pub fn with_possibilities(mut self, possibilities: Vec<String>) -> Self {
        self.possibilities = possibilities;
        self
    }
}
