use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one investigation. Immutable once the case exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseIdentity {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_non_empty")]
    pub case_number: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_non_empty")]
    pub case_name: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("case number cannot be empty")]
    EmptyCaseNumber,
    #[error("case name cannot be empty")]
    EmptyCaseName,
}

impl CaseIdentity {
    /// Create a new identity stamped with the current time
    pub fn new(
        case_number: impl Into<String>,
        case_name: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        Self::with_created_at(case_number, case_name, Utc::now())
    }

    pub fn with_created_at(
        case_number: impl Into<String>,
        case_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, IdentityError> {
        let case_number = case_number.into();
        let case_name = case_name.into();

        if case_number.trim().is_empty() {
            return Err(IdentityError::EmptyCaseNumber);
        }
        if case_name.trim().is_empty() {
            return Err(IdentityError::EmptyCaseName);
        }

        Ok(Self { case_number, case_name, created_at })
    }

    /// Stable case-wide key: `<caseNumber>_<caseName>`
    pub fn case_id(&self) -> String {
        format!("{}_{}", self.case_number, self.case_name)
    }

    /// Two identities refer to the same case when number and name match,
    /// regardless of creation time.
    pub fn same_case(&self, other: &CaseIdentity) -> bool {
        self.case_number == other.case_number && self.case_name == other.case_name
    }
}

impl fmt::Display for CaseIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.case_name, self.case_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_id_joins_number_and_name() {
        let identity = CaseIdentity::new("2024-001", "Kitchen Fire").unwrap();
        assert_eq!(identity.case_id(), "2024-001_Kitchen Fire");
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        assert_eq!(CaseIdentity::new("", "name"), Err(IdentityError::EmptyCaseNumber));
        assert_eq!(CaseIdentity::new("1", "   "), Err(IdentityError::EmptyCaseName));
    }

    #[test]
    fn test_same_case_ignores_created_at() {
        let a = CaseIdentity::with_created_at("1", "a", DateTime::UNIX_EPOCH).unwrap();
        let b = CaseIdentity::new("1", "a").unwrap();
        assert!(a.same_case(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let identity = CaseIdentity::new("2024-001", "Kitchen Fire").unwrap();
        assert_eq!(identity.to_string(), "Kitchen Fire (2024-001)");
    }
}
