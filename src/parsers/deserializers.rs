use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

use crate::models::PageId;

/// Either timestamp encoding found in stored files
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    /// Epoch milliseconds, as written by earlier app builds
    Millis(i64),
    Rfc3339(String),
}

/// Accepts epoch milliseconds or an RFC 3339 string
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match StoredTimestamp::deserialize(deserializer)
        .map_err(|_| D::Error::custom("timestamp must be epoch milliseconds or RFC 3339"))?
    {
        StoredTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| Error::custom(format!("timestamp {} out of range", ms))),
        StoredTimestamp::Rfc3339(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::custom(format!("invalid RFC 3339 timestamp {:?}: {}", text, e))),
    }
}

/// Rejects blank case numbers and names
pub fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;

    if s.trim().is_empty() {
        return Err(Error::custom("case identity fields cannot be empty"));
    }

    Ok(s)
}

/// Scene coordinate that reads `null` as zero
///
/// `serde_json` writes NaN and infinity as `null`, so files saved before coordinates were
/// sanitized can still contain it.
pub fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f32>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Page completion map that skips page names this build does not know about
pub fn deserialize_page_completion<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<PageId, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, done)| name.parse::<PageId>().ok().map(|page| (page, done)))
        .collect())
}
