use chrono::{DateTime, NaiveDate, NaiveDateTime};
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;

/// Date-time layouts the run list may carry, most specific first.
/// The server formats timestamps as `HH:MM:SS MM/DD/YYYY`.
const DATETIME_FORMATS: &[&str] = &[
    "%H:%M:%S %m/%d/%Y",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// One historical test execution as injected by the host page.
/// The server stores `config` and `workers` unchecked, so either may be null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestRunRecord {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub config: String,
    pub start: String,
    /// `None` (or empty) while the run is still going.
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub workers: Option<u64>,
    #[serde(default)]
    pub locustfile: Option<String>,
}

impl TestRunRecord {
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.start)
    }

    pub fn end_text(&self) -> &str {
        self.end.as_deref().unwrap_or("")
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn parse_records(json: &str) -> Result<Vec<TestRunRecord>> {
    let records: Vec<TestRunRecord> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id) {
            return Err(eyre!("Duplicate test run id {} in run list", record.id));
        }
    }
    Ok(records)
}

/// Parses a run timestamp. Returns `None` for empty or unrecognized input.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
