//! Observation and session file readers
//!
//! Observations come as a JSON array or as CSV with the columns
//! `recorded_at,mood_score,energy_level,stress_level,anxiety_level,emotions,triggers,activities,notes,user_id`.
//! List columns are `;`-separated and empty cells mean "absent".
//!
//! Rows that parse but fail validation are skipped with a warning; a file
//! that cannot be parsed at all is an error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Emotion, NewObservation, Observation};
use crate::sessions::{SessionRecord, SessionStatus, RATING_RANGE};

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(Error::Import(format!(
                "Unsupported file type: {} (expected .json or .csv)",
                path.display()
            ))),
        }
    }
}

/// Records read from a file plus how many rows were dropped
#[derive(Debug, Clone, PartialEq)]
pub struct Imported<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Imported<T> {
    fn from_rows(rows: impl Iterator<Item = std::result::Result<T, String>>) -> Self {
        rows.enumerate().fold(
            Self {
                records: Vec::new(),
                skipped: 0,
            },
            |mut acc, (i, row)| {
                match row {
                    Ok(record) => acc.records.push(record),
                    Err(reason) => {
                        warn!(row = i + 1, %reason, "Skipping invalid row");
                        acc.skipped += 1;
                    }
                }
                acc
            },
        )
    }
}

/// Read observations from a `.json` or `.csv` file
pub fn read_observations(path: &Path) -> Result<Imported<Observation>> {
    let format = ImportFormat::from_path(path)?;
    let file = File::open(path)?;
    let imported = match format {
        ImportFormat::Json => parse_observations_json(file)?,
        ImportFormat::Csv => parse_observations_csv(file)?,
    };
    debug!(
        path = %path.display(),
        observations = imported.records.len(),
        skipped = imported.skipped,
        "Read observations"
    );
    Ok(imported)
}

/// Parse a JSON array of observations
pub fn parse_observations_json<R: Read>(reader: R) -> Result<Imported<Observation>> {
    let rows: Vec<Observation> = serde_json::from_reader(reader)?;
    Ok(Imported::from_rows(rows.into_iter().map(|obs| {
        obs.validate().map_err(|e| e.to_string())?;
        Ok(obs)
    })))
}

#[derive(Debug, Deserialize)]
struct ObservationRow {
    recorded_at: String,
    mood_score: u8,
    energy_level: u8,
    stress_level: u8,
    #[serde(default)]
    anxiety_level: Option<u8>,
    #[serde(default)]
    emotions: Option<String>,
    #[serde(default)]
    triggers: Option<String>,
    #[serde(default)]
    activities: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    user_id: Option<i64>,
}

impl ObservationRow {
    fn into_observation(self) -> std::result::Result<Observation, String> {
        let recorded_at = parse_timestamp(&self.recorded_at).map_err(|e| e.to_string())?;
        let emotions = split_list(self.emotions.as_deref())
            .into_iter()
            .map(|e| e.parse::<Emotion>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let input = NewObservation {
            mood_score: self.mood_score,
            energy_level: self.energy_level,
            stress_level: self.stress_level,
            anxiety_level: self.anxiety_level,
            emotions,
            notes: self.notes,
            triggers: split_list(self.triggers.as_deref()),
            activities: split_list(self.activities.as_deref()),
        };
        let obs = Observation::new(input, recorded_at).map_err(|e| e.to_string())?;
        Ok(match self.user_id {
            Some(user_id) => obs.with_user(user_id),
            None => obs,
        })
    }
}

/// Parse observation CSV
pub fn parse_observations_csv<R: Read>(reader: R) -> Result<Imported<Observation>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let rows = rdr
        .deserialize::<ObservationRow>()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| Error::Import(format!("Row {}: {}", i + 1, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Imported::from_rows(
        rows.into_iter().map(ObservationRow::into_observation),
    ))
}

/// Read a JSON array of session records
pub fn read_sessions(path: &Path) -> Result<Imported<SessionRecord>> {
    let imported = parse_sessions_json(File::open(path)?)?;
    debug!(
        path = %path.display(),
        sessions = imported.records.len(),
        skipped = imported.skipped,
        "Read sessions"
    );
    Ok(imported)
}

pub fn parse_sessions_json<R: Read>(reader: R) -> Result<Imported<SessionRecord>> {
    let rows: Vec<SessionRecord> = serde_json::from_reader(reader)?;
    Ok(Imported::from_rows(rows.into_iter().map(check_session)))
}

fn check_session(record: SessionRecord) -> std::result::Result<SessionRecord, String> {
    if !record.duration.is_finite() || record.duration <= 0.0 {
        return Err(format!("duration must be positive, got {}", record.duration));
    }
    if let Some(rating) = record.rating {
        if !RATING_RANGE.contains(&rating) {
            return Err(format!("rating out of range: {}", rating));
        }
    }
    if record.status == SessionStatus::Active && record.ended_at.is_some() {
        return Err("active session has an end time".to_string());
    }
    Ok(record)
}

/// Split a `;`-separated cell, dropping blanks
fn split_list(cell: Option<&str>) -> Vec<String> {
    cell.map(|s| {
        s.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse an RFC 3339 timestamp, a naive UTC date-time, or a bare date (midnight UTC)
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S", // 2024-03-01 09:30:00
        "%Y-%m-%dT%H:%M:%S", // 2024-03-01T09:30:00
        "%Y-%m-%d %H:%M",    // 2024-03-01 09:30
    ];
    for fmt in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(Error::Import(format!("Unable to parse timestamp: {}", s)))
}
