//! Workout snapshot codec.
//!
//! # Responsibility
//! - Encode the whole workout collection as one JSON text snapshot.
//! - Rebuild typed workout records from a snapshot.
//!
//! # Invariants
//! - Snapshots are full copies in creation order, never diffs.
//! - Decoding dispatches on the discipline tag first and rebuilds every
//!   record through `WorkoutRecord::restore`; stored derived values are
//!   written for readability only and never read back.
//! - `deserialize` fails open: missing or unreadable snapshots yield an
//!   empty collection.
//!
//! # Format
//! ```json
//! {"version":1,"workouts":[{"type":"running","id":"..","created_at":0,
//!   "coords":[50.0,30.0],"distance":5.0,"duration":25.0,"cadence":170.0,
//!   "pace":5.0,"description":"Running on January 1"}]}
//! ```
//! A bare JSON array of entries is accepted as an unversioned snapshot.

use crate::model::workout::{
    Discipline, Position, WorkoutFields, WorkoutId, WorkoutRecord, WorkoutValidationError,
};
use crate::store::workout_store::WorkoutStore;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

pub type CodecResult<T> = Result<T, CodecError>;

/// Snapshot-level decode/encode failure.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    UnsupportedVersion { found: u32, supported: u32 },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed workout snapshot: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "workout snapshot version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Serialize)]
struct SnapshotOut {
    version: u32,
    workouts: Vec<StoredWorkout>,
}

#[derive(Debug, Deserialize)]
struct SnapshotIn {
    version: u32,
    workouts: Vec<Value>,
}

/// One flat workout entry.
#[derive(Debug, Serialize, Deserialize)]
struct StoredWorkout {
    #[serde(rename = "type")]
    discipline: Discipline,
    id: String,
    created_at: i64,
    coords: [f64; 2],
    distance: f64,
    duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl StoredWorkout {
    fn from_record(record: &WorkoutRecord) -> Self {
        let position = record.position();
        Self {
            discipline: record.discipline(),
            id: record.id().to_string(),
            created_at: record.created_at_ms(),
            coords: [position.latitude, position.longitude],
            distance: record.distance_km(),
            duration: record.duration_min(),
            cadence: record.cadence(),
            elevation_gain: record.elevation_gain_m(),
            pace: record.pace_min_per_km(),
            speed: record.speed_km_per_h(),
            description: Some(record.description().to_string()),
        }
    }

    fn into_record(self) -> Result<WorkoutRecord, EntryError> {
        let id = WorkoutId::parse(&self.id).ok_or(EntryError::BlankId)?;
        let input = match self.discipline {
            Discipline::Running => self.cadence.ok_or(EntryError::MissingInput("cadence"))?,
            Discipline::Cycling => self
                .elevation_gain
                .ok_or(EntryError::MissingInput("elevation_gain"))?,
        };
        let [latitude, longitude] = self.coords;

        WorkoutRecord::restore(
            id,
            self.created_at,
            self.discipline,
            Position::new(latitude, longitude),
            WorkoutFields::new(self.distance, self.duration, input),
        )
        .map_err(EntryError::Validation)
    }
}

#[derive(Debug)]
enum EntryError {
    Malformed(serde_json::Error),
    BlankId,
    MissingInput(&'static str),
    Validation(WorkoutValidationError),
    DuplicateId(WorkoutId),
}

impl Display for EntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "{err}"),
            Self::BlankId => write!(f, "blank id"),
            Self::MissingInput(field) => write!(f, "missing `{field}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "duplicate id {id}"),
        }
    }
}

/// Encodes the store in creation order.
pub fn serialize(store: &WorkoutStore) -> CodecResult<String> {
    encode_records(store.records())
}

/// Encodes records in the given order.
pub fn encode_records(records: &[WorkoutRecord]) -> CodecResult<String> {
    let snapshot = SnapshotOut {
        version: SNAPSHOT_VERSION,
        workouts: records.iter().map(StoredWorkout::from_record).collect(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Strictly decodes a snapshot document.
///
/// Invalid entries are skipped with a warning, and so are later entries
/// repeating an earlier id.
///
/// # Errors
/// - `Json` when the text is not a snapshot document.
/// - `UnsupportedVersion` when the snapshot was written by a newer format.
pub fn decode_snapshot(text: &str) -> CodecResult<Vec<WorkoutRecord>> {
    let entries = match serde_json::from_str::<Value>(text)? {
        Value::Array(entries) => entries,
        document => {
            let snapshot: SnapshotIn = serde_json::from_value(document)?;
            if snapshot.version > SNAPSHOT_VERSION {
                return Err(CodecError::UnsupportedVersion {
                    found: snapshot.version,
                    supported: SNAPSHOT_VERSION,
                });
            }
            snapshot.workouts
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match decode_entry(entry, &seen) {
            Ok(record) => {
                seen.insert(record.id().clone());
                records.push(record);
            }
            Err(err) => warn!(
                "event=snapshot_decode module=persist status=skipped index={} reason={}",
                index, err
            ),
        }
    }
    Ok(records)
}

fn decode_entry(entry: &Value, seen: &HashSet<WorkoutId>) -> Result<WorkoutRecord, EntryError> {
    let stored = StoredWorkout::deserialize(entry).map_err(EntryError::Malformed)?;
    let record = stored.into_record()?;
    if seen.contains(record.id()) {
        return Err(EntryError::DuplicateId(record.id().clone()));
    }
    Ok(record)
}

/// Fail-open snapshot load.
///
/// Returns an empty collection when the slot is absent or unreadable.
pub fn deserialize(text: Option<&str>) -> Vec<WorkoutRecord> {
    let Some(text) = text else {
        debug!("event=snapshot_decode module=persist status=empty reason=absent");
        return Vec::new();
    };

    match decode_snapshot(text) {
        Ok(records) => {
            debug!(
                "event=snapshot_decode module=persist status=ok count={}",
                records.len()
            );
            records
        }
        Err(err) => {
            warn!(
                "event=snapshot_decode module=persist status=error fallback=empty error={}",
                err
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, CodecError, SNAPSHOT_VERSION};

    #[test]
    fn newer_snapshot_version_is_rejected() {
        let text = format!(r#"{{"version":{},"workouts":[]}}"#, SNAPSHOT_VERSION + 1);
        let err = decode_snapshot(&text).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedVersion { found, .. } if found == 2));
    }

    #[test]
    fn non_document_json_is_malformed() {
        assert!(matches!(
            decode_snapshot("42").unwrap_err(),
            CodecError::Json(_)
        ));
    }
}
