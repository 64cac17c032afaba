//! Workout domain model.
//!
//! # Responsibility
//! - Define the canonical workout record and its discipline payload.
//! - Validate base fields and keep derived metrics in sync with them.
//!
//! # Invariants
//! - `id` is stable and never reused for another workout.
//! - `distance_km > 0` and `duration_min > 0`; every numeric field is finite.
//! - Running cadence must be positive; cycling elevation gain may be any
//!   finite value (descents are negative).
//! - `derived` and `description` are recomputed on every field change and
//!   never accepted from callers.

use crate::model::metrics::{pace_min_per_km, speed_km_per_h, DerivedMetric};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque workout identifier used as the only external reference key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an externally supplied identifier.
    ///
    /// Returns `None` for blank input.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WorkoutId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Google Maps link centered on this position.
    pub fn map_url(&self) -> String {
        format!(
            "https://www.google.com/maps/@{},{},16z",
            self.latitude, self.longitude
        )
    }
}

/// Workout kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    Running,
    Cycling,
}

impl Discipline {
    /// Capitalized label used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    /// Glyph prefixed to map marker labels.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Running => "🏃",
            Self::Cycling => "🚴",
        }
    }
}

/// Discipline-specific input; exactly one variant matches the discipline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisciplineData {
    Running { cadence: f64 },
    Cycling { elevation_gain_m: f64 },
}

impl DisciplineData {
    fn new(discipline: Discipline, value: f64) -> Self {
        match discipline {
            Discipline::Running => Self::Running { cadence: value },
            Discipline::Cycling => Self::Cycling {
                elevation_gain_m: value,
            },
        }
    }

    pub fn discipline(&self) -> Discipline {
        match self {
            Self::Running { .. } => Discipline::Running,
            Self::Cycling { .. } => Discipline::Cycling,
        }
    }

    /// Cadence or elevation gain, depending on the variant.
    pub fn value(&self) -> f64 {
        match self {
            Self::Running { cadence } => *cadence,
            Self::Cycling { elevation_gain_m } => *elevation_gain_m,
        }
    }
}

/// Editable workout fields, already coerced to numbers.
///
/// `discipline_input` is cadence for running and elevation gain for cycling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutFields {
    pub distance_km: f64,
    pub duration_min: f64,
    pub discipline_input: f64,
}

impl WorkoutFields {
    pub fn new(distance_km: f64, duration_min: f64, discipline_input: f64) -> Self {
        Self {
            distance_km,
            duration_min,
            discipline_input,
        }
    }

    /// Checks these fields against the rules of `discipline`.
    ///
    /// # Errors
    /// - `NonFinite` when any value is NaN or infinite (checked first).
    /// - `NonPositive` when distance or duration is `<= 0`, or when running
    ///   cadence is `<= 0`. Cycling elevation gain is not sign-checked.
    pub fn validate(&self, discipline: Discipline) -> Result<(), WorkoutValidationError> {
        let input_field = input_field_name(discipline);
        for (field, value) in [
            ("distance_km", self.distance_km),
            ("duration_min", self.duration_min),
            (input_field, self.discipline_input),
        ] {
            if !value.is_finite() {
                return Err(WorkoutValidationError::NonFinite { field });
            }
        }

        if self.distance_km <= 0.0 {
            return Err(WorkoutValidationError::NonPositive {
                field: "distance_km",
            });
        }
        if self.duration_min <= 0.0 {
            return Err(WorkoutValidationError::NonPositive {
                field: "duration_min",
            });
        }
        if discipline == Discipline::Running && self.discipline_input <= 0.0 {
            return Err(WorkoutValidationError::NonPositive { field: input_field });
        }

        Ok(())
    }
}

fn input_field_name(discipline: Discipline) -> &'static str {
    match discipline {
        Discipline::Running => "cadence",
        Discipline::Cycling => "elevation_gain_m",
    }
}

/// Validation error for workout construction and edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutValidationError {
    /// A numeric input is NaN or infinite.
    NonFinite { field: &'static str },
    /// A numeric input that must be positive is zero or negative.
    NonPositive { field: &'static str },
}

impl Display for WorkoutValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "`{field}` must be a finite number"),
            Self::NonPositive { field } => write!(f, "`{field}` must be a positive number"),
        }
    }
}

impl Error for WorkoutValidationError {}

/// Canonical workout record.
///
/// Fields are private so derived state can only change through validated
/// operations that recompute it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    id: WorkoutId,
    created_at_ms: i64,
    position: Position,
    distance_km: f64,
    duration_min: f64,
    data: DisciplineData,
    derived: DerivedMetric,
    description: String,
    interaction_count: u32,
}

impl WorkoutRecord {
    /// Creates a workout stamped with the current time and a fresh id.
    pub fn create(
        discipline: Discipline,
        position: Position,
        fields: WorkoutFields,
    ) -> Result<Self, WorkoutValidationError> {
        Self::create_at(discipline, position, fields, Utc::now().timestamp_millis())
    }

    /// Creates a workout with a fresh id and a caller-provided timestamp.
    pub fn create_at(
        discipline: Discipline,
        position: Position,
        fields: WorkoutFields,
        created_at_ms: i64,
    ) -> Result<Self, WorkoutValidationError> {
        Self::restore(
            WorkoutId::generate(),
            created_at_ms,
            discipline,
            position,
            fields,
        )
    }

    /// Rebuilds a workout whose identity already exists (snapshot load).
    ///
    /// Runs the same validation as `create` and recomputes derived state.
    pub fn restore(
        id: WorkoutId,
        created_at_ms: i64,
        discipline: Discipline,
        position: Position,
        fields: WorkoutFields,
    ) -> Result<Self, WorkoutValidationError> {
        if !position.latitude.is_finite() {
            return Err(WorkoutValidationError::NonFinite { field: "latitude" });
        }
        if !position.longitude.is_finite() {
            return Err(WorkoutValidationError::NonFinite { field: "longitude" });
        }
        fields.validate(discipline)?;

        let data = DisciplineData::new(discipline, fields.discipline_input);
        let mut record = Self {
            id,
            created_at_ms,
            position,
            distance_km: fields.distance_km,
            duration_min: fields.duration_min,
            derived: compute_metric(&data, fields.distance_km, fields.duration_min),
            data,
            description: String::new(),
            interaction_count: 0,
        };
        record.recompute();
        Ok(record)
    }

    /// Recomputes the derived metric and description from base fields.
    ///
    /// Idempotent.
    pub fn recompute(&mut self) {
        self.derived = compute_metric(&self.data, self.distance_km, self.duration_min);
        self.description = describe(self.discipline(), self.created_at_ms);
    }

    /// Replaces the editable fields, keeping identity and interaction count.
    ///
    /// Leaves the record untouched when validation fails.
    pub(crate) fn replace_fields(
        &mut self,
        fields: WorkoutFields,
    ) -> Result<(), WorkoutValidationError> {
        fields.validate(self.discipline())?;
        self.distance_km = fields.distance_km;
        self.duration_min = fields.duration_min;
        self.data = DisciplineData::new(self.discipline(), fields.discipline_input);
        self.recompute();
        Ok(())
    }

    pub(crate) fn record_interaction(&mut self) -> u32 {
        self.interaction_count = self.interaction_count.saturating_add(1);
        self.interaction_count
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    /// Unix epoch milliseconds.
    pub fn created_at_ms(&self) -> i64 {
        self.created_at_ms
    }

    pub fn discipline(&self) -> Discipline {
        self.data.discipline()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn data(&self) -> DisciplineData {
        self.data
    }

    pub fn cadence(&self) -> Option<f64> {
        match self.data {
            DisciplineData::Running { cadence } => Some(cadence),
            DisciplineData::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain_m(&self) -> Option<f64> {
        match self.data {
            DisciplineData::Cycling { elevation_gain_m } => Some(elevation_gain_m),
            DisciplineData::Running { .. } => None,
        }
    }

    pub fn derived(&self) -> DerivedMetric {
        self.derived
    }

    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.derived {
            DerivedMetric::Pace(pace) => Some(pace),
            DerivedMetric::Speed(_) => None,
        }
    }

    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.derived {
            DerivedMetric::Speed(speed) => Some(speed),
            DerivedMetric::Pace(_) => None,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn interaction_count(&self) -> u32 {
        self.interaction_count
    }

    /// Current editable fields, used to pre-fill edit forms.
    pub fn fields(&self) -> WorkoutFields {
        WorkoutFields::new(self.distance_km, self.duration_min, self.data.value())
    }

    /// Map popup label: discipline glyph followed by the description.
    pub fn marker_label(&self) -> String {
        format!("{} {}", self.discipline().glyph(), self.description)
    }
}

fn compute_metric(data: &DisciplineData, distance_km: f64, duration_min: f64) -> DerivedMetric {
    match data {
        DisciplineData::Running { .. } => {
            DerivedMetric::Pace(pace_min_per_km(distance_km, duration_min))
        }
        DisciplineData::Cycling { .. } => {
            DerivedMetric::Speed(speed_km_per_h(distance_km, duration_min))
        }
    }
}

fn describe(discipline: Discipline, created_at_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(created_at_ms) {
        Some(created_at) => format!("{} on {}", discipline.label(), created_at.format("%B %-d")),
        None => discipline.label().to_string(),
    }
}
