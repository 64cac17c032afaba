//! Derived workout metrics.
//!
//! # Responsibility
//! - Compute pace/speed from base workout fields.
//!
//! # Invariants
//! - Functions are pure; callers validate inputs before calling.
//! - Derived values are never stored as a source of truth.

const MINUTES_PER_HOUR: f64 = 60.0;

/// Discipline-specific value computed from distance and duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedMetric {
    /// Minutes per kilometer (Running).
    Pace(f64),
    /// Kilometers per hour (Cycling).
    Speed(f64),
}

impl DerivedMetric {
    /// Raw numeric value regardless of unit.
    pub fn value(&self) -> f64 {
        match self {
            Self::Pace(value) | Self::Speed(value) => *value,
        }
    }

    /// Unit label for display.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Pace(_) => "min/km",
            Self::Speed(_) => "km/h",
        }
    }
}

/// Running pace in minutes per kilometer.
pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

/// Cycling speed in kilometers per hour.
pub fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / MINUTES_PER_HOUR)
}
