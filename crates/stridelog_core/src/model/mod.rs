//! Workout domain model.
//!
//! # Responsibility
//! - Define canonical workout data structures used by store and codec.
//! - Keep derived metrics as pure functions over base fields.
//!
//! # Invariants
//! - Every workout is identified by a stable `WorkoutId`.
//! - Discipline is a tag on one record type, not a type hierarchy.

pub mod metrics;
pub mod workout;
