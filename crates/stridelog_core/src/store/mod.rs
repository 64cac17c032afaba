//! In-memory workout state.
//!
//! # Responsibility
//! - Hold the live workout collection between persistence snapshots.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `DuplicateId`) instead
//!   of silently ignoring stale ids.

pub mod workout_store;
