//! Core domain logic for StrideLog.
//! This crate is the single source of truth for workout invariants and
//! their durable snapshot.

pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use controller::ports::{MapRenderer, PositionError, PositionSource, WorkoutView};
pub use controller::workout_controller::{
    ControllerError, ControllerResult, FormMode, WorkoutController,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::metrics::DerivedMetric;
pub use model::workout::{
    Discipline, DisciplineData, Position, WorkoutFields, WorkoutId, WorkoutRecord,
    WorkoutValidationError,
};
pub use persist::codec::{decode_snapshot, deserialize, serialize, CodecError};
pub use persist::flat_store::{
    FlatStore, MemoryFlatStore, SqliteFlatStore, StorageError, StorageResult,
};
pub use store::workout_store::{SortView, StoreError, StoreResult, WorkoutStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
