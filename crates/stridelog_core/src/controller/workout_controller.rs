//! Workout use-case controller.
//!
//! # Responsibility
//! - Drive the single workout form through `Idle`, `Creating` and `Editing`.
//! - Validate user input before it reaches the store.
//! - Write the full snapshot through to durable storage after mutations.
//! - Rebuild map markers and the list from the store after mutations.
//!
//! # Invariants
//! - Only one form is active at a time.
//! - A rejected submission commits nothing and issues no storage write.
//! - A failed save is reported but does not roll back the in-memory change.

use crate::controller::ports::{MapRenderer, PositionSource, WorkoutView};
use crate::model::workout::{
    Discipline, Position, WorkoutFields, WorkoutId, WorkoutRecord, WorkoutValidationError,
};
use crate::persist::codec::{self, CodecError};
use crate::persist::flat_store::{FlatStore, StorageError};
use crate::store::workout_store::{SortView, StoreError, WorkoutStore};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Notice shown when the position source fails.
pub const LOCATION_UNAVAILABLE_NOTICE: &str = "Unable to determine your location!";
/// Notice shown when a snapshot write fails.
pub const SAVE_FAILED_NOTICE: &str = "Workouts could not be saved.";

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Error returned by controller use-cases.
#[derive(Debug)]
pub enum ControllerError {
    /// Form input was rejected; the error indicator is visible.
    Validation(WorkoutValidationError),
    /// Stale or duplicate id reference.
    Store(StoreError),
    /// Durable snapshot read/write failed.
    Storage(StorageError),
    Codec(CodecError),
    /// Operation not allowed in the current form mode.
    InvalidMode {
        operation: &'static str,
        mode: &'static str,
    },
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid workout input: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::InvalidMode { operation, mode } => {
                write!(f, "`{operation}` is not allowed while {mode}")
            }
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::InvalidMode { .. } => None,
        }
    }
}

impl From<WorkoutValidationError> for ControllerError {
    fn from(value: WorkoutValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<StorageError> for ControllerError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<CodecError> for ControllerError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Workout form state.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Idle,
    /// Create form open for a position picked on the map.
    Creating { position: Position },
    /// Edit form open for an existing workout.
    Editing { id: WorkoutId },
}

impl FormMode {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Creating { .. } => "creating",
            Self::Editing { .. } => "editing",
        }
    }
}

/// Coordinates the workout store with persistence and the UI collaborators.
pub struct WorkoutController<F, P, M, V> {
    store: WorkoutStore,
    flat_store: F,
    position_source: P,
    map: M,
    view: V,
    mode: FormMode,
    slot_key: String,
}

impl<F, P, M, V> WorkoutController<F, P, M, V>
where
    F: FlatStore,
    P: PositionSource,
    M: MapRenderer,
    V: WorkoutView,
{
    /// Creates a controller with an empty store. Call `start` to load.
    pub fn new(
        flat_store: F,
        position_source: P,
        map: M,
        view: V,
        slot_key: impl Into<String>,
    ) -> Self {
        Self {
            store: WorkoutStore::new(),
            flat_store,
            position_source,
            map,
            view,
            mode: FormMode::Idle,
            slot_key: slot_key.into(),
        }
    }

    /// Centers the map on the current position, then restores workouts.
    ///
    /// Returns the acquired position, if any.
    pub fn start(&mut self) -> Option<Position> {
        let position = self.locate();
        self.load();
        position
    }

    /// Requests the current position once and centers the map on it.
    ///
    /// A failure is shown as a notice; it is not an error of the core.
    pub fn locate(&mut self) -> Option<Position> {
        match self.position_source.request_position() {
            Ok(position) => {
                info!(
                    "event=locate module=controller status=ok url={}",
                    position.map_url()
                );
                self.map.center_on(position);
                Some(position)
            }
            Err(err) => {
                warn!(
                    "event=locate module=controller status=error error={}",
                    err
                );
                self.view.show_notice(LOCATION_UNAVAILABLE_NOTICE);
                None
            }
        }
    }

    /// Replaces the store with the persisted snapshot and renders it.
    ///
    /// Storage or decode failures degrade to an empty store. Returns the
    /// number of restored workouts.
    pub fn load(&mut self) -> usize {
        let text = match self.flat_store.read_slot(&self.slot_key) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "event=workouts_load module=controller status=error fallback=empty slot={} error={}",
                    self.slot_key, err
                );
                None
            }
        };

        let records = codec::deserialize(text.as_deref());
        self.store = WorkoutStore::from_records(records).unwrap_or_else(|err| {
            error!(
                "event=workouts_load module=controller status=error fallback=empty error={}",
                err
            );
            WorkoutStore::new()
        });

        info!(
            "event=workouts_load module=controller status=ok count={}",
            self.store.len()
        );
        self.rebuild_view();
        self.store.len()
    }

    /// Opens (or re-targets) the create form for a clicked map position.
    ///
    /// # Errors
    /// - `InvalidMode` while an edit form is open.
    pub fn select_position(&mut self, position: Position) -> ControllerResult<()> {
        if matches!(self.mode, FormMode::Editing { .. }) {
            return Err(self.invalid_mode("select_position"));
        }
        self.mode = FormMode::Creating { position };
        self.view.show_create_form(position);
        Ok(())
    }

    /// Creates a workout at the pending position.
    ///
    /// On validation failure the error indicator is shown and the create
    /// form stays open.
    pub fn submit_create(
        &mut self,
        discipline: Discipline,
        fields: WorkoutFields,
    ) -> ControllerResult<WorkoutId> {
        let FormMode::Creating { position } = self.mode else {
            return Err(self.invalid_mode("submit_create"));
        };

        let record = match WorkoutRecord::create(discipline, position, fields) {
            Ok(record) => record,
            Err(err) => return Err(self.reject_input("submit_create", err)),
        };
        self.view.set_error_visible(false);

        let id = record.id().clone();
        let label = record.marker_label();
        self.store.add(record)?;
        info!(
            "event=workout_create module=controller status=ok id={} discipline={}",
            id,
            discipline.label()
        );

        self.close_form();
        self.map.place_marker(position, &label);
        self.view.render_workouts(&self.store.view());
        self.persist()?;
        Ok(id)
    }

    /// Opens the edit form pre-filled with the workout's current fields.
    ///
    /// # Errors
    /// - `InvalidMode` while the create form is open.
    /// - `Store(NotFound)` for an unknown id.
    pub fn begin_edit(&mut self, id: &WorkoutId) -> ControllerResult<WorkoutFields> {
        if matches!(self.mode, FormMode::Creating { .. }) {
            return Err(self.invalid_mode("begin_edit"));
        }
        let fields = self.lookup(id)?.fields();
        self.mode = FormMode::Editing { id: id.clone() };
        self.view.show_edit_form(id, fields);
        Ok(fields)
    }

    /// Applies edited fields to the workout being edited.
    ///
    /// On validation failure the error indicator is shown and the edit form
    /// stays open.
    pub fn submit_edit(&mut self, fields: WorkoutFields) -> ControllerResult<()> {
        let FormMode::Editing { id } = &self.mode else {
            return Err(self.invalid_mode("submit_edit"));
        };
        let id = id.clone();

        let discipline = self.lookup(&id)?.discipline();
        if let Err(err) = fields.validate(discipline) {
            return Err(self.reject_input("submit_edit", err));
        }
        self.view.set_error_visible(false);

        self.store.replace_fields(&id, fields)?;
        info!("event=workout_edit module=controller status=ok id={}", id);

        self.close_form();
        self.rebuild_view();
        self.persist()
    }

    /// Closes any open form without changes.
    pub fn cancel_form(&mut self) {
        if self.mode != FormMode::Idle {
            self.close_form();
            self.view.set_error_visible(false);
        }
    }

    /// Removes a workout, persists, and rebuilds the view.
    pub fn remove(&mut self, id: &WorkoutId) -> ControllerResult<()> {
        if let Err(err) = self.store.remove(id) {
            error!(
                "event=workout_remove module=controller status=error id={} error={}",
                id, err
            );
            return Err(err.into());
        }
        info!("event=workout_remove module=controller status=ok id={}", id);

        if matches!(&self.mode, FormMode::Editing { id: editing } if editing == id) {
            self.close_form();
        }
        self.rebuild_view();
        self.persist()
    }

    /// Handles a click on a list item: counts it and pans the map.
    ///
    /// Returns the new interaction count.
    pub fn select_workout(&mut self, id: &WorkoutId) -> ControllerResult<u32> {
        let position = self.lookup(id)?.position();
        let count = self.store.mark_interacted(id)?;
        self.map.focus(position);
        Ok(count)
    }

    /// Toggles distance ordering of the list.
    pub fn toggle_sort(&mut self) -> SortView {
        let view = self.store.toggle_distance_sort();
        self.view.render_workouts(&self.store.view());
        view
    }

    /// Clears every workout in memory and in durable storage.
    pub fn reset(&mut self) -> ControllerResult<()> {
        self.store.clear();
        self.close_form();
        self.view.set_error_visible(false);
        self.rebuild_view();

        if let Err(err) = self.flat_store.clear_slot(&self.slot_key) {
            error!(
                "event=workouts_reset module=controller status=error slot={} error={}",
                self.slot_key, err
            );
            self.view.show_notice(SAVE_FAILED_NOTICE);
            return Err(err.into());
        }
        info!("event=workouts_reset module=controller status=ok");
        Ok(())
    }

    /// Redraws every marker and the whole list from the store.
    pub fn rebuild_view(&mut self) {
        self.map.clear_markers();
        for record in self.store.records() {
            self.map
                .place_marker(record.position(), &record.marker_label());
        }
        self.view.render_workouts(&self.store.view());
    }

    /// Current snapshot text as it would be persisted.
    pub fn snapshot(&self) -> ControllerResult<String> {
        Ok(codec::serialize(&self.store)?)
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn flat_store(&self) -> &F {
        &self.flat_store
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn persist(&mut self) -> ControllerResult<()> {
        let result = codec::serialize(&self.store)
            .map_err(ControllerError::from)
            .and_then(|text| {
                self.flat_store
                    .write_slot(&self.slot_key, &text)
                    .map_err(ControllerError::from)
            });

        match result {
            Ok(()) => {
                info!(
                    "event=workouts_save module=controller status=ok count={}",
                    self.store.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=workouts_save module=controller status=error slot={} error={}",
                    self.slot_key, err
                );
                self.view.show_notice(SAVE_FAILED_NOTICE);
                Err(err)
            }
        }
    }

    fn lookup(&self, id: &WorkoutId) -> ControllerResult<&WorkoutRecord> {
        self.store.find(id).map_err(|err| {
            error!(
                "event=workout_lookup module=controller status=error id={} error={}",
                id, err
            );
            ControllerError::from(err)
        })
    }

    fn reject_input(
        &mut self,
        operation: &'static str,
        err: WorkoutValidationError,
    ) -> ControllerError {
        info!(
            "event={} module=controller status=rejected error={}",
            operation, err
        );
        self.view.set_error_visible(true);
        ControllerError::Validation(err)
    }

    fn close_form(&mut self) {
        self.mode = FormMode::Idle;
        self.view.hide_form();
    }

    fn invalid_mode(&self, operation: &'static str) -> ControllerError {
        warn!(
            "event={} module=controller status=error error_code=invalid_mode mode={}",
            operation,
            self.mode.name()
        );
        ControllerError::InvalidMode {
            operation,
            mode: self.mode.name(),
        }
    }
}
