//! In-memory workout collection.
//!
//! # Responsibility
//! - Own the ordered set of live workouts (single source of truth).
//! - Enforce id uniqueness and validated edits.
//! - Provide a distance-sorted presentation view over creation order.
//!
//! # Invariants
//! - Canonical order is creation (insertion) order; sort views never reorder
//!   the underlying sequence.
//! - A failed operation leaves the collection unchanged.

use crate::model::workout::{WorkoutFields, WorkoutId, WorkoutRecord, WorkoutValidationError};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for lookups, integrity checks and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(WorkoutValidationError),
    NotFound(WorkoutId),
    DuplicateId(WorkoutId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "workout not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate workout id: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<WorkoutValidationError> for StoreError {
    fn from(value: WorkoutValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Active list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortView {
    #[default]
    CreationOrder,
    ByDistance,
}

/// Ordered in-memory workout collection.
#[derive(Debug, Clone, Default)]
pub struct WorkoutStore {
    records: Vec<WorkoutRecord>,
    sort_view: SortView,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from reconstructed records, keeping their order.
    ///
    /// # Errors
    /// - `DuplicateId` when two records share an id.
    pub fn from_records(records: Vec<WorkoutRecord>) -> StoreResult<Self> {
        let mut store = Self::new();
        for record in records {
            store.add(record)?;
        }
        Ok(store)
    }

    /// Appends a record.
    ///
    /// # Errors
    /// - `DuplicateId` when a record with the same id is already present.
    pub fn add(&mut self, record: WorkoutRecord) -> StoreResult<()> {
        if self.position_of(record.id()).is_some() {
            error!(
                "event=workout_add module=store status=error error_code=duplicate_id id={}",
                record.id()
            );
            return Err(StoreError::DuplicateId(record.id().clone()));
        }
        debug!(
            "event=workout_add module=store status=ok id={} discipline={}",
            record.id(),
            record.discipline().label()
        );
        self.records.push(record);
        Ok(())
    }

    /// Removes and returns the record with `id`.
    pub fn remove(&mut self, id: &WorkoutId) -> StoreResult<WorkoutRecord> {
        let index = self
            .position_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(self.records.remove(index))
    }

    pub fn find(&self, id: &WorkoutId) -> StoreResult<&WorkoutRecord> {
        self.records
            .iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Replaces editable fields of one record and recomputes derived state.
    ///
    /// Preserves `id`, `created_at_ms`, discipline and interaction count.
    pub fn replace_fields(
        &mut self,
        id: &WorkoutId,
        fields: WorkoutFields,
    ) -> StoreResult<&WorkoutRecord> {
        let record = self.find_mut(id)?;
        record.replace_fields(fields)?;
        Ok(&*record)
    }

    /// Increments the interaction counter and returns the new value.
    pub fn mark_interacted(&mut self, id: &WorkoutId) -> StoreResult<u32> {
        Ok(self.find_mut(id)?.record_interaction())
    }

    /// Records ordered by ascending distance; ties keep creation order.
    pub fn sorted_by_distance(&self) -> Vec<&WorkoutRecord> {
        let mut sorted: Vec<&WorkoutRecord> = self.records.iter().collect();
        sorted.sort_by(|left, right| left.distance_km().total_cmp(&right.distance_km()));
        sorted
    }

    /// Flips the active view between creation order and distance order.
    pub fn toggle_distance_sort(&mut self) -> SortView {
        self.sort_view = match self.sort_view {
            SortView::CreationOrder => SortView::ByDistance,
            SortView::ByDistance => SortView::CreationOrder,
        };
        self.sort_view
    }

    pub fn sort_view(&self) -> SortView {
        self.sort_view
    }

    /// Records in the currently active presentation order.
    pub fn view(&self) -> Vec<&WorkoutRecord> {
        match self.sort_view {
            SortView::CreationOrder => self.records.iter().collect(),
            SortView::ByDistance => self.sorted_by_distance(),
        }
    }

    /// Records in canonical creation order.
    pub fn records(&self) -> &[WorkoutRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Empties the collection and resets the sort view.
    pub fn clear(&mut self) {
        self.records.clear();
        self.sort_view = SortView::CreationOrder;
    }

    fn position_of(&self, id: &WorkoutId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn find_mut(&mut self, id: &WorkoutId) -> StoreResult<&mut WorkoutRecord> {
        self.records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}
