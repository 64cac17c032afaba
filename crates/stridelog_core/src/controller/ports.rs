//! Collaborator contracts consumed by the workout controller.
//!
//! # Responsibility
//! - Describe the narrow I/O edges (position, map, list/form view).
//!
//! # Invariants
//! - The controller only writes to collaborators; it never reads map or
//!   view state back.

use crate::model::workout::{Position, WorkoutFields, WorkoutId, WorkoutRecord};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Position lookup failure reported by a `PositionSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    pub reason: String,
}

impl PositionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for PositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "position unavailable: {}", self.reason)
    }
}

impl Error for PositionError {}

/// Source of the user's current position. Called at most once per request.
pub trait PositionSource {
    fn request_position(&mut self) -> Result<Position, PositionError>;
}

/// Map surface showing workout markers.
pub trait MapRenderer {
    fn center_on(&mut self, position: Position);
    fn place_marker(&mut self, position: Position, label: &str);
    fn clear_markers(&mut self);
    /// Pans to a workout selected from the list.
    fn focus(&mut self, position: Position);
}

/// Sidebar list and workout form.
pub trait WorkoutView {
    /// Replaces the rendered list with `workouts`, in display order.
    fn render_workouts(&mut self, workouts: &[&WorkoutRecord]);
    fn show_create_form(&mut self, position: Position);
    fn show_edit_form(&mut self, id: &WorkoutId, fields: WorkoutFields);
    fn hide_form(&mut self);
    /// Toggles the single input-error indicator.
    fn set_error_visible(&mut self, visible: bool);
    fn show_notice(&mut self, message: &str);
}
