//! Terminal implementations of the controller collaborators.
//!
//! # Responsibility
//! - Provide a fixed position source fed from the command line.
//! - Render map events and the workout list as plain text lines.

use stridelog_core::{
    MapRenderer, Position, PositionError, PositionSource, WorkoutFields, WorkoutId,
    WorkoutRecord, WorkoutView,
};

/// Position supplied with `--here`; fails when the flag is absent.
pub struct ArgPosition(pub Option<Position>);

impl PositionSource for ArgPosition {
    fn request_position(&mut self) -> Result<Position, PositionError> {
        self.0
            .ok_or_else(|| PositionError::new("no --here position given"))
    }
}

/// Collects map activity; only centering and focusing produce output.
#[derive(Default)]
pub struct TerminalMap {
    pub marker_count: usize,
    pub events: Vec<String>,
}

impl MapRenderer for TerminalMap {
    fn center_on(&mut self, position: Position) {
        self.events.push(format!("map centered: {}", position.map_url()));
    }

    fn place_marker(&mut self, _position: Position, _label: &str) {
        self.marker_count += 1;
    }

    fn clear_markers(&mut self) {
        self.marker_count = 0;
    }

    fn focus(&mut self, position: Position) {
        self.events.push(format!("map focused: {}", position.map_url()));
    }
}

/// Keeps the latest rendered list; notices and input errors go to stderr.
#[derive(Default)]
pub struct TerminalView {
    pub lines: Vec<String>,
}

impl WorkoutView for TerminalView {
    fn render_workouts(&mut self, workouts: &[&WorkoutRecord]) {
        self.lines = workouts.iter().map(|record| format_row(record)).collect();
    }

    fn show_create_form(&mut self, _position: Position) {}

    fn show_edit_form(&mut self, id: &WorkoutId, fields: WorkoutFields) {
        log::debug!(
            "event=edit_form module=cli status=open id={} distance_km={} duration_min={} input={}",
            id,
            fields.distance_km,
            fields.duration_min,
            fields.discipline_input
        );
    }

    fn hide_form(&mut self) {}

    fn set_error_visible(&mut self, visible: bool) {
        if visible {
            eprintln!("error: distance and duration must be positive numbers; cadence too for runs");
        }
    }

    fn show_notice(&mut self, message: &str) {
        eprintln!("notice: {message}");
    }
}

fn format_row(record: &WorkoutRecord) -> String {
    let metric = record.derived();
    let input = match (record.cadence(), record.elevation_gain_m()) {
        (Some(cadence), _) => format!("{cadence} spm"),
        (None, Some(elevation)) => format!("{elevation} m"),
        (None, None) => String::new(),
    };
    let mut row = format!(
        "{}  {} {}  {} km  {} min  {:.1} {}  {}",
        record.id(),
        record.discipline().glyph(),
        record.description(),
        record.distance_km(),
        record.duration_min(),
        metric.value(),
        metric.unit(),
        input
    );
    if record.interaction_count() > 0 {
        row.push_str(&format!("  (selected {}x)", record.interaction_count()));
    }
    row
}
