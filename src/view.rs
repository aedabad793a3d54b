use crate::types::{Coordinate, Workout, WorkoutKind};

/// The interactive map, available once location access is granted.
pub trait MapView {
    fn render_marker(&mut self, coordinate: Coordinate, popup: &str);
    fn recenter(&mut self, coordinate: Coordinate);
    /// Removes every marker placed so far.
    fn clear_markers(&mut self);
}

/// Form and workout list.
pub trait WorkoutPanel {
    fn show_form(&mut self);
    /// Hides the form and clears its inputs.
    fn hide_form(&mut self);
    /// Shows the cadence input for running, elevation for cycling.
    fn show_kind_fields(&mut self, kind: WorkoutKind);
    /// Called once per workout, in store order.
    fn render_list_entry(&mut self, workout: &Workout);
    /// Drops every rendered list entry.
    fn clear_list(&mut self);
    /// User-facing message (validation failures, denied location access).
    fn notify(&mut self, message: &str);
}
