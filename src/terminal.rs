use crate::dlog;
use crate::types::{Coordinate, Workout, WorkoutDetails, WorkoutKind};
use crate::view::{MapView, WorkoutPanel};

/// Zoom level used whenever the view is centered.
pub const MAP_ZOOM: u8 = 13;

/// Prints map requests as text lines.
#[derive(Debug, Default)]
pub struct TerminalMap;

impl MapView for TerminalMap {
    fn render_marker(&mut self, coordinate: Coordinate, popup: &str) {
        println!("📍 {coordinate}\t{popup}");
    }

    fn recenter(&mut self, coordinate: Coordinate) {
        println!("🗺  centered on {coordinate} (zoom {MAP_ZOOM})");
    }

    fn clear_markers(&mut self) {
        dlog!("markers cleared");
    }
}

/// List entries go to stdout, notifications to stderr.
#[derive(Debug)]
pub struct TerminalPanel {
    show_list: bool,
}

impl TerminalPanel {
    pub const fn new(show_list: bool) -> Self {
        Self { show_list }
    }
}

impl WorkoutPanel for TerminalPanel {
    fn show_form(&mut self) {
        dlog!("form shown");
    }

    fn hide_form(&mut self) {
        dlog!("form hidden");
    }

    fn show_kind_fields(&mut self, kind: WorkoutKind) {
        dlog!("form fields kind={kind}");
    }

    fn render_list_entry(&mut self, workout: &Workout) {
        if self.show_list {
            println!("{}", format_entry(workout));
        }
    }

    fn clear_list(&mut self) {
        dlog!("list cleared");
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Two-line list entry: title with id, then the figures.
pub fn format_entry(w: &Workout) -> String {
    let kind = w.kind();
    let metrics = match *w.details() {
        WorkoutDetails::Running {
            cadence_spm,
            pace_min_per_km,
        } => format!("⚡️ {pace_min_per_km:.1} min/km · 🦶🏼 {cadence_spm} spm"),
        WorkoutDetails::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => format!("⚡️ {speed_km_per_h:.1} km/h · ⛰ {elevation_gain_m} m"),
    };
    format!(
        "{} [{}]\n  {} {} km · ⏱ {} min · {metrics}",
        w.description(),
        w.id(),
        kind.icon(),
        w.distance_km(),
        w.duration_min(),
    )
}
