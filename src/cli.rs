use crate::types::{Coordinate, WorkoutKind};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "pinlog.sqlite";

#[derive(Parser, Debug)]
#[command(
    name = "pinlog",
    version,
    about = "Log running and cycling workouts pinned to map coordinates"
)]
pub struct Cli {
    /// SQLite file holding the saved workouts.
    #[arg(long, env = "PINLOG_DB", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a workout at a map location.
    Add {
        /// `running` or `cycling`.
        kind: WorkoutKind,

        /// Clicked location as `lat,lng`.
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        at: Coordinate,

        /// Distance in km.
        #[arg(long, allow_hyphen_values = true)]
        distance: String,

        /// Duration in minutes.
        #[arg(long, allow_hyphen_values = true)]
        duration: String,

        /// Steps per minute (running).
        #[arg(long, allow_hyphen_values = true)]
        cadence: Option<String>,

        /// Elevation gain in meters, negative for a descent (cycling).
        #[arg(long, allow_hyphen_values = true)]
        elevation: Option<String>,

        /// Current position; enables map markers.
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        from: Option<Coordinate>,
    },

    /// Print every workout in the order it was logged.
    List,

    /// Print a map marker per workout.
    Markers {
        /// Current position. Without it the map is treated as unavailable.
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        from: Option<Coordinate>,
    },

    /// Center the map on a workout.
    Show {
        id: String,

        /// Current position. Without it the map is treated as unavailable.
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        from: Option<Coordinate>,
    },

    /// Delete every saved workout and start over.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_negative_values() {
        let cli = Cli::try_parse_from([
            "pinlog",
            "--db",
            "/tmp/w.sqlite",
            "add",
            "cycling",
            "--at",
            "51.5,-0.1",
            "--distance",
            "20",
            "--duration",
            "60",
            "--elevation",
            "-150",
        ])
        .unwrap();

        assert_eq!(cli.db, PathBuf::from("/tmp/w.sqlite"));
        let Cmd::Add {
            kind,
            at,
            elevation,
            cadence,
            from,
            ..
        } = cli.cmd
        else {
            panic!("expected add");
        };
        assert_eq!(kind, WorkoutKind::Cycling);
        assert_eq!(at, Coordinate::new(51.5, -0.1));
        assert_eq!(elevation.as_deref(), Some("-150"));
        assert!(cadence.is_none());
        assert!(from.is_none());
    }

    #[test]
    fn rejects_out_of_range_location() {
        let res = Cli::try_parse_from([
            "pinlog", "add", "running", "--at", "95,0", "--distance", "5", "--duration", "25",
        ]);
        assert!(res.is_err());
    }
}
