use crate::types::{Coordinate, Workout, WorkoutDetails, WorkoutKind};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Numeric candidates read from the form. Blank fields are zero and anything
/// that did not parse is NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFields {
    pub distance: f64,
    pub duration: f64,
    pub cadence: f64,
    pub elevation: f64,
}

impl RawFields {
    pub fn from_inputs(distance: &str, duration: &str, cadence: &str, elevation: &str) -> Self {
        Self {
            distance: parse_candidate(distance),
            duration: parse_candidate(duration),
            cadence: parse_candidate(cadence),
            elevation: parse_candidate(elevation),
        }
    }
}

/// Blank input reads as zero, like an empty number field.
pub fn parse_candidate(input: &str) -> f64 {
    let s = input.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse().unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Cadence => "cadence",
            Self::Elevation => "elevation",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    NotANumber,
    NotPositive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub problem: Problem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            Problem::NotANumber => write!(f, "{} must be a number", self.field),
            Problem::NotPositive => write!(f, "{} must be greater than zero", self.field),
        }
    }
}

/// Every field that failed, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub failures: Vec<FieldError>,
}

impl ValidationError {
    pub fn has(&self, field: Field, problem: Problem) -> bool {
        self.failures
            .iter()
            .any(|e| e.field == field && e.problem == problem)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid workout: ")?;
        for (i, e) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

fn check(failures: &mut Vec<FieldError>, field: Field, value: f64, must_be_positive: bool) {
    let problem = if !value.is_finite() {
        Problem::NotANumber
    } else if must_be_positive && value <= 0.0 {
        Problem::NotPositive
    } else {
        return;
    };
    failures.push(FieldError { field, problem });
}

/// Checks the fields the kind uses. Running needs all three positive;
/// cycling accepts any finite elevation since descents are negative.
pub fn validate(kind: WorkoutKind, raw: &RawFields) -> Result<(), ValidationError> {
    let mut failures = Vec::new();
    check(&mut failures, Field::Distance, raw.distance, true);
    check(&mut failures, Field::Duration, raw.duration, true);
    match kind {
        WorkoutKind::Running => check(&mut failures, Field::Cadence, raw.cadence, true),
        WorkoutKind::Cycling => check(&mut failures, Field::Elevation, raw.elevation, false),
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { failures })
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Validates the form and builds a workout stamped with a fresh id and the
/// current time.
pub fn create(
    kind: WorkoutKind,
    coordinate: Coordinate,
    raw: &RawFields,
) -> Result<Workout, ValidationError> {
    create_at(kind, coordinate, raw, Utc::now(), new_id())
}

pub fn create_at(
    kind: WorkoutKind,
    coordinate: Coordinate,
    raw: &RawFields,
    created_at: DateTime<Utc>,
    id: String,
) -> Result<Workout, ValidationError> {
    validate(kind, raw)?;

    let details = match kind {
        WorkoutKind::Running => WorkoutDetails::running(raw.distance, raw.duration, raw.cadence),
        WorkoutKind::Cycling => WorkoutDetails::cycling(raw.distance, raw.duration, raw.elevation),
    };

    Ok(Workout::new(
        id,
        created_at,
        coordinate,
        raw.distance,
        raw.duration,
        details,
    ))
}
