use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    /// Marker/list icon.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Cycling => f.write_str("cycling"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown workout kind {0:?} (expected running or cycling)")]
pub struct UnknownKind(pub String);

impl FromStr for WorkoutKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("running") {
            Ok(Self::Running)
        } else if s.eq_ignore_ascii_case("cycling") {
            Ok(Self::Cycling)
        } else {
            Err(UnknownKind(s.to_string()))
        }
    }
}

/// A point on the map, stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub const fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("expected \"lat,lng\", got {0:?}")]
    Format(String),
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CoordinateError::Format(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(bad)?;
        let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
        let lng: f64 = lng.trim().parse().map_err(|_| bad())?;

        // NaN fails both range checks.
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

/// Kind-specific inputs and the metric derived from them at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum WorkoutDetails {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

impl WorkoutDetails {
    pub fn running(distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self::Running {
            cadence_spm,
            pace_min_per_km: duration_min / distance_km,
        }
    }

    pub fn cycling(distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self::Cycling {
            elevation_gain_m,
            speed_km_per_h: distance_km / (duration_min / 60.0),
        }
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// One logged workout. Fields are fixed once built; there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: String,
    created_at: DateTime<Utc>,
    coordinate: Coordinate,
    distance_km: f64,
    duration_min: f64,
    description: String,
    #[serde(flatten)]
    details: WorkoutDetails,
}

impl Workout {
    pub(crate) fn new(
        id: String,
        created_at: DateTime<Utc>,
        coordinate: Coordinate,
        distance_km: f64,
        duration_min: f64,
        details: WorkoutDetails,
    ) -> Self {
        let description = describe(details.kind(), &created_at.with_timezone(&Local));
        Self {
            id,
            created_at,
            coordinate,
            distance_km,
            duration_min,
            description,
            details,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub const fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn details(&self) -> &WorkoutDetails {
        &self.details
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    /// Text shown in the marker popup.
    pub fn popup_text(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }

    /// Re-checks the construction invariants on a record that did not come
    /// from the factory (e.g. read back from durable storage).
    pub fn check_integrity(&self) -> Vec<&'static str> {
        let mut broken = Vec::new();
        if self.id.is_empty() {
            broken.push("id is empty");
        }
        if !self.coordinate.is_finite() {
            broken.push("coordinate is not finite");
        }
        if !(self.distance_km.is_finite() && self.distance_km > 0.0) {
            broken.push("distanceKm is not a positive number");
        }
        if !(self.duration_min.is_finite() && self.duration_min > 0.0) {
            broken.push("durationMin is not a positive number");
        }
        match self.details {
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => {
                if !(cadence_spm.is_finite() && cadence_spm > 0.0) {
                    broken.push("cadenceSpm is not a positive number");
                }
                if !pace_min_per_km.is_finite() {
                    broken.push("paceMinPerKm is not finite");
                }
            }
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                if !elevation_gain_m.is_finite() {
                    broken.push("elevationGainM is not finite");
                }
                if !speed_km_per_h.is_finite() {
                    broken.push("speedKmPerH is not finite");
                }
            }
        }
        broken
    }
}

/// `"<Kind> <Month> <Day>"`, e.g. `Running October 19`.
pub fn describe<Tz>(kind: WorkoutKind, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("{} {}", kind.label(), at.format("%B %-d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_uses_full_month_and_unpadded_day() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        assert_eq!(describe(WorkoutKind::Running, &at), "Running March 4");
        assert_eq!(describe(WorkoutKind::Cycling, &at), "Cycling March 4");
    }

    #[test]
    fn coordinate_parses_and_checks_range() {
        let c: Coordinate = "51.5, -0.1".parse().unwrap();
        assert_eq!(c, Coordinate::new(51.5, -0.1));

        assert_eq!(
            "91,0".parse::<Coordinate>(),
            Err(CoordinateError::Latitude(91.0))
        );
        assert_eq!(
            "0,-181".parse::<Coordinate>(),
            Err(CoordinateError::Longitude(-181.0))
        );
        assert!(matches!(
            "51.5".parse::<Coordinate>(),
            Err(CoordinateError::Format(_))
        ));
        assert!("NaN,0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Running".parse::<WorkoutKind>().unwrap(), WorkoutKind::Running);
        assert_eq!(" cycling ".parse::<WorkoutKind>().unwrap(), WorkoutKind::Cycling);
        assert!("swimming".parse::<WorkoutKind>().is_err());
    }

    #[test]
    fn serialized_shape_is_flat_and_tagged() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        let w = Workout::new(
            "abc".into(),
            at,
            Coordinate::new(51.5, -0.1),
            20.0,
            60.0,
            WorkoutDetails::cycling(20.0, 60.0, -150.0),
        );
        let v = serde_json::to_value(&w).unwrap();

        assert_eq!(v["id"], "abc");
        assert_eq!(v["kind"], "cycling");
        assert_eq!(v["coordinate"], serde_json::json!([51.5, -0.1]));
        assert_eq!(v["distanceKm"], 20.0);
        assert_eq!(v["durationMin"], 60.0);
        assert_eq!(v["elevationGainM"], -150.0);
        assert_eq!(v["speedKmPerH"], 20.0);
        assert_eq!(v["createdAt"], "2024-06-01T08:30:00Z");
        assert!(v.get("cadenceSpm").is_none());
    }

    #[test]
    fn integrity_flags_broken_records() {
        let at = Utc::now();
        let ok = Workout::new(
            "a".into(),
            at,
            Coordinate::new(0.0, 0.0),
            5.0,
            25.0,
            WorkoutDetails::running(5.0, 25.0, 180.0),
        );
        assert!(ok.check_integrity().is_empty());

        let bad = Workout::new(
            String::new(),
            at,
            Coordinate::new(0.0, 0.0),
            -1.0,
            25.0,
            WorkoutDetails::Running {
                cadence_spm: 0.0,
                pace_min_per_km: -25.0,
            },
        );
        let broken = bad.check_integrity();
        assert!(broken.contains(&"id is empty"));
        assert!(broken.contains(&"distanceKm is not a positive number"));
        assert!(broken.contains(&"cadenceSpm is not a positive number"));
    }

    #[test]
    fn popup_text_carries_icon_and_description() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let w = Workout::new(
            "x".into(),
            at,
            Coordinate::new(1.0, 2.0),
            5.0,
            25.0,
            WorkoutDetails::running(5.0, 25.0, 170.0),
        );
        assert_eq!(w.popup_text(), format!("🏃‍♂️ {}", w.description()));
    }
}
