use crate::dlog;
use crate::error::{Result, WorkoutError};
use crate::types::Workout;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Key of the single slot holding the whole workout collection.
pub const WORKOUTS_KEY: &str = "workouts";

/// A host-provided key-value slot that survives restarts.
pub trait DurableSlot {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Slots kept in a SQLite file, one row per key.
pub struct SqliteSlot {
    conn: Connection,
}

impl std::fmt::Debug for SqliteSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSlot").finish_non_exhaustive()
    }
}

impl SqliteSlot {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        dlog!("opening slot db path={}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        if !table_exists(&conn, "slots")? {
            tracing::info!("creating slots table");
            conn.execute_batch(
                r"
                CREATE TABLE slots (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                )
                ",
            )?;
        }
        Ok(Self { conn })
    }
}

impl DurableSlot for SqliteSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM slots WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Rejects records that could not have come out of the factory.
fn check_loaded(workouts: &[Workout]) -> Result<()> {
    let mut seen = HashSet::with_capacity(workouts.len());
    for (i, w) in workouts.iter().enumerate() {
        let broken = w.check_integrity();
        if !broken.is_empty() {
            return Err(WorkoutError::CorruptPersistedData {
                reason: format!("record {i} ({}): {}", w.id(), broken.join(", ")),
            });
        }
        if !seen.insert(w.id()) {
            return Err(WorkoutError::CorruptPersistedData {
                reason: format!("record {i}: duplicate id {}", w.id()),
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

/// Saves and restores the workout collection as a JSON array in one slot.
///
/// Derived metrics and descriptions are written as computed and read back
/// verbatim; nothing is recomputed on load.
#[derive(Debug)]
pub struct WorkoutArchive<S> {
    slot: S,
}

impl<S: DurableSlot> WorkoutArchive<S> {
    pub const fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn save(&mut self, workouts: &[Workout]) -> Result<()> {
        let json = serde_json::to_string(workouts)?;
        self.slot.write(WORKOUTS_KEY, &json)?;
        dlog!("saved workouts={} bytes={}", workouts.len(), json.len());
        Ok(())
    }

    /// A missing slot is an empty log. Anything unreadable is reported as
    /// [`WorkoutError::CorruptPersistedData`].
    pub fn load(&self) -> Result<Vec<Workout>> {
        let Some(json) = self.slot.read(WORKOUTS_KEY)? else {
            dlog!("no saved workouts");
            return Ok(Vec::new());
        };

        let workouts: Vec<Workout> =
            serde_json::from_str(&json).map_err(|e| WorkoutError::CorruptPersistedData {
                reason: e.to_string(),
            })?;

        check_loaded(&workouts)?;
        Ok(workouts)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.slot.remove(WORKOUTS_KEY)?;
        tracing::info!("cleared saved workouts");
        Ok(())
    }

    pub const fn slot(&self) -> &S {
        &self.slot
    }

    pub const fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{RawFields, create_at};
    use crate::types::{Coordinate, WorkoutKind};
    use chrono::{TimeZone, Utc};

    fn archive() -> WorkoutArchive<SqliteSlot> {
        WorkoutArchive::new(SqliteSlot::open_in_memory().unwrap())
    }

    fn sample() -> Vec<Workout> {
        let run = create_at(
            WorkoutKind::Running,
            Coordinate::new(51.5, -0.1),
            &RawFields::from_inputs("3.3", "17.1", "172", ""),
            Utc.with_ymd_and_hms(2024, 5, 2, 7, 15, 42).unwrap(),
            "run-1".into(),
        )
        .unwrap();
        let ride = create_at(
            WorkoutKind::Cycling,
            Coordinate::new(45.764_043, 4.835_659),
            &RawFields::from_inputs("27.7", "73", "", "-212.5"),
            Utc.with_ymd_and_hms(2024, 5, 3, 18, 0, 1).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
            "ride-1".into(),
        )
        .unwrap();
        vec![run, ride]
    }

    #[test]
    fn load_without_saved_data_is_empty() {
        assert!(archive().load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_is_lossless() {
        let mut a = archive();
        let ws = sample();
        a.save(&ws).unwrap();
        assert_eq!(a.load().unwrap(), ws);
    }

    #[test]
    fn later_save_overwrites_the_slot() {
        let mut a = archive();
        let ws = sample();
        a.save(&ws[..1]).unwrap();
        a.save(&ws).unwrap();
        assert_eq!(a.load().unwrap().len(), 2);
    }

    #[test]
    fn malformed_json_is_corrupt() {
        let mut a = archive();
        a.slot_mut().write(WORKOUTS_KEY, "[{\"id\": 1,").unwrap();
        assert!(matches!(
            a.load(),
            Err(WorkoutError::CorruptPersistedData { .. })
        ));

        a.slot_mut()
            .write(WORKOUTS_KEY, r#"[{"kind":"swimming"}]"#)
            .unwrap();
        assert!(matches!(
            a.load(),
            Err(WorkoutError::CorruptPersistedData { .. })
        ));
    }

    #[test]
    fn records_breaking_invariants_are_corrupt() {
        let mut a = archive();
        let mut v = serde_json::to_value(sample()).unwrap();
        v[0]["distanceKm"] = serde_json::json!(-1.0);
        a.slot_mut().write(WORKOUTS_KEY, &v.to_string()).unwrap();

        let Err(WorkoutError::CorruptPersistedData { reason }) = a.load() else {
            panic!("expected corrupt data");
        };
        assert!(reason.contains("distanceKm"), "{reason}");
    }

    #[test]
    fn duplicate_ids_are_corrupt() {
        let mut a = archive();
        let ws = sample();
        a.save(&[ws[0].clone(), ws[0].clone()]).unwrap();
        assert!(matches!(
            a.load(),
            Err(WorkoutError::CorruptPersistedData { reason }) if reason.contains("duplicate")
        ));
    }

    #[test]
    fn reset_leaves_an_empty_log() {
        let mut a = archive();
        a.save(&sample()).unwrap();
        a.reset().unwrap();
        assert!(a.slot().read(WORKOUTS_KEY).unwrap().is_none());
        assert!(a.load().unwrap().is_empty());
    }
}
