use crate::dlog;
use crate::error::{Result, WorkoutError};
use crate::factory::{self, RawFields};
use crate::persistence::{DurableSlot, WorkoutArchive};
use crate::store::WorkoutStore;
use crate::types::{Coordinate, WorkoutKind};
use crate::view::{MapView, WorkoutPanel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Idle,
    AwaitingInput {
        pending: Coordinate,
        kind: WorkoutKind,
    },
}

#[derive(Debug)]
enum MapState<M> {
    Pending,
    Ready(M),
    Denied,
}

/// Drives one session: map clicks open the form, submissions become
/// workouts, and every workout is saved and rendered.
///
/// Sole owner and mutator of the [`WorkoutStore`].
#[derive(Debug)]
pub struct SessionController<S, M, P> {
    store: WorkoutStore,
    archive: WorkoutArchive<S>,
    map: MapState<M>,
    panel: P,
    state: SessionState,
}

impl<S, M, P> SessionController<S, M, P>
where
    S: DurableSlot,
    M: MapView,
    P: WorkoutPanel,
{
    /// Hydrates the store and lists every saved workout. Unreadable saved
    /// data starts the session empty.
    pub fn start(archive: WorkoutArchive<S>, mut panel: P) -> Self {
        let mut store = WorkoutStore::new();
        match archive.load() {
            Ok(workouts) => store.replace_all(workouts),
            Err(e) => tracing::warn!(err = %e, "starting with an empty log"),
        }
        tracing::info!(workouts = store.len(), "session started");

        for w in store.all() {
            panel.render_list_entry(w);
        }

        Self {
            store,
            archive,
            map: MapState::Pending,
            panel,
            state: SessionState::Idle,
        }
    }

    /// Location access granted and the map is up: center on the user and
    /// place a marker for every workout logged so far.
    pub fn map_ready(&mut self, mut map: M, position: Coordinate) {
        map.recenter(position);
        for w in self.store.all() {
            map.render_marker(w.coordinate(), &w.popup_text());
        }
        dlog!("map ready markers={}", self.store.len());
        self.map = MapState::Ready(map);
    }

    pub fn map_denied(&mut self) {
        let e = WorkoutError::PermissionDenied;
        tracing::warn!(err = %e, "continuing without map markers");
        self.panel.notify(&e.to_string());
        self.map = MapState::Denied;
    }

    pub fn map_clicked(&mut self, coordinate: Coordinate) {
        match self.state {
            SessionState::Idle => {
                let kind = WorkoutKind::Running;
                self.state = SessionState::AwaitingInput {
                    pending: coordinate,
                    kind,
                };
                self.panel.show_kind_fields(kind);
                self.panel.show_form();
            }
            SessionState::AwaitingInput { ref mut pending, .. } => {
                *pending = coordinate;
                self.panel.show_form();
            }
        }
        dlog!("awaiting input at={coordinate}");
    }

    pub fn kind_changed(&mut self, kind: WorkoutKind) {
        if let SessionState::AwaitingInput { kind: ref mut k, .. } = self.state {
            *k = kind;
            self.panel.show_kind_fields(kind);
        }
    }

    /// Returns the id of the new workout.
    ///
    /// A rejected form stays open with its location; the user is told why.
    pub fn form_submitted(&mut self, kind: WorkoutKind, raw: &RawFields) -> Result<String> {
        let SessionState::AwaitingInput { pending, .. } = self.state else {
            return Err(WorkoutError::NoPendingLocation);
        };

        let workout = match factory::create(kind, pending, raw) {
            Ok(w) => w,
            Err(e) => {
                dlog!("rejected form: {e}");
                self.panel.notify(&e.to_string());
                return Err(e.into());
            }
        };
        let id = workout.id().to_string();

        if let MapState::Ready(map) = &mut self.map {
            map.render_marker(workout.coordinate(), &workout.popup_text());
        }
        self.panel.render_list_entry(&workout);
        self.store.append(workout);

        if let Err(e) = self.archive.save(self.store.all()) {
            tracing::warn!(err = %e, id = %id, "saving workouts failed; kept in memory");
            self.panel.notify(&format!("workout logged but not saved ({e})"));
        }

        self.panel.hide_form();
        self.state = SessionState::Idle;
        tracing::info!(id = %id, kind = %kind, "workout logged");
        Ok(id)
    }

    pub fn form_cancelled(&mut self) {
        self.panel.hide_form();
        self.state = SessionState::Idle;
    }

    /// Centers the map on a listed workout. Stale ids are ignored.
    pub fn workout_selected(&mut self, id: &str) {
        let coordinate = match self.store.find_by_id(id) {
            Ok(w) => w.coordinate(),
            Err(e) => {
                dlog!("ignoring selection: {e}");
                return;
            }
        };
        if let MapState::Ready(map) = &mut self.map {
            map.recenter(coordinate);
        }
    }

    /// Clears saved workouts, then the in-memory log and both views, leaving
    /// the session as on a cold start with an empty slot.
    pub fn reset(&mut self) -> Result<()> {
        self.archive.reset()?;
        self.store.clear();
        if let MapState::Ready(map) = &mut self.map {
            map.clear_markers();
        }
        self.panel.clear_list();
        self.panel.hide_form();
        self.state = SessionState::Idle;
        tracing::info!("session reset");
        Ok(())
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub const fn panel(&self) -> &P {
        &self.panel
    }

    pub const fn map(&self) -> Option<&M> {
        match &self.map {
            MapState::Ready(map) => Some(map),
            MapState::Pending | MapState::Denied => None,
        }
    }

    pub const fn map_is_denied(&self) -> bool {
        matches!(self.map, MapState::Denied)
    }
}
