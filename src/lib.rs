pub mod cli;
pub mod controller;
pub mod error;
pub mod factory;
pub mod persistence;
pub mod store;
pub mod terminal;
pub mod types;
pub mod utils;
pub mod view;

pub use controller::{SessionController, SessionState};
pub use error::{Result, WorkoutError};
pub use factory::{RawFields, ValidationError};
pub use persistence::{DurableSlot, SqliteSlot, WorkoutArchive};
pub use store::WorkoutStore;
pub use types::{Coordinate, Workout, WorkoutDetails, WorkoutKind};
pub use view::{MapView, WorkoutPanel};
