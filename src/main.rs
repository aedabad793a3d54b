#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use pinlog::terminal::{TerminalMap, TerminalPanel};
use pinlog::{RawFields, SessionController, SqliteSlot, WorkoutArchive, WorkoutError, cli, utils};

#[macro_use]
extern crate pinlog;

type Session = SessionController<SqliteSlot, TerminalMap, TerminalPanel>;

fn open_session(cli: &cli::Cli, show_list: bool) -> Result<Session> {
    let slot = SqliteSlot::open(&cli.db)
        .with_context(|| format!("opening workout db: {}", cli.db.display()))?;
    dlog!("mode={:?} db={}", cli.cmd, cli.db.display());
    Ok(SessionController::start(
        WorkoutArchive::new(slot),
        TerminalPanel::new(show_list),
    ))
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    match &cli.cmd {
        cli::Cmd::Add {
            kind,
            at,
            distance,
            duration,
            cadence,
            elevation,
            from,
        } => {
            let mut session = open_session(&cli, true)?;
            if let Some(position) = from {
                session.map_ready(TerminalMap, *position);
            }

            session.map_clicked(*at);
            session.kind_changed(*kind);
            let raw = RawFields::from_inputs(
                distance,
                duration,
                cadence.as_deref().unwrap_or_default(),
                elevation.as_deref().unwrap_or_default(),
            );
            match session.form_submitted(*kind, &raw) {
                Ok(_) => Ok(()),
                // Already reported to the user by the panel.
                Err(WorkoutError::Validation(_)) => anyhow::bail!("workout not logged"),
                Err(e) => Err(e).context("logging workout"),
            }
        }
        cli::Cmd::List => {
            let session = open_session(&cli, true)?;
            if session.store().is_empty() {
                tracing::info!("no workouts logged yet");
            }
            Ok(())
        }
        cli::Cmd::Markers { from } => {
            let mut session = open_session(&cli, false)?;
            match from {
                Some(position) => session.map_ready(TerminalMap, *position),
                None => session.map_denied(),
            }
            Ok(())
        }
        cli::Cmd::Show { id, from } => {
            let mut session = open_session(&cli, false)?;
            match from {
                Some(position) => session.map_ready(TerminalMap, *position),
                None => session.map_denied(),
            }
            session.workout_selected(id);
            Ok(())
        }
        cli::Cmd::Reset => {
            let mut session = open_session(&cli, false)?;
            let cleared = session.store().len();
            session.reset().context("clearing saved workouts")?;
            println!("cleared {cleared} workouts");
            Ok(())
        }
    }
}
