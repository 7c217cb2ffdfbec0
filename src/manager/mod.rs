//! The [`ParticipationManager`], which owns the database connection and implements every
//! participation operation.
//!
//! The operations are split by concern:
//!
//! - [`catalog`]: colleges, students, and events.
//! - [`registration`]: the registration ledger and its capacity rules.
//! - [`interaction`]: attendance and feedback upserts.
//! - [`analytics`]: read-only reports.

use crate::error::{ParticipationError, Result};
use crate::models::{Event, Student};
use crate::schema;
use crate::settings::Settings;
use chrono::{NaiveDateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::time::Duration;
use tracing::{debug, info};

pub mod analytics;
pub mod catalog;
pub mod interaction;
pub mod registration;

/// The schema migrations, embedded at compile time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// The manager for recording, modifying, and retrieving participation data.
///
/// Each manager owns a single `sqlite3` connection. Callers that need to work concurrently
/// should each connect their own manager to the same database file; writes are serialized by
/// `sqlite3` itself.
pub struct ParticipationManager {
    db: SqliteConnection,
}

impl ParticipationManager {
    /// Creates a new `ParticipationManager` by connecting to the `sqlite3` instance at
    /// `database_url` and applying any pending migrations.
    ///
    /// `busy_timeout` bounds how long an operation waits for another connection's write lock.
    pub fn connect(database_url: &str, busy_timeout: Duration) -> Result<Self> {
        let mut db = SqliteConnection::establish(database_url)?;

        db.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            busy_timeout.as_millis()
        ))?;

        let applied = db
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| ParticipationError::Migration(err.to_string()))?;

        if !applied.is_empty() {
            info!(count = applied.len(), "applied pending migrations");
        }

        debug!(database_url, "connected to participation database");

        Ok(Self { db })
    }

    /// Connects using the database described by the given [`Settings`].
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::connect(&settings.database_url, settings.busy_timeout())
    }
}

/// The timestamp recorded on rows written now.
fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Loads an event, failing with [`ParticipationError::NotFound`] if it does not exist.
fn find_event(conn: &mut SqliteConnection, event_id: i32) -> Result<Event> {
    use schema::events::dsl::*;

    events
        .find(event_id)
        .select(Event::as_select())
        .first(conn)
        .optional()?
        .ok_or(ParticipationError::NotFound {
            entity: "event",
            id: event_id,
        })
}

/// Loads a student, failing with [`ParticipationError::NotFound`] if they do not exist.
fn find_student(conn: &mut SqliteConnection, student_id: i32) -> Result<Student> {
    use schema::students::dsl::*;

    students
        .find(student_id)
        .select(Student::as_select())
        .first(conn)
        .optional()?
        .ok_or(ParticipationError::NotFound {
            entity: "student",
            id: student_id,
        })
}

/// Fails with [`ParticipationError::NotFound`] unless both the student and the event exist.
fn ensure_participants_exist(
    conn: &mut SqliteConnection,
    student_id: i32,
    event_id: i32,
) -> Result<()> {
    find_event(conn, event_id)?;
    find_student(conn, student_id)?;
    Ok(())
}
