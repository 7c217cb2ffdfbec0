//! The registration ledger: at most one registration per student per event, and never more
//! registrations than an event's capacity.

use super::{ParticipationManager, find_event, find_student, now};
use crate::error::{ParticipationError, Result, is_unique_violation};
use crate::models::{NewRegistration, Registration, RegistrationStatus};
use crate::schema;
use diesel::prelude::*;
use tracing::{info, warn};

impl ParticipationManager {
    /// Registers a student for an event.
    ///
    /// The capacity check and the insert happen inside one `BEGIN IMMEDIATE` transaction, so the
    /// count cannot change between the two even when other connections are registering for the
    /// same event. Capacity is checked first: a student re-registering for a full event gets
    /// [`ParticipationError::CapacityExceeded`] rather than
    /// [`ParticipationError::DuplicateRegistration`].
    ///
    /// Duplicates are detected from the `UNIQUE (student_id, event_id)` constraint, not from a
    /// pre-check.
    pub fn register(&mut self, student_id: i32, event_id: i32) -> Result<Registration> {
        let registration = self.db.immediate_transaction(|conn| {
            let event = find_event(conn, event_id)?;
            find_student(conn, student_id)?;

            if let Some(capacity) = event.capacity_limit() {
                let registered = count_registrations(conn, event_id)?;

                if registered >= i64::from(capacity) {
                    warn!(student_id, event_id, capacity, "event is full");
                    return Err(ParticipationError::CapacityExceeded { event_id, capacity });
                }
            }

            let new_registration = NewRegistration {
                student_id,
                event_id,
                status: RegistrationStatus::Registered,
                registered_at: now(),
            };

            diesel::insert_into(schema::registrations::table)
                .values(&new_registration)
                .returning(Registration::as_returning())
                .get_result(conn)
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        warn!(student_id, event_id, "student is already registered");
                        ParticipationError::DuplicateRegistration {
                            student_id,
                            event_id,
                        }
                    } else {
                        err.into()
                    }
                })
        })?;

        info!(
            registration_id = registration.id,
            student_id, event_id, "registered student for event"
        );

        Ok(registration)
    }

    /// Returns the number of registrations for an event.
    pub fn registration_count(&mut self, event_id: i32) -> Result<i64> {
        count_registrations(&mut self.db, event_id)
    }

    /// Retrieves every registration for an event, oldest first.
    pub fn event_registrations(&mut self, event_id: i32) -> Result<Vec<Registration>> {
        use schema::registrations::dsl;

        Ok(dsl::registrations
            .filter(dsl::event_id.eq(event_id))
            .order(dsl::id.asc())
            .select(Registration::as_select())
            .load(&mut self.db)?)
    }
}

fn count_registrations(conn: &mut SqliteConnection, event_id: i32) -> Result<i64> {
    use schema::registrations::dsl;

    Ok(dsl::registrations
        .filter(dsl::event_id.eq(event_id))
        .count()
        .get_result(conn)?)
}
