//! Attendance and feedback, both recorded as upserts keyed by `(student, event)`.
//!
//! Resubmitting for the same student and event overwrites the existing row. The newest
//! submission always wins, and a conflict is never reported to the caller as an error.
//!
//! Neither operation requires the student to be registered for the event.

use super::{ParticipationManager, ensure_participants_exist, now};
use crate::error::{ParticipationError, Result};
use crate::models::{
    Attendance, AttendanceStatus, Feedback, NewAttendance, NewFeedback, Rating, Upserted,
};
use crate::schema::{attendance, feedback};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::upsert::excluded;
use tracing::info;

impl ParticipationManager {
    /// Marks a student's attendance at an event.
    ///
    /// `status` is interpreted by [`AttendanceStatus::from_input`], so a missing or unrecognized
    /// status counts as present.
    pub fn record_attendance(
        &mut self,
        student_id: i32,
        event_id: i32,
        status: Option<&str>,
    ) -> Result<Upserted<Attendance>> {
        let record = NewAttendance {
            student_id,
            event_id,
            status: AttendanceStatus::from_input(status),
            marked_at: now(),
        };

        let outcome = self.db.immediate_transaction(|conn| {
            ensure_participants_exist(conn, student_id, event_id)?;

            let existed = diesel::select(exists(
                attendance::table
                    .filter(attendance::student_id.eq(student_id))
                    .filter(attendance::event_id.eq(event_id)),
            ))
            .get_result::<bool>(conn)?;

            let row = diesel::insert_into(attendance::table)
                .values(&record)
                .on_conflict((attendance::student_id, attendance::event_id))
                .do_update()
                .set((
                    attendance::status.eq(excluded(attendance::status)),
                    attendance::marked_at.eq(excluded(attendance::marked_at)),
                ))
                .returning(Attendance::as_returning())
                .get_result(conn)?;

            Ok::<_, ParticipationError>(tag(existed, row))
        })?;

        info!(
            student_id,
            event_id,
            status = %record.status,
            inserted = outcome.was_inserted(),
            "recorded attendance"
        );

        Ok(outcome)
    }

    /// Records a student's feedback for an event, replacing any earlier feedback of theirs.
    ///
    /// The [`Rating`] is validated when it is constructed, so no invalid rating reaches storage.
    /// `comment` is stored as given; omitting it clears an earlier comment.
    pub fn record_feedback(
        &mut self,
        student_id: i32,
        event_id: i32,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<Upserted<Feedback>> {
        let record = NewFeedback {
            student_id,
            event_id,
            rating: rating.get(),
            comment,
            submitted_at: now(),
        };

        let outcome = self.db.immediate_transaction(|conn| {
            ensure_participants_exist(conn, student_id, event_id)?;

            let existed = diesel::select(exists(
                feedback::table
                    .filter(feedback::student_id.eq(student_id))
                    .filter(feedback::event_id.eq(event_id)),
            ))
            .get_result::<bool>(conn)?;

            let row = diesel::insert_into(feedback::table)
                .values(&record)
                .on_conflict((feedback::student_id, feedback::event_id))
                .do_update()
                .set((
                    feedback::rating.eq(excluded(feedback::rating)),
                    feedback::comment.eq(excluded(feedback::comment)),
                    feedback::submitted_at.eq(excluded(feedback::submitted_at)),
                ))
                .returning(Feedback::as_returning())
                .get_result(conn)?;

            Ok::<_, ParticipationError>(tag(existed, row))
        })?;

        info!(
            student_id,
            event_id,
            rating = rating.get(),
            inserted = outcome.was_inserted(),
            "recorded feedback"
        );

        Ok(outcome)
    }

    /// Retrieves every attendance record for an event.
    pub fn event_attendance(&mut self, event_id: i32) -> Result<Vec<Attendance>> {
        Ok(attendance::table
            .filter(attendance::event_id.eq(event_id))
            .order(attendance::student_id.asc())
            .select(Attendance::as_select())
            .load(&mut self.db)?)
    }

    /// Retrieves every piece of feedback for an event.
    pub fn event_feedback(&mut self, event_id: i32) -> Result<Vec<Feedback>> {
        Ok(feedback::table
            .filter(feedback::event_id.eq(event_id))
            .order(feedback::student_id.asc())
            .select(Feedback::as_select())
            .load(&mut self.db)?)
    }
}

fn tag<T>(existed: bool, row: T) -> Upserted<T> {
    if existed {
        Upserted::Updated(row)
    } else {
        Upserted::Inserted(row)
    }
}
