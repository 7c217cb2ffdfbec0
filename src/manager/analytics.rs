//! Read-only reports over registrations, attendance, and feedback.
//!
//! Every report is recomputed from the current tables on each call.

use super::ParticipationManager;
use crate::error::Result;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Double, Integer, Nullable, Text};
use serde::Serialize;
use tabled::Tabled;

/// The number of students in the top students report.
pub const TOP_STUDENTS: i64 = 3;

#[derive(QueryableByName, Serialize, Tabled, Debug, Clone, PartialEq)]
pub struct EventPopularity {
    #[diesel(sql_type = Integer)]
    pub event_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub event_type: String,
    #[diesel(sql_type = Date)]
    pub date: NaiveDate,
    #[diesel(sql_type = BigInt)]
    pub registrations: i64,
}

#[derive(QueryableByName, Serialize, Tabled, Debug, Clone, PartialEq)]
pub struct EventAttendance {
    #[diesel(sql_type = Integer)]
    pub event_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = BigInt)]
    pub registrations: i64,
    /// Registered students marked present.
    #[diesel(sql_type = BigInt)]
    pub present: i64,
    #[diesel(sql_type = Double)]
    pub attendance_percentage: f64,
}

#[derive(QueryableByName, Serialize, Tabled, Debug, Clone, PartialEq, Eq)]
pub struct StudentParticipation {
    #[diesel(sql_type = Integer)]
    pub student_id: i32,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = BigInt)]
    pub events_attended: i64,
}

#[derive(QueryableByName, Serialize, Debug, Clone, PartialEq)]
pub struct EventFeedback {
    #[diesel(sql_type = Integer)]
    pub event_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    /// `None` when the event has no feedback.
    #[diesel(sql_type = Nullable<Double>)]
    pub avg_rating: Option<f64>,
    #[diesel(sql_type = BigInt)]
    pub feedback_count: i64,
}

const EVENT_POPULARITY: &str = "\
    SELECT e.id AS event_id, e.title, e.event_type, e.date, COUNT(r.id) AS registrations \
    FROM events e \
    LEFT JOIN registrations r ON r.event_id = e.id \
    WHERE ? IS NULL OR e.event_type = ? \
    GROUP BY e.id \
    ORDER BY registrations DESC, e.id ASC";

// Attendance only counts when it matches a registration for the same student and event.
const ATTENDANCE: &str = "\
    SELECT e.id AS event_id, e.title, \
        COUNT(r.id) AS registrations, \
        COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0) AS present, \
        CASE WHEN COUNT(r.id) = 0 THEN 0.0 \
            ELSE ROUND(100.0 * SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END) \
                / COUNT(r.id), 2) \
        END AS attendance_percentage \
    FROM events e \
    LEFT JOIN registrations r ON r.event_id = e.id \
    LEFT JOIN attendance a ON a.event_id = e.id AND a.student_id = r.student_id \
    GROUP BY e.id \
    ORDER BY e.id ASC";

// `LIMIT -1` means no limit in sqlite.
const PARTICIPATION: &str = "\
    SELECT s.id AS student_id, s.name, s.email, \
        COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0) AS events_attended \
    FROM students s \
    LEFT JOIN attendance a ON a.student_id = s.id \
    GROUP BY s.id \
    ORDER BY events_attended DESC, s.name ASC, s.id ASC \
    LIMIT ?";

// Events without feedback have a NULL average and sort last.
const FEEDBACK: &str = "\
    SELECT e.id AS event_id, e.title, \
        ROUND(AVG(f.rating), 2) AS avg_rating, \
        COUNT(f.id) AS feedback_count \
    FROM events e \
    LEFT JOIN feedback f ON f.event_id = e.id \
    GROUP BY e.id \
    ORDER BY avg_rating IS NULL, avg_rating DESC, e.id ASC";

impl ParticipationManager {
    /// Counts registrations per event, most popular first. Events nobody registered for are
    /// included with a count of zero.
    ///
    /// If `event_type` is given, only events of that type are included.
    pub fn event_popularity(&mut self, event_type: Option<&str>) -> Result<Vec<EventPopularity>> {
        Ok(diesel::sql_query(EVENT_POPULARITY)
            .bind::<Nullable<Text>, _>(event_type)
            .bind::<Nullable<Text>, _>(event_type)
            .load(&mut self.db)?)
    }

    /// Computes the share of registered students marked present at each event.
    ///
    /// The percentage is rounded to two decimal places and is `0.0` for events without
    /// registrations.
    pub fn attendance_report(&mut self) -> Result<Vec<EventAttendance>> {
        Ok(diesel::sql_query(ATTENDANCE).load(&mut self.db)?)
    }

    /// Counts the events each student was marked present at, whether or not they registered.
    ///
    /// Students are ranked by that count, with ties broken by name.
    pub fn student_participation(&mut self) -> Result<Vec<StudentParticipation>> {
        self.participation(-1)
    }

    /// The first [`TOP_STUDENTS`] rows of [`ParticipationManager::student_participation`].
    pub fn top_students(&mut self) -> Result<Vec<StudentParticipation>> {
        self.participation(TOP_STUDENTS)
    }

    /// Averages the ratings for each event, highest first, with events lacking feedback last.
    pub fn feedback_report(&mut self) -> Result<Vec<EventFeedback>> {
        Ok(diesel::sql_query(FEEDBACK).load(&mut self.db)?)
    }

    fn participation(&mut self, limit: i64) -> Result<Vec<StudentParticipation>> {
        Ok(diesel::sql_query(PARTICIPATION)
            .bind::<BigInt, _>(limit)
            .load(&mut self.db)?)
    }
}
